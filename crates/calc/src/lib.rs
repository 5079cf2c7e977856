//! Argument parsing, one-shot evaluation and the interactive menu for the
//! `kortex-calc` binary.

use std::io::{self, BufRead, Write};

use clap::Parser;
use kortex_core::calculator::{format_number, ArithmeticError, Operation};

const RULE: &str = "========================================";

/// Basic arithmetic from the command line.
///
/// Prints `Result: <value>` on success. Division by zero prints an error
/// and exits with status 1. With `--interactive`, prompts for operations
/// in a loop instead.
#[derive(Debug, Parser)]
#[command(name = "kortex-calc", version)]
pub struct Cli {
    /// Prompt for operations and numbers until told to exit.
    #[arg(short, long, conflicts_with_all = ["operation", "num1", "num2"])]
    pub interactive: bool,

    /// Operation to perform: add, subtract, multiply, or divide.
    #[arg(required_unless_present = "interactive")]
    pub operation: Option<Operation>,

    /// Left operand.
    #[arg(allow_negative_numbers = true, required_unless_present = "interactive")]
    pub num1: Option<f64>,

    /// Right operand.
    #[arg(allow_negative_numbers = true, required_unless_present = "interactive")]
    pub num2: Option<f64>,
}

impl Cli {
    /// The expression given on the command line, if complete.
    pub fn expression(&self) -> Option<(Operation, f64, f64)> {
        Some((self.operation?, self.num1?, self.num2?))
    }
}

/// Evaluate `a op b` and render the result for display.
pub fn evaluate(op: Operation, a: f64, b: f64) -> Result<String, ArithmeticError> {
    tracing::debug!(%op, num1 = a, num2 = b, "{a} {} {b}", op.symbol());
    op.apply(a, b).map(format_number)
}

/// Menu-driven calculator over `input`/`out`.
///
/// Returns when the user picks exit or `input` reaches end of file.
/// Invalid choices and numbers are reported and asked for again.
pub fn run_interactive(mut input: impl BufRead, mut out: impl Write) -> io::Result<()> {
    writeln!(out, "Welcome to the Kortex calculator!")?;
    loop {
        print_menu(&mut out)?;

        let op = loop {
            let Some(choice) = prompt(&mut input, &mut out, "Select operation (1-5): ")? else {
                return Ok(());
            };
            match choice.as_str() {
                "5" => {
                    writeln!(out, "Goodbye!")?;
                    return Ok(());
                }
                c => match c.parse::<usize>().ok().and_then(|n| n.checked_sub(1)) {
                    Some(i) if i < Operation::ALL.len() => break Operation::ALL[i],
                    _ => writeln!(out, "Invalid choice: '{choice}'. Please select 1-5.")?,
                },
            }
        };

        let Some(a) = read_number(&mut input, &mut out, "Enter first number: ")? else {
            return Ok(());
        };
        let Some(b) = read_number(&mut input, &mut out, "Enter second number: ")? else {
            return Ok(());
        };

        match evaluate(op, a, b) {
            Ok(value) => writeln!(
                out,
                "Result: {} {} {} = {value}",
                format_number(a),
                op.symbol(),
                format_number(b)
            )?,
            Err(e) => writeln!(out, "Error: {e}")?,
        }
    }
}

fn print_menu(out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{RULE}")?;
    for (i, op) in Operation::ALL.iter().enumerate() {
        writeln!(out, "{}. {} ({})", i + 1, op, op.symbol())?;
    }
    writeln!(out, "5. exit")?;
    writeln!(out, "{RULE}")
}

/// Print `text` and read one trimmed line. `None` at end of input.
fn prompt(input: &mut impl BufRead, out: &mut impl Write, text: &str) -> io::Result<Option<String>> {
    write!(out, "{text}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        writeln!(out)?;
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn read_number(
    input: &mut impl BufRead,
    out: &mut impl Write,
    text: &str,
) -> io::Result<Option<f64>> {
    loop {
        let Some(raw) = prompt(input, out, text)? else {
            return Ok(None);
        };
        match raw.parse::<f64>() {
            Ok(n) => return Ok(Some(n)),
            Err(_) => writeln!(out, "Invalid input: '{raw}'. Please enter a valid number.")?,
        }
    }
}
