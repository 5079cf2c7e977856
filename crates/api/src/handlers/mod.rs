pub mod dashboard;
pub mod scripts;
