pub mod config;
pub mod letter_box;
pub mod solution;
