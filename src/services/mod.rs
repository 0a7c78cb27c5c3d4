pub mod config;
pub mod failure_log;
pub mod image_source;
pub mod ocr;
pub mod solver;
