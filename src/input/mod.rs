//! Input processing module
//! Turns PDF, DOCX, TXT and Markdown files into plain text for the scoring core

pub mod file_detector;
pub mod text_extractor;
pub mod manager;

pub use file_detector::FileType;
pub use manager::InputManager;
