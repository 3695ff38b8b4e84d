pub mod audio;
pub mod image;
pub mod llm;
pub mod observability;
pub mod speech;
