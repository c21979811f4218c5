pub mod classification;
pub mod error;
pub mod llm_config;
pub mod retry;
pub mod taxonomy;
