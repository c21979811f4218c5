pub mod use_cases;

pub use use_cases::batch_runner::{BatchRunner, NullProgressSink, ProgressSink};
pub use use_cases::classifier::ClassifyUseCase;
pub use use_cases::prompt_builder::PromptBuilder;
