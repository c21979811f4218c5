pub mod batch_runner;
pub mod classifier;
pub mod prompt_builder;
pub mod validator;
