//! Role prompts and report post-processing.

pub mod report;
pub mod template;

pub use template::PromptTemplate;
