pub mod provider;
pub mod gemini;
pub mod prompts;
pub mod parser;

pub use provider::ClassificationProvider;
pub use gemini::GeminiProvider;
