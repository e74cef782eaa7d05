pub mod analyzer;
pub mod chat_client;
pub mod pdf_extractor;
pub mod prompts;

pub use analyzer::ResumeAnalyzer;
pub use chat_client::{accumulate_fragments, ChatCompletion, FragmentStream, OpenAiChatClient};
pub use pdf_extractor::{ExtractedText, PdfTextExtractor};
pub use prompts::{MODEL, SYSTEM_PROMPT};
