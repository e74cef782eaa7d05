//! Fixed inputs of every analysis request.

/// Model identifier sent with every chat completion.
pub const MODEL: &str = "gemini-2.0-flash";

/// Analyzer instructions sent as the system message. Sent byte-for-byte,
/// including the leading newline and the indentation of every line.
pub const SYSTEM_PROMPT: &str = include_str!("system_prompt.txt");
