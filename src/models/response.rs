use serde::{Deserialize, Serialize};

pub const SUCCESS_MESSAGE: &str = "Resume successfully analyzed";
pub const FAILURE_MESSAGE: &str = "Error analyzing resume";

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub success: bool,
    pub message: String,
    pub data: String,
}

/// Body of a 4xx reply: a bare message, no envelope flags.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClientErrorBody {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServerErrorBody {
    pub success: bool,
    pub message: String,
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model: String,
    pub timestamp: String,
}

impl AnalysisResponse {
    pub fn new(data: String) -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
            data,
        }
    }
}

impl ClientErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl ServerErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: FAILURE_MESSAGE.to_string(),
            error: error.into(),
        }
    }
}
