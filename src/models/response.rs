use serde::Serialize;

/// Uniform error body: every 4xx/5xx response is `{ "error": <message> }`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}
