use serde::Serialize;

/// Body carrying only a human-readable message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub mensagem: &'static str,
}

impl MessageResponse {
    pub fn new(mensagem: &'static str) -> Self {
        Self { mensagem }
    }
}
