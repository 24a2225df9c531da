use serde::Serialize;

pub const NOT_FOUND_MESSAGE: &str = "Bookmark not found";
pub const SERVER_ERROR_MESSAGE: &str = "server error";
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized request";

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn new(msg: &str) -> Self {
        StatusResponse { status: msg.to_owned() }
    }
}

/// `{"error": {"message": ...}}`, the shape of every 4xx/5xx body except 401.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorMessage,
}

#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        ErrorResponse {
            error: ErrorMessage { message: msg.into() },
        }
    }
}

/// The 401 body carries a bare string.
#[derive(Debug, Serialize)]
pub struct UnauthorizedResponse {
    pub error: &'static str,
}

impl Default for UnauthorizedResponse {
    fn default() -> Self {
        UnauthorizedResponse {
            error: UNAUTHORIZED_MESSAGE,
        }
    }
}
