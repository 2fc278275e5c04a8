use thiserror::Error;

use crate::gateway::GatewayError;

pub mod console;
pub mod flash;
pub mod inventory;
pub mod results;

/// Text flashed when a failure carries no usable message.
pub const GENERIC_ERROR_MESSAGE: &str = "Server error!";

/// Result type returned by the service layer.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures of a console action, classified for the operator.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The addressed record does not exist.
    #[error("inventory record not found")]
    NotFound { message: Option<String> },
    /// The resource refused the request.
    #[error("inventory resource rejected the request with status {status}")]
    Rejected { status: u16, message: Option<String> },
    /// No response was received.
    #[error("inventory resource unavailable: {0}")]
    Unavailable(String),
    /// A response was received but its body was not an inventory record.
    #[error("unexpected response from inventory resource: {0}")]
    Protocol(String),
    /// The gateway cannot build request URLs.
    #[error("inventory gateway misconfigured: {0}")]
    Misconfigured(String),
}

impl ServiceError {
    /// Message shown to the operator: the server supplied one when present,
    /// the generic error text otherwise.
    pub fn flash_text(&self) -> String {
        match self {
            ServiceError::NotFound {
                message: Some(message),
            }
            | ServiceError::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

impl From<GatewayError> for ServiceError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Status {
                status: 404,
                message,
            } => ServiceError::NotFound { message },
            GatewayError::Status { status, message } => ServiceError::Rejected { status, message },
            GatewayError::Request(err) if err.is_decode() => ServiceError::Protocol(err.to_string()),
            GatewayError::Request(err) => ServiceError::Unavailable(err.to_string()),
            GatewayError::InvalidBaseUrl(url) => ServiceError::Misconfigured(url),
        }
    }
}
