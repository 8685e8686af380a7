use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Reported by every adapter when an upstream body does not have the expected shape.
pub const INVALID_FORMAT: &str = "Invalid response format from the server.";

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Bad user input or a response that does not fit the expected shape.
    #[error("{0}")]
    Validation(String),

    #[error("Server error: {status} - {reason}")]
    ServerStatus { status: u16, reason: String },

    #[error("No response received from the server. Please check your connection.")]
    NoResponse(String),

    #[error("Error setting up the request. Please try again.")]
    RequestSetup(String),

    /// The upstream service answered but reported a failure itself.
    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Llm(String),

    #[error("A {flow} request is already in progress")]
    Busy { flow: String },

    #[error("Invalid state transition: {current} -> {requested}")]
    InvalidTransition { current: String, requested: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }

    pub fn busy(flow: impl Into<String>) -> Self {
        Self::Busy { flow: flow.into() }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn server_status(status: reqwest::StatusCode) -> Self {
        Self::ServerStatus {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("").to_string(),
        }
    }

    /// Classifies a reqwest failure by the point at which it happened.
    pub fn transport(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::RequestSetup(err.to_string())
        } else if let Some(status) = err.status() {
            Self::server_status(status)
        } else {
            Self::NoResponse(err.to_string())
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::ServerStatus { .. } | Self::NoResponse(_) | Self::RequestSetup(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_server_status_message() {
        let err = Error::server_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Server error: 500 - Internal Server Error");
        assert!(err.is_transport());
    }

    #[test]
    fn test_transport_messages_hide_details() {
        let err = Error::NoResponse("connection refused".to_string());
        assert_eq!(
            err.to_string(),
            "No response received from the server. Please check your connection."
        );

        let err = Error::RequestSetup("relative URL without a base".to_string());
        assert_eq!(
            err.to_string(),
            "Error setting up the request. Please try again."
        );
    }

    #[test]
    fn test_builder_failure_is_request_setup() {
        let err = reqwest::Client::new()
            .post("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(Error::transport(err), Error::RequestSetup(_)));
    }

    #[test]
    fn test_validation_and_upstream_display_verbatim() {
        assert_eq!(
            Error::validation("Please upload an image file.").to_string(),
            "Please upload an image file."
        );
        assert_eq!(Error::upstream("bad input").to_string(), "bad input");
        assert!(!Error::upstream("bad input").is_transport());
    }
}
