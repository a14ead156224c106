use reqwest::StatusCode;
use thiserror::Error;

/// Failures of the key/value store backing the session.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read state file {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write state file {path}: {source}")]
    Write {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("State file {path} is not a JSON object: {source}")]
    Corrupt {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{message} ({status})")]
    Api { status: StatusCode, message: String },

    #[error("Unexpected response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("No post is being edited")]
    NoEditTarget,

    #[error("Post {0} is not displayed")]
    UnknownPost(crate::models::models::PostId),

    #[error("Login response carried no token")]
    MissingToken,
}

impl ClientError {
    pub fn api(status: StatusCode, message: impl Into<String>) -> Self {
        ClientError::Api {
            status,
            message: message.into(),
        }
    }

    /// Text shown to the user in the alert modal.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { message, .. } => message.clone(),
            ClientError::Network(_) => "Request failed. Is the API reachable?".to_string(),
            ClientError::Decode(_) => "The server sent an unexpected response.".to_string(),
            ClientError::Storage(_) => "Could not save local settings.".to_string(),
            ClientError::NotLoggedIn => crate::config::LOGIN_REQUIRED_MESSAGE.to_string(),
            ClientError::NoEditTarget => "No post selected for editing.".to_string(),
            ClientError::UnknownPost(id) => format!("Post {} is not in the list.", id),
            ClientError::MissingToken => crate::config::LOGIN_FAILED_MESSAGE.to_string(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Network(e) => e.status(),
            _ => None,
        }
    }
}

/// Pull a human readable message out of an error response body.
///
/// `message` wins over `error`; anything else falls back to a status line.
pub fn error_message_from_body(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "error"].iter().find_map(|field| {
                value
                    .get(field)
                    .and_then(|m| m.as_str())
                    .filter(|m| !m.trim().is_empty())
                    .map(str::to_string)
            })
        })
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_field_is_used() {
        let msg = error_message_from_body(StatusCode::BAD_REQUEST, br#"{"error":"duplicate title"}"#);
        assert_eq!(msg, "duplicate title");
    }

    #[test]
    fn message_field_wins_over_error() {
        let body = br#"{"message":"Slow down","error":"rate limited"}"#;
        let msg = error_message_from_body(StatusCode::TOO_MANY_REQUESTS, body);
        assert_eq!(msg, "Slow down");
    }

    #[test]
    fn non_json_body_falls_back_to_status() {
        let msg = error_message_from_body(StatusCode::INTERNAL_SERVER_ERROR, b"<html>oops</html>");
        assert_eq!(msg, "Request failed with status 500");
    }

    #[test]
    fn blank_error_falls_back_to_status() {
        let msg = error_message_from_body(StatusCode::NOT_FOUND, br#"{"error":"  "}"#);
        assert_eq!(msg, "Request failed with status 404");
    }

    #[test]
    fn api_error_user_message_is_server_text() {
        let err = ClientError::api(StatusCode::CONFLICT, "User already exists");
        assert_eq!(err.user_message(), "User already exists");
        assert_eq!(err.status(), Some(StatusCode::CONFLICT));
    }
}
