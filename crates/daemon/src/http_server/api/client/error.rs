use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("credentials must be a printable <handle>:<token> pair")]
    InvalidCredentials,
    /// The daemon answered with its JSON error body.
    #[error("{kind} ({status}): {msg}")]
    Service {
        status: StatusCode,
        kind: String,
        msg: String,
    },
    /// Any other unsuccessful response.
    #[error("HTTP status {0}: {1}")]
    HttpStatus(StatusCode, String),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Service { status, .. } | ApiError::HttpStatus(status, _) => Some(*status),
            ApiError::Reqwest(e) => e.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_of_service_error() {
        let err = ApiError::Service {
            status: StatusCode::CONFLICT,
            kind: "already_exists".into(),
            msg: "collection already exists: notes".into(),
        };
        assert_eq!(err.status(), Some(StatusCode::CONFLICT));
        assert!(err.to_string().starts_with("already_exists"));
        assert_eq!(ApiError::InvalidCredentials.status(), None);
    }
}
