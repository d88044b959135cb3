use std::fmt;

use reqwest::StatusCode;

#[derive(Debug)]
pub enum FetchError {
    Status { status: StatusCode, body: String },
    Transport(reqwest::Error),
    Decode { body: String, source: serde_json::Error },
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use FetchError::*;
        match self {
            Transport(e) => Some(e),
            Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use FetchError::*;
        match self {
            Status { status, body } => {
                write!(f, "failed to fetch bookmarks from readeck ({}): {}", status, body)
            }
            Transport(e) => write!(f, "failed to reach readeck: {}", e),
            Decode { body, .. } => write!(f, "unexpected bookmark list from readeck: {}", body),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        FetchError::Transport(error)
    }
}

#[derive(Debug)]
pub enum SubmitError {
    Status { status: StatusCode, body: String },
    Transport(reqwest::Error),
    /// Omnivore answered 200 with a `SaveError` result. Only raised in strict mode.
    Rejected { error_codes: Vec<String>, message: Option<String> },
}

impl std::error::Error for SubmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use SubmitError::*;
        match self {
            Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use SubmitError::*;
        match self {
            Status { status, body } => {
                write!(f, "failed to save bookmark to omnivore ({}): {}", status, body)
            }
            Transport(e) => write!(f, "failed to reach omnivore: {}", e),
            Rejected { error_codes, message } => write!(
                f,
                "omnivore rejected bookmark [{}]: {}",
                error_codes.join(", "),
                message.as_deref().unwrap_or("no message")
            ),
        }
    }
}

impl From<reqwest::Error> for SubmitError {
    fn from(error: reqwest::Error) -> Self {
        SubmitError::Transport(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn status_errors_carry_the_body() {
        let err = FetchError::Status {
            status: StatusCode::UNAUTHORIZED,
            body: "invalid token".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("401"));
        assert!(msg.contains("invalid token"));
    }

    #[test]
    fn decode_error_exposes_its_source() {
        let source = serde_json::from_str::<Vec<String>>("{}").unwrap_err();
        let err = FetchError::Decode {
            body: "{}".to_string(),
            source,
        };
        assert!(err.source().is_some());
        assert!(crate::unpack_error(&err).contains("invalid type"));
    }

    #[test]
    fn rejected_lists_error_codes() {
        let err = SubmitError::Rejected {
            error_codes: vec!["UNAUTHORIZED".into(), "BAD_DATA".into()],
            message: None,
        };
        assert_eq!(
            err.to_string(),
            "omnivore rejected bookmark [UNAUTHORIZED, BAD_DATA]: no message"
        );
    }
}
