//! CLI error types with miette diagnostics.
//!
//! Wraps `dpiscope_api::Error` into user-facing errors with actionable
//! help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use dpiscope_api::Error as ApiError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("Authentication failed")]
    #[diagnostic(
        code(dpiscope::auth_failed),
        help("Check the username and password embedded in the connection URI.")
    )]
    AuthFailed(#[source] ApiError),

    #[error("Invalid request")]
    #[diagnostic(code(dpiscope::usage))]
    InvalidRequest(#[source] ApiError),

    #[error("DPI name-map extraction failed")]
    #[diagnostic(
        code(dpiscope::extraction),
        help(
            "The console asset version rotates with controller upgrades.\n\
             Pass the current one with --build-id, or use --raw to skip name resolution."
        )
    )]
    Extraction(#[source] ApiError),

    #[error("Controller request failed")]
    #[diagnostic(code(dpiscope::api))]
    Api(#[source] ApiError),

    #[error("Could not serialize output")]
    #[diagnostic(code(dpiscope::json))]
    Json(#[from] serde_json::Error),
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match &err {
            ApiError::Authentication { .. } => Self::AuthFailed(err),
            ApiError::Validation { .. } | ApiError::InvalidUrl(_) => Self::InvalidRequest(err),
            ApiError::Extraction(_) => Self::Extraction(err),
            _ => Self::Api(err),
        }
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AuthFailed(_) => exit_code::AUTH,
            Self::InvalidRequest(_) => exit_code::USAGE,
            Self::Extraction(_) | Self::Api(_) | Self::Json(_) => exit_code::GENERAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_class() {
        let auth: CliError = ApiError::Authentication {
            endpoint: "https://c/api/login".into(),
            status: 401,
        }
        .into();
        assert_eq!(auth.exit_code(), exit_code::AUTH);

        let usage: CliError = ApiError::Validation {
            message: "bad attribute".into(),
        }
        .into();
        assert_eq!(usage.exit_code(), exit_code::USAGE);
    }
}
