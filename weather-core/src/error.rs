use thiserror::Error;

pub const MISSING_INPUT_MESSAGE: &str = "Location parameter is missing";
pub const MISSING_CREDENTIAL_MESSAGE: &str = "API key is not configured";
pub const UPSTREAM_FALLBACK_MESSAGE: &str = "Failed to fetch weather data";
pub const TRANSPORT_MESSAGE: &str = "Internal Server Error";

/// Normalized failure of a forecast lookup.
///
/// Every variant maps to an HTTP-style status and a message safe to show to users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("{}", MISSING_INPUT_MESSAGE)]
    MissingInput,

    #[error("{}", MISSING_CREDENTIAL_MESSAGE)]
    MissingCredential,

    /// The provider answered with a non-success status.
    #[error("{message}")]
    UpstreamFailure { message: String, status: u16 },

    /// Network failure, or a body that is not a forecast document.
    /// `detail` is for logs only.
    #[error("{}", TRANSPORT_MESSAGE)]
    TransportFailure { detail: String },
}

impl GatewayError {
    pub fn status(&self) -> u16 {
        match self {
            GatewayError::MissingInput => 400,
            GatewayError::MissingCredential => 500,
            GatewayError::UpstreamFailure { status, .. } => *status,
            GatewayError::TransportFailure { .. } => 500,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub(crate) fn transport(detail: impl Into<String>) -> Self {
        GatewayError::TransportFailure { detail: detail.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(GatewayError::MissingInput.status(), 400);
        assert_eq!(GatewayError::MissingCredential.status(), 500);
        assert_eq!(GatewayError::transport("dns").status(), 500);

        let upstream = GatewayError::UpstreamFailure { message: "nope".into(), status: 403 };
        assert_eq!(upstream.status(), 403);
    }

    #[test]
    fn transport_message_hides_detail() {
        let err = GatewayError::transport("connection refused (os error 111)");
        assert_eq!(err.message(), "Internal Server Error");
    }

    #[test]
    fn upstream_message_is_passed_through() {
        let err = GatewayError::UpstreamFailure {
            message: "No matching location found.".into(),
            status: 400,
        };
        assert_eq!(err.message(), "No matching location found.");
    }
}
