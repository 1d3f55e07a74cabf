use thiserror::Error;

#[derive(Error, Debug)]
pub enum GemError {
    #[error("Improper credentials for facility {facility}: {body}")]
    ImproperCredentials { facility: String, body: String },

    #[error("HTTP reqwest error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Portal request failed with status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid settings: {0}")]
    InvalidSettings(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid observation id (expected <program>-<number>): {0}")]
    InvalidObservationId(String),

    #[error("Unknown site prefix in program id: {0}")]
    UnknownSite(String),

    #[error("No credential configured for site {0}")]
    MissingCredential(String),

    #[error("No portal URL configured for site {0}")]
    MissingPortalUrl(String),

    #[error("Invalid date/time: {0}")]
    InvalidDateTime(String),

    #[error("Timing window start given without a duration")]
    MissingWindowDuration,

    #[error("Target {0} has no sidereal coordinates")]
    NoSiderealCoordinates(String),

    #[error("Invalid target field {field}: {reason}")]
    InvalidTargetField { field: String, reason: String },

    #[error("Target import failed at line {line}: {reason}")]
    TargetImport { line: u64, reason: String },

    #[error("Astrometry computation failed: {0}")]
    Astrometry(String),
}

impl GemError {
    /// True for failures caused by the portal rejecting the credentials (HTTP 4xx).
    pub fn is_credential_error(&self) -> bool {
        matches!(self, GemError::ImproperCredentials { .. })
    }

    /// True for transport failures and non-4xx error statuses.
    pub fn is_request_error(&self) -> bool {
        matches!(self, GemError::Request(_) | GemError::HttpStatus { .. })
    }
}

impl PartialEq for GemError {
    fn eq(&self, other: &Self) -> bool {
        use GemError::*;
        match (self, other) {
            (
                ImproperCredentials {
                    facility: fa,
                    body: ba,
                },
                ImproperCredentials {
                    facility: fb,
                    body: bb,
                },
            ) => fa == fb && ba == bb,
            (
                HttpStatus {
                    status: sa,
                    body: ba,
                },
                HttpStatus {
                    status: sb,
                    body: bb,
                },
            ) => sa == sb && ba == bb,

            // not comparable: equal when the variant matches
            (Request(_), Request(_)) => true,
            (IoError(_), IoError(_)) => true,
            (InvalidSettings(_), InvalidSettings(_)) => true,
            (Csv(_), Csv(_)) => true,

            (InvalidObservationId(a), InvalidObservationId(b)) => a == b,
            (UnknownSite(a), UnknownSite(b)) => a == b,
            (MissingCredential(a), MissingCredential(b)) => a == b,
            (MissingPortalUrl(a), MissingPortalUrl(b)) => a == b,
            (InvalidDateTime(a), InvalidDateTime(b)) => a == b,
            (NoSiderealCoordinates(a), NoSiderealCoordinates(b)) => a == b,
            (
                InvalidTargetField {
                    field: fa,
                    reason: ra,
                },
                InvalidTargetField {
                    field: fb,
                    reason: rb,
                },
            ) => fa == fb && ra == rb,
            (
                TargetImport {
                    line: la,
                    reason: ra,
                },
                TargetImport {
                    line: lb,
                    reason: rb,
                },
            ) => la == lb && ra == rb,
            (Astrometry(a), Astrometry(b)) => a == b,

            (MissingWindowDuration, MissingWindowDuration) => true,

            _ => false,
        }
    }
}
