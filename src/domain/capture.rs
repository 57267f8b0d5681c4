use crate::error::{GatewayError, Result};
use serde::Serialize;

/// How an authorised card payment is captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaptureMode {
    /// Captured automatically after `captureDay` days.
    AuthorCapture,
    /// Held until the merchant validates it within `captureDay` days.
    Validation,
}

impl CaptureMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CaptureMode::AuthorCapture => "AUTHOR_CAPTURE",
            CaptureMode::Validation => "VALIDATION",
        }
    }

    pub fn parse(mode: &str) -> Result<Self> {
        match mode {
            "AUTHOR_CAPTURE" => Ok(CaptureMode::AuthorCapture),
            "VALIDATION" => Ok(CaptureMode::Validation),
            other => Err(GatewayError::UnsupportedValue(format!(
                "The capture mode \"{other}\" is not available. Available options are: AUTHOR_CAPTURE, VALIDATION"
            ))),
        }
    }
}

/// Checks a request capture day, which must lie in `1..=99`.
pub fn check_capture_day(days: u8) -> Result<u8> {
    if (1..=99).contains(&days) {
        Ok(days)
    } else {
        Err(GatewayError::Range(
            "The capture day should be an integer value between 1 and 99".to_string(),
        ))
    }
}
