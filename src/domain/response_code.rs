use serde::{Serialize, Serializer};
use std::fmt;

/// Outcome reported by the gateway in a payment callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseCode {
    Success,
    Failure,
    Cancelled,
    Open,
    ServerUnreachable,
    Expired,
    /// A code outside the documented set, kept verbatim.
    Unknown(String),
}

impl ResponseCode {
    pub const SUCCESS: &'static str = "00";
    pub const FAILURE: &'static str = "05";
    pub const CANCELLED: &'static str = "17";
    pub const OPEN: &'static str = "60";
    pub const SERVER_UNREACHABLE: &'static str = "90";
    pub const EXPIRED: &'static str = "97";

    pub fn from_code(code: &str) -> Self {
        match code {
            Self::SUCCESS => ResponseCode::Success,
            Self::FAILURE => ResponseCode::Failure,
            Self::CANCELLED => ResponseCode::Cancelled,
            Self::OPEN => ResponseCode::Open,
            Self::SERVER_UNREACHABLE => ResponseCode::ServerUnreachable,
            Self::EXPIRED => ResponseCode::Expired,
            other => ResponseCode::Unknown(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            ResponseCode::Success => Self::SUCCESS,
            ResponseCode::Failure => Self::FAILURE,
            ResponseCode::Cancelled => Self::CANCELLED,
            ResponseCode::Open => Self::OPEN,
            ResponseCode::ServerUnreachable => Self::SERVER_UNREACHABLE,
            ResponseCode::Expired => Self::EXPIRED,
            ResponseCode::Unknown(code) => code,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResponseCode::Success)
    }

    /// `Open` payments may still settle; every other known code is final.
    pub fn is_final(&self) -> bool {
        !matches!(self, ResponseCode::Open | ResponseCode::Unknown(_))
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for ResponseCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.code())
    }
}
