use crate::error::{GatewayError, Result};
use serde::Serialize;

/// Languages the hosted payment page can be shown in (ISO 639-1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerLanguage {
    Cs,
    Cy,
    De,
    En,
    Es,
    Fr,
    Nl,
    Sk,
}

impl CustomerLanguage {
    pub const ALL: [CustomerLanguage; 8] = [
        CustomerLanguage::Cs,
        CustomerLanguage::Cy,
        CustomerLanguage::De,
        CustomerLanguage::En,
        CustomerLanguage::Es,
        CustomerLanguage::Fr,
        CustomerLanguage::Nl,
        CustomerLanguage::Sk,
    ];

    pub fn code(self) -> &'static str {
        match self {
            CustomerLanguage::Cs => "cs",
            CustomerLanguage::Cy => "cy",
            CustomerLanguage::De => "de",
            CustomerLanguage::En => "en",
            CustomerLanguage::Es => "es",
            CustomerLanguage::Fr => "fr",
            CustomerLanguage::Nl => "nl",
            CustomerLanguage::Sk => "sk",
        }
    }

    /// Wire form; the gateway expects the code upper-cased.
    pub fn wire_code(self) -> String {
        self.code().to_ascii_uppercase()
    }

    /// Parses a lower-case two letter code.
    pub fn parse(code: &str) -> Result<Self> {
        if code.len() != 2 || !code.bytes().all(|b| b.is_ascii_lowercase()) {
            return Err(GatewayError::Format(
                "The given language code does not comply with the ISO 639-1 Alpha2 standard"
                    .to_string(),
            ));
        }
        Self::ALL
            .into_iter()
            .find(|lang| lang.code() == code)
            .ok_or_else(|| {
                GatewayError::UnsupportedValue(format!(
                    "The requested language \"{code}\" is not available"
                ))
            })
    }
}
