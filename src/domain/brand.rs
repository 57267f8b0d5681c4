use crate::error::{GatewayError, Result};
use serde::Serialize;
use std::fmt;

/// Payment methods a request may offer to the payer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMeanBrand {
    Ideal,
    Minitix,
    Visa,
    Mastercard,
    Maestro,
    Vpay,
    Bcmc,
    Incasso,
    Acceptgiro,
    Rembours,
}

impl PaymentMeanBrand {
    pub const ALL: [PaymentMeanBrand; 10] = [
        PaymentMeanBrand::Ideal,
        PaymentMeanBrand::Minitix,
        PaymentMeanBrand::Visa,
        PaymentMeanBrand::Mastercard,
        PaymentMeanBrand::Maestro,
        PaymentMeanBrand::Vpay,
        PaymentMeanBrand::Bcmc,
        PaymentMeanBrand::Incasso,
        PaymentMeanBrand::Acceptgiro,
        PaymentMeanBrand::Rembours,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMeanBrand::Ideal => "IDEAL",
            PaymentMeanBrand::Minitix => "MINITIX",
            PaymentMeanBrand::Visa => "VISA",
            PaymentMeanBrand::Mastercard => "MASTERCARD",
            PaymentMeanBrand::Maestro => "MAESTRO",
            PaymentMeanBrand::Vpay => "VPAY",
            PaymentMeanBrand::Bcmc => "BCMC",
            PaymentMeanBrand::Incasso => "INCASSO",
            PaymentMeanBrand::Acceptgiro => "ACCEPTGIRO",
            PaymentMeanBrand::Rembours => "REMBOURS",
        }
    }

    pub fn parse(token: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|brand| brand.as_str() == token)
            .ok_or_else(|| {
                let options: Vec<&str> = Self::ALL.iter().map(|b| b.as_str()).collect();
                GatewayError::UnsupportedValue(format!(
                    "The payment method \"{token}\" is not available. Available options are: {}",
                    options.join(", ")
                ))
            })
    }
}

impl fmt::Display for PaymentMeanBrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
