use crate::application::response::PaymentResponse;
use crate::config::MerchantConfig;
use crate::error::{GatewayError, Result};
use serde::Serialize;

/// Result of checking one callback, flattened for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationOutcome {
    pub transaction_reference: Option<String>,
    pub order_id: Option<String>,
    pub amount: Option<String>,
    pub currency: Option<String>,
    pub response_code: Option<String>,
    pub status: OutcomeStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// Seal matched and the payment succeeded.
    Paid,
    /// Seal matched but the payment did not (or not yet) succeed.
    Unpaid,
    /// Seal mismatch or unreadable payload.
    Rejected,
}

impl VerificationOutcome {
    pub fn rejected() -> Self {
        Self {
            transaction_reference: None,
            order_id: None,
            amount: None,
            currency: None,
            response_code: None,
            status: OutcomeStatus::Rejected,
        }
    }

    fn from_response(response: &PaymentResponse) -> Self {
        let paid = response
            .response_code()
            .is_some_and(|code| code.is_success());
        Self {
            transaction_reference: response.transaction_reference().map(str::to_string),
            order_id: response.order_id().map(str::to_string),
            amount: response.amount().map(str::to_string),
            currency: response.currency().map(|c| c.alpha().to_string()),
            response_code: response.response_code().map(|c| c.code().to_string()),
            status: if paid {
                OutcomeStatus::Paid
            } else {
                OutcomeStatus::Unpaid
            },
        }
    }
}

/// Checks callbacks against one merchant's credentials.
pub struct CallbackVerifier {
    config: MerchantConfig,
}

impl CallbackVerifier {
    pub fn new(config: MerchantConfig) -> Self {
        Self { config }
    }

    /// Validates a single `Data`/`Seal` pair.
    ///
    /// Returns the verified response, or the error that rejected it.
    pub fn verify(&self, data: &str, seal: &str) -> Result<PaymentResponse> {
        let mut response = PaymentResponse::new(data, seal);
        if self.config.test_mode {
            response.enable_test_mode();
        } else {
            let key = self
                .config
                .secret_key
                .as_deref()
                .ok_or(GatewayError::MissingField("secretKey"))?;
            response.set_secret_key(key)?;
        }
        response.validate()?;
        Ok(response)
    }

    pub fn outcome(&self, data: &str, seal: &str) -> (VerificationOutcome, Option<GatewayError>) {
        match self.verify(data, seal) {
            Ok(response) => (VerificationOutcome::from_response(&response), None),
            Err(e) => (VerificationOutcome::rejected(), Some(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seal;

    fn sandbox() -> CallbackVerifier {
        CallbackVerifier::new(MerchantConfig::from_toml("test_mode = true").unwrap())
    }

    #[test]
    fn test_paid_outcome() {
        let data = "currencyCode=978|amount=2499|orderId=A1|transactionReference=A1T|responseCode=00";
        let (outcome, error) =
            sandbox().outcome(data, &seal::compute(data, "002020000000001_KEY1"));
        assert!(error.is_none());
        assert_eq!(outcome.status, OutcomeStatus::Paid);
        assert_eq!(outcome.amount.as_deref(), Some("24.99"));
        assert_eq!(outcome.currency.as_deref(), Some("EUR"));
        assert_eq!(outcome.response_code.as_deref(), Some("00"));
    }

    #[test]
    fn test_unpaid_outcome() {
        let data = "currencyCode=978|amount=2499|responseCode=17";
        let (outcome, _) = sandbox().outcome(data, &seal::compute(data, "002020000000001_KEY1"));
        assert_eq!(outcome.status, OutcomeStatus::Unpaid);
        assert_eq!(outcome.response_code.as_deref(), Some("17"));
    }

    #[test]
    fn test_rejected_outcome() {
        let (outcome, error) = sandbox().outcome("responseCode=00", "deadbeef");
        assert_eq!(outcome, VerificationOutcome::rejected());
        assert!(matches!(error, Some(GatewayError::Integrity)));
    }

    #[test]
    fn test_merchant_key_is_used() {
        let config = MerchantConfig::from_toml(
            r#"
            merchant_id = "000000000000000"
            secret_key = "live-key"
            key_version = "2"
            "#,
        )
        .unwrap();
        let verifier = CallbackVerifier::new(config);
        let data = "responseCode=00";
        assert!(verifier.verify(data, &seal::compute(data, "live-key")).is_ok());
        assert!(matches!(
            verifier.verify(data, &seal::compute(data, "002020000000001_KEY1")),
            Err(GatewayError::Integrity)
        ));
    }
}
