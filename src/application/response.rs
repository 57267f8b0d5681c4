use crate::domain::amount;
use crate::domain::currency::Currency;
use crate::domain::order::OrderFields;
use crate::domain::response_code::ResponseCode;
use crate::domain::seal;
use crate::error::{GatewayError, Result};
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Where a callback stands in its verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationState {
    Unverified,
    Verified,
    /// The seal did not match or the payload was malformed. Terminal.
    Rejected,
}

/// Payload keys this crate understands; anything else is ignored.
const KNOWN_KEYS: [&str; 13] = [
    "amount",
    "currencyCode",
    "merchantId",
    "orderId",
    "transactionReference",
    "keyVersion",
    "captureDay",
    "captureMode",
    "transactionDateTime",
    "authorisationId",
    "paymentMeanBrand",
    "paymentMeanType",
    "responseCode",
];

/// Fields read from a verified payload.
#[derive(Debug, Clone, Default)]
struct CallbackFields {
    response_code: Option<ResponseCode>,
    transaction_date_time: Option<DateTime<FixedOffset>>,
    authorisation_id: Option<String>,
    payment_mean_brand: Option<String>,
    payment_mean_type: Option<String>,
}

/// A payment result posted back by the gateway.
///
/// Nothing in the payload is trusted until [`PaymentResponse::validate`] has
/// recomputed the seal. Until then, and after a rejection, every typed
/// accessor returns `None`.
#[derive(Debug, Clone)]
pub struct PaymentResponse {
    order: OrderFields,
    data: String,
    seal: String,
    state: VerificationState,
    fields: CallbackFields,
}

impl PaymentResponse {
    pub fn new(data: impl Into<String>, seal: impl Into<String>) -> Self {
        Self {
            order: OrderFields::new(),
            data: data.into(),
            seal: seal.into(),
            state: VerificationState::Unverified,
            fields: CallbackFields::default(),
        }
    }

    /// Builds a response from posted form fields.
    ///
    /// `Data` and `Seal` are required; other fields such as
    /// `InterfaceVersion` or `Encode` are ignored.
    pub fn from_post<I, K, V>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut data = None;
        let mut seal = None;
        for (key, value) in fields {
            match key.as_ref() {
                "Data" => data = Some(value.into()),
                "Seal" => seal = Some(value.into()),
                _ => {}
            }
        }
        let data = data.ok_or(GatewayError::MissingField("Data"))?;
        let seal = seal.ok_or(GatewayError::MissingField("Seal"))?;
        Ok(Self::new(data, seal))
    }

    pub fn set_secret_key(&mut self, key: &str) -> Result<&mut Self> {
        self.order.set_secret_key(key)?;
        Ok(self)
    }

    /// Verifies callbacks from the simulation environment.
    pub fn enable_test_mode(&mut self) -> &mut Self {
        self.order.enable_test_verification();
        self
    }

    /// Checks the seal and, when it matches, reads the payload.
    ///
    /// A mismatching seal, or a payload whose fields fail validation, moves
    /// the response to [`VerificationState::Rejected`] and leaves every field
    /// unset. Validating an already verified response is a no-op.
    pub fn validate(&mut self) -> Result<&mut Self> {
        match self.state {
            VerificationState::Verified => return Ok(self),
            VerificationState::Rejected => return Err(GatewayError::Integrity),
            VerificationState::Unverified => {}
        }

        let secret_key = self
            .order
            .secret_key()
            .ok_or(GatewayError::MissingField("secretKey"))?;

        if !seal::verify(&self.data, secret_key, &self.seal) {
            warn!(seal = %self.seal, "payment response seal mismatch");
            self.state = VerificationState::Rejected;
            return Err(GatewayError::Integrity);
        }

        match self.parse() {
            Ok((mut order, fields)) => {
                order.inherit_credentials(&self.order);
                self.order = order;
                self.fields = fields;
                self.state = VerificationState::Verified;
                info!(
                    order_id = ?self.order.order_id(),
                    transaction_reference = ?self.order.transaction_reference(),
                    response_code = ?self.fields.response_code.as_ref().map(ResponseCode::code),
                    "payment response verified"
                );
                Ok(self)
            }
            Err(e) => {
                warn!(error = %e, "payment response payload rejected");
                self.state = VerificationState::Rejected;
                Err(e)
            }
        }
    }

    fn parse(&self) -> Result<(OrderFields, CallbackFields)> {
        let mut values: HashMap<&str, &str> = HashMap::new();
        for pair in self.data.split('|').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if KNOWN_KEYS.contains(&key) {
                values.insert(key, value);
            } else {
                debug!(key, "ignoring unknown payment response field");
            }
        }

        let mut order = OrderFields::new();
        let mut fields = CallbackFields::default();

        // The currency decides how the amount is scaled, so it goes first.
        if let Some(code) = values.get("currencyCode") {
            order.set_currency_code(code)?;
        }
        if let Some(raw) = values.get("amount") {
            order.set_minor_amount(raw)?;
        }
        if let Some(id) = values.get("merchantId") {
            order.set_merchant_id(id)?;
        }
        if let Some(id) = values.get("orderId") {
            order.set_order_id(id)?;
        }
        if let Some(reference) = values.get("transactionReference") {
            order.set_transaction_reference(reference)?;
        }
        if let Some(version) = values.get("keyVersion") {
            order.set_key_version(version)?;
        }

        let capture_day = values
            .get("captureDay")
            .map(|day| {
                day.parse::<u8>().map_err(|_| {
                    GatewayError::Format("The captureDay can only contain numerics".to_string())
                })
            })
            .transpose()?;
        let capture_mode = values.get("captureMode").map(|mode| mode.to_string());
        order.set_reported_capture(capture_day, capture_mode);

        if let Some(timestamp) = values.get("transactionDateTime") {
            fields.transaction_date_time = Some(parse_date_time(timestamp)?);
        }
        fields.authorisation_id = non_empty(values.get("authorisationId"));
        fields.payment_mean_brand = non_empty(values.get("paymentMeanBrand"));
        fields.payment_mean_type = non_empty(values.get("paymentMeanType"));

        if let Some(code) = values.get("responseCode") {
            let code = ResponseCode::from_code(code);
            if let ResponseCode::Unknown(raw) = &code {
                warn!(response_code = %raw, "unknown payment response code");
            }
            fields.response_code = Some(code);
        }

        Ok((order, fields))
    }

    /// Sets the transaction time from an ISO-8601 timestamp with offset.
    pub fn set_transaction_date_time(&mut self, timestamp: &str) -> Result<&mut Self> {
        self.fields.transaction_date_time = Some(parse_date_time(timestamp)?);
        Ok(self)
    }

    /// Sets the currency from the numeric code carried by callbacks.
    pub fn set_currency_code(&mut self, code: &str) -> Result<&mut Self> {
        self.order.set_currency_code(code)?;
        Ok(self)
    }

    pub fn state(&self) -> VerificationState {
        self.state
    }

    pub fn is_verified(&self) -> bool {
        self.state == VerificationState::Verified
    }

    /// The payload exactly as received.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// The seal exactly as received.
    pub fn seal(&self) -> &str {
        &self.seal
    }

    pub fn order(&self) -> &OrderFields {
        &self.order
    }

    pub fn currency(&self) -> Option<Currency> {
        self.order.currency()
    }

    /// Decimal presentation of the amount, e.g. `"0.55"`.
    pub fn amount(&self) -> Option<&str> {
        self.order.amount()
    }

    pub fn amount_decimal(&self) -> Option<Decimal> {
        amount::major_units(self.order.amount()?, self.order.currency()?, false)
    }

    pub fn merchant_id(&self) -> Option<&str> {
        self.order.merchant_id()
    }

    pub fn order_id(&self) -> Option<&str> {
        self.order.order_id()
    }

    pub fn transaction_reference(&self) -> Option<&str> {
        self.order.transaction_reference()
    }

    pub fn key_version(&self) -> Option<&str> {
        self.order.key_version()
    }

    pub fn capture_day(&self) -> Option<u8> {
        self.order.capture_day()
    }

    pub fn capture_mode(&self) -> Option<&str> {
        self.order.capture_mode()
    }

    pub fn response_code(&self) -> Option<&ResponseCode> {
        self.fields.response_code.as_ref()
    }

    pub fn transaction_date_time(&self) -> Option<DateTime<FixedOffset>> {
        self.fields.transaction_date_time
    }

    pub fn authorisation_id(&self) -> Option<&str> {
        self.fields.authorisation_id.as_deref()
    }

    pub fn payment_mean_brand(&self) -> Option<&str> {
        self.fields.payment_mean_brand.as_deref()
    }

    pub fn payment_mean_type(&self) -> Option<&str> {
        self.fields.payment_mean_type.as_deref()
    }
}

fn non_empty(value: Option<&&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(|v| v.to_string())
}

fn parse_date_time(timestamp: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(timestamp)
        .or_else(|_| DateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%z"))
        .map_err(|_| {
            GatewayError::Format(format!(
                "The transactionDateTime \"{timestamp}\" is not a valid ISO 8601 date"
            ))
        })
}
