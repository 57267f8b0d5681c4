use crate::domain::amount;
use crate::domain::capture::{self, CaptureMode};
use crate::domain::currency::Currency;
use crate::error::{GatewayError, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

/// Merchant id of the gateway's simulation environment.
pub const SANDBOX_MERCHANT_ID: &str = "002020000000001";
/// Secret key of the gateway's simulation environment.
pub const SANDBOX_SECRET_KEY: &str = "002020000000001_KEY1";
/// Key version of the gateway's simulation environment.
pub const SANDBOX_KEY_VERSION: &str = "1";

const MERCHANT_ID_LENGTH: usize = 15;
const MAX_REFERENCE_LENGTH: usize = 32;
const MAX_KEY_VERSION_LENGTH: usize = 10;

static ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("alphanumeric pattern compiles"));

/// Attributes shared by payment requests and payment callbacks.
///
/// Every setter validates its input and leaves the previous value untouched
/// on failure. Setters return `&mut Self` so calls can be chained with `?`.
#[derive(Clone, Default)]
pub struct OrderFields {
    merchant_id: Option<String>,
    secret_key: Option<String>,
    currency: Option<Currency>,
    amount: Option<String>,
    order_id: Option<String>,
    transaction_reference: Option<String>,
    key_version: Option<String>,
    capture_day: Option<u8>,
    capture_mode: Option<String>,
    test_mode: bool,
}

impl OrderFields {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_unlocked(&self, field: &str) -> Result<()> {
        if self.test_mode {
            return Err(GatewayError::State(format!(
                "The {field} cannot be set in test mode"
            )));
        }
        Ok(())
    }

    pub fn set_merchant_id(&mut self, id: &str) -> Result<&mut Self> {
        self.ensure_unlocked("merchantId")?;
        if id.chars().count() != MERCHANT_ID_LENGTH {
            return Err(GatewayError::Length(
                "The merchantId should contain 15 characters".to_string(),
            ));
        }
        self.merchant_id = Some(id.to_string());
        Ok(self)
    }

    pub fn set_secret_key(&mut self, key: &str) -> Result<&mut Self> {
        self.ensure_unlocked("secretKey")?;
        self.secret_key = Some(key.to_string());
        Ok(self)
    }

    pub fn set_key_version(&mut self, version: &str) -> Result<&mut Self> {
        self.ensure_unlocked("keyVersion")?;
        if version.chars().count() > MAX_KEY_VERSION_LENGTH {
            return Err(GatewayError::Length(
                "The keyVersion has a maximum of 10 characters".to_string(),
            ));
        }
        self.key_version = Some(version.to_string());
        Ok(self)
    }

    /// Sets the currency from its ISO 4217 alpha code (`"EUR"`).
    pub fn set_currency(&mut self, code: &str) -> Result<&mut Self> {
        self.currency = Some(Currency::from_alpha(code)?);
        Ok(self)
    }

    /// Sets the currency from its ISO 4217 numeric code (`"978"`).
    pub fn set_currency_code(&mut self, code: &str) -> Result<&mut Self> {
        self.currency = Some(Currency::from_numeric(code)?);
        Ok(self)
    }

    fn require_currency(&self) -> Result<Currency> {
        self.currency
            .ok_or_else(|| GatewayError::Sequencing("Please set a currency first".to_string()))
    }

    /// Sets a decimal amount (`"24.99"`), stored in minor units (`"2499"`).
    pub fn set_amount(&mut self, raw: &str) -> Result<&mut Self> {
        let currency = self.require_currency()?;
        self.amount = Some(amount::to_minor_units(raw, currency)?);
        Ok(self)
    }

    /// Sets an amount received in minor units (`"2499"`), stored as `"24.99"`.
    pub fn set_minor_amount(&mut self, raw: &str) -> Result<&mut Self> {
        let currency = self.require_currency()?;
        self.amount = Some(amount::from_minor_units(raw, currency)?);
        Ok(self)
    }

    fn check_reference(value: &str, field: &str) -> Result<()> {
        if value.chars().count() > MAX_REFERENCE_LENGTH {
            return Err(GatewayError::Length(format!(
                "The {field} has a maximum of 32 characters"
            )));
        }
        if !ALPHANUMERIC.is_match(value) {
            return Err(GatewayError::Format(format!(
                "The {field} can only contain alphanumeric characters"
            )));
        }
        Ok(())
    }

    pub fn set_order_id(&mut self, id: &str) -> Result<&mut Self> {
        Self::check_reference(id, "orderId")?;
        self.order_id = Some(id.to_string());
        Ok(self)
    }

    pub fn set_transaction_reference(&mut self, reference: &str) -> Result<&mut Self> {
        Self::check_reference(reference, "transactionReference")?;
        self.transaction_reference = Some(reference.to_string());
        Ok(self)
    }

    /// Number of days after authorisation before the payment is captured.
    pub fn set_capture_day(&mut self, days: u8) -> Result<&mut Self> {
        self.capture_day = Some(capture::check_capture_day(days)?);
        Ok(self)
    }

    pub fn set_capture_mode(&mut self, mode: CaptureMode) -> &mut Self {
        self.capture_mode = Some(mode.as_str().to_string());
        self
    }

    /// Callbacks report capture details as-is, including a zero day.
    pub(crate) fn set_reported_capture(&mut self, day: Option<u8>, mode: Option<String>) {
        self.capture_day = day;
        self.capture_mode = mode;
    }

    /// Keeps the verifying key and test mode on fields parsed from a callback.
    pub(crate) fn inherit_credentials(&mut self, from: &OrderFields) {
        self.secret_key = from.secret_key.clone();
        self.test_mode = from.test_mode;
    }

    /// Installs the sandbox credentials and locks them until the value is dropped.
    pub fn enable_test_mode(&mut self) -> &mut Self {
        self.merchant_id = Some(SANDBOX_MERCHANT_ID.to_string());
        self.secret_key = Some(SANDBOX_SECRET_KEY.to_string());
        self.key_version = Some(SANDBOX_KEY_VERSION.to_string());
        self.test_mode = true;
        debug!("test mode enabled, sandbox credentials installed");
        self
    }

    /// Test mode for verifying callbacks: only the sandbox key is installed,
    /// merchant id and key version stay unset until a payload supplies them.
    pub(crate) fn enable_test_verification(&mut self) -> &mut Self {
        self.secret_key = Some(SANDBOX_SECRET_KEY.to_string());
        self.test_mode = true;
        debug!("test mode enabled, sandbox key installed");
        self
    }

    pub fn is_test_mode(&self) -> bool {
        self.test_mode
    }

    pub fn merchant_id(&self) -> Option<&str> {
        self.merchant_id.as_deref()
    }

    pub(crate) fn secret_key(&self) -> Option<&str> {
        self.secret_key.as_deref()
    }

    pub fn has_secret_key(&self) -> bool {
        self.secret_key.is_some()
    }

    pub fn currency(&self) -> Option<Currency> {
        self.currency
    }

    /// Numeric ISO 4217 code of the currency, as carried on the wire.
    pub fn currency_code(&self) -> Option<&'static str> {
        self.currency.map(Currency::numeric)
    }

    pub fn amount(&self) -> Option<&str> {
        self.amount.as_deref()
    }

    pub fn order_id(&self) -> Option<&str> {
        self.order_id.as_deref()
    }

    pub fn transaction_reference(&self) -> Option<&str> {
        self.transaction_reference.as_deref()
    }

    pub fn key_version(&self) -> Option<&str> {
        self.key_version.as_deref()
    }

    pub fn capture_day(&self) -> Option<u8> {
        self.capture_day
    }

    pub fn capture_mode(&self) -> Option<&str> {
        self.capture_mode.as_deref()
    }
}

impl fmt::Debug for OrderFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderFields")
            .field("merchant_id", &self.merchant_id)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("currency", &self.currency)
            .field("amount", &self.amount)
            .field("order_id", &self.order_id)
            .field("transaction_reference", &self.transaction_reference)
            .field("key_version", &self.key_version)
            .field("capture_day", &self.capture_day)
            .field("capture_mode", &self.capture_mode)
            .field("test_mode", &self.test_mode)
            .finish()
    }
}
