use crate::domain::amount;
use crate::domain::brand::PaymentMeanBrand;
use crate::domain::capture::CaptureMode;
use crate::domain::language::CustomerLanguage;
use crate::domain::order::OrderFields;
use crate::domain::seal;
use crate::error::{GatewayError, Result};
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

/// Protocol version sent alongside every request.
pub const INTERFACE_VERSION: &str = "HP_1.0";
/// Endpoint the payment form is posted to in production.
pub const PRODUCTION_ACTION_URL: &str =
    "https://payment-webinit.omnikassa.rabobank.nl/paymentServlet";
/// Endpoint the payment form is posted to in test mode.
pub const SIMULATION_ACTION_URL: &str =
    "https://payment-webinit.simu.omnikassa.rabobank.nl/paymentServlet";

const MAX_ENCODED_URL_LENGTH: usize = 512;
const EXPIRATION_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// The hidden fields of the payment form and the URL it is posted to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentForm {
    #[serde(rename = "actionUrl")]
    pub action_url: String,
    #[serde(rename = "Data")]
    pub data: String,
    #[serde(rename = "InterfaceVersion")]
    pub interface_version: String,
    #[serde(rename = "Seal")]
    pub seal: String,
}

impl PaymentForm {
    /// Form field names and values, in the order they are rendered.
    pub fn fields(&self) -> [(&'static str, &str); 3] {
        [
            ("Data", self.data.as_str()),
            ("InterfaceVersion", self.interface_version.as_str()),
            ("Seal", self.seal.as_str()),
        ]
    }
}

/// A payment request, built field by field and then sealed.
///
/// The payload produced by [`PaymentRequest::data`] always lists fields in the
/// gateway's fixed order, whatever order the setters were called in. That
/// order is part of the signed content.
///
/// ```
/// use omnikassa::application::request::PaymentRequest;
///
/// let mut request = PaymentRequest::new();
/// request
///     .set_currency("EUR")?
///     .set_amount("0.55")?
///     .set_merchant_id("002020000000001")?
///     .set_normal_return_url("http://www.normalreturnurl.nl")?
///     .set_automatic_response_url("http://www.autoresponse.nl")?
///     .set_transaction_reference("534654")?
///     .set_order_id("201208345")?
///     .set_key_version("1")?
///     .set_secret_key("002020000000001_KEY1")?;
///
/// assert_eq!(
///     request.seal()?,
///     "6fa2fcf410bd00ff0bccc52ee91a59f46d3983d328aea0426a8edffc6deeff09"
/// );
/// # Ok::<(), omnikassa::error::GatewayError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PaymentRequest {
    order: OrderFields,
    normal_return_url: Option<String>,
    automatic_response_url: Option<String>,
    customer_language: Option<CustomerLanguage>,
    payment_mean_brand_list: Vec<PaymentMeanBrand>,
    expiration_date: Option<DateTime<FixedOffset>>,
}

impl PaymentRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order(&self) -> &OrderFields {
        &self.order
    }

    pub fn order_mut(&mut self) -> &mut OrderFields {
        &mut self.order
    }

    pub fn set_merchant_id(&mut self, id: &str) -> Result<&mut Self> {
        self.order.set_merchant_id(id)?;
        Ok(self)
    }

    pub fn set_secret_key(&mut self, key: &str) -> Result<&mut Self> {
        self.order.set_secret_key(key)?;
        Ok(self)
    }

    pub fn set_key_version(&mut self, version: &str) -> Result<&mut Self> {
        self.order.set_key_version(version)?;
        Ok(self)
    }

    pub fn set_currency(&mut self, code: &str) -> Result<&mut Self> {
        self.order.set_currency(code)?;
        Ok(self)
    }

    pub fn set_amount(&mut self, raw: &str) -> Result<&mut Self> {
        self.order.set_amount(raw)?;
        Ok(self)
    }

    pub fn set_order_id(&mut self, id: &str) -> Result<&mut Self> {
        self.order.set_order_id(id)?;
        Ok(self)
    }

    pub fn set_transaction_reference(&mut self, reference: &str) -> Result<&mut Self> {
        self.order.set_transaction_reference(reference)?;
        Ok(self)
    }

    pub fn set_capture_day(&mut self, days: u8) -> Result<&mut Self> {
        self.order.set_capture_day(days)?;
        Ok(self)
    }

    pub fn set_capture_mode(&mut self, mode: CaptureMode) -> &mut Self {
        self.order.set_capture_mode(mode);
        self
    }

    /// Switches to the simulation endpoint with the sandbox credentials.
    pub fn enable_test_mode(&mut self) -> &mut Self {
        self.order.enable_test_mode();
        self
    }

    fn check_url(url: &str, field: &str) -> Result<String> {
        if urlencoding::encode(url).len() > MAX_ENCODED_URL_LENGTH {
            return Err(GatewayError::Length(format!(
                "The {field} cannot be longer than 512 characters"
            )));
        }
        Ok(url.to_string())
    }

    /// URL the payer is sent back to after paying.
    pub fn set_normal_return_url(&mut self, url: &str) -> Result<&mut Self> {
        self.normal_return_url = Some(Self::check_url(url, "normalReturnUrl")?);
        Ok(self)
    }

    /// URL the gateway posts the payment result to.
    pub fn set_automatic_response_url(&mut self, url: &str) -> Result<&mut Self> {
        self.automatic_response_url = Some(Self::check_url(url, "automaticResponseUrl")?);
        Ok(self)
    }

    pub fn set_customer_language(&mut self, language: &str) -> Result<&mut Self> {
        self.customer_language = Some(CustomerLanguage::parse(language)?);
        Ok(self)
    }

    pub fn add_payment_mean_brand(&mut self, brand: &str) -> Result<&mut Self> {
        self.payment_mean_brand_list.push(PaymentMeanBrand::parse(brand)?);
        Ok(self)
    }

    /// Replaces the offered payment methods, keeping the given order.
    pub fn set_payment_mean_brand_list<S: AsRef<str>>(
        &mut self,
        brands: &[S],
    ) -> Result<&mut Self> {
        let list = brands
            .iter()
            .map(|brand| PaymentMeanBrand::parse(brand.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        self.payment_mean_brand_list = list;
        Ok(self)
    }

    /// Sets the moment the payment expires, which must lie in the future.
    pub fn set_expiration_date<Tz: TimeZone>(
        &mut self,
        expiration: DateTime<Tz>,
    ) -> Result<&mut Self> {
        let expiration = expiration.fixed_offset();
        if expiration.with_timezone(&Utc) <= Utc::now() {
            return Err(GatewayError::Range(
                "The expiration date should be in the future".to_string(),
            ));
        }
        self.expiration_date = Some(expiration);
        Ok(self)
    }

    pub fn interface_version(&self) -> &'static str {
        INTERFACE_VERSION
    }

    pub fn normal_return_url(&self) -> Option<&str> {
        self.normal_return_url.as_deref()
    }

    pub fn automatic_response_url(&self) -> Option<&str> {
        self.automatic_response_url.as_deref()
    }

    /// Language code as sent to the gateway (`"NL"`).
    pub fn customer_language(&self) -> Option<String> {
        self.customer_language.map(CustomerLanguage::wire_code)
    }

    pub fn payment_mean_brand_list(&self) -> &[PaymentMeanBrand] {
        &self.payment_mean_brand_list
    }

    /// Expiration date as sent to the gateway (`"2100-01-01T13:37:00+0300"`).
    pub fn expiration_date(&self) -> Option<String> {
        self.expiration_date
            .map(|date| date.format(EXPIRATION_DATE_FORMAT).to_string())
    }

    /// The amount in major units, e.g. `24.99` for a stored `"2499"` EUR.
    pub fn amount_decimal(&self) -> Option<Decimal> {
        let currency = self.order.currency()?;
        amount::major_units(self.order.amount()?, currency, true)
    }

    /// Encodes the request as the gateway's `key=value|key=value` payload.
    ///
    /// Fails with [`GatewayError::MissingField`] naming the first required
    /// field that has not been set.
    pub fn data(&self) -> Result<String> {
        let order = &self.order;
        let required = [
            ("amount", order.amount()),
            ("currencyCode", order.currency_code()),
            ("merchantId", order.merchant_id()),
            ("normalReturnUrl", self.normal_return_url()),
            ("automaticResponseUrl", self.automatic_response_url()),
            ("transactionReference", order.transaction_reference()),
            ("orderId", order.order_id()),
            ("keyVersion", order.key_version()),
        ];

        let mut fields = Vec::with_capacity(required.len() + 5);
        for (key, value) in required {
            match value {
                Some(value) if !value.is_empty() => fields.push(format!("{key}={value}")),
                _ => return Err(GatewayError::MissingField(key)),
            }
        }

        if let Some(language) = self.customer_language() {
            fields.push(format!("customerLanguage={language}"));
        }
        if let Some(expiration) = self.expiration_date() {
            fields.push(format!("expirationDate={expiration}"));
        }
        if let Some(days) = order.capture_day() {
            fields.push(format!("captureDay={days}"));
        }
        if let Some(mode) = order.capture_mode() {
            fields.push(format!("captureMode={mode}"));
        }
        if !self.payment_mean_brand_list.is_empty() {
            let brands: Vec<&str> = self
                .payment_mean_brand_list
                .iter()
                .map(|brand| brand.as_str())
                .collect();
            fields.push(format!("paymentMeanBrandList={}", brands.join(",")));
        }

        Ok(fields.join("|"))
    }

    /// Seals the payload with the merchant's secret key.
    pub fn seal(&self) -> Result<String> {
        let secret_key = self
            .order
            .secret_key()
            .ok_or(GatewayError::MissingField("secretKey"))?;
        let data = self.data()?;
        let seal = seal::compute(&data, secret_key);
        debug!(
            order_id = ?self.order.order_id(),
            transaction_reference = ?self.order.transaction_reference(),
            "payment request sealed"
        );
        Ok(seal)
    }

    pub fn action_url(&self) -> &'static str {
        if self.order.is_test_mode() {
            SIMULATION_ACTION_URL
        } else {
            PRODUCTION_ACTION_URL
        }
    }

    /// Everything needed to render the payment form.
    pub fn form(&self) -> Result<PaymentForm> {
        let seal = self.seal()?;
        Ok(PaymentForm {
            action_url: self.action_url().to_string(),
            data: self.data()?,
            interface_version: INTERFACE_VERSION.to_string(),
            seal,
        })
    }
}
