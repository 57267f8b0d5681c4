use crate::domain::order::OrderFields;
use crate::error::{GatewayError, Result};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Merchant credentials issued by the gateway.
///
/// Loaded from a TOML file:
///
/// ```toml
/// merchant_id = "002020000000001"
/// secret_key = "002020000000001_KEY1"
/// key_version = "1"
/// ```
///
/// With `test_mode = true` the credentials may be omitted and the sandbox
/// ones are used instead.
#[derive(Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MerchantConfig {
    #[serde(default)]
    pub merchant_id: Option<String>,
    #[serde(default)]
    pub secret_key: Option<String>,
    #[serde(default)]
    pub key_version: Option<String>,
    #[serde(default)]
    pub test_mode: bool,
}

impl MerchantConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|e| GatewayError::Config(e.message().to_string()))?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        if self.test_mode {
            return Ok(());
        }
        let missing = [
            ("merchant_id", &self.merchant_id),
            ("secret_key", &self.secret_key),
            ("key_version", &self.key_version),
        ]
        .into_iter()
        .find(|(_, value)| value.is_none());
        match missing {
            Some((name, _)) => Err(GatewayError::Config(format!(
                "{name} is required unless test_mode is enabled"
            ))),
            None => Ok(()),
        }
    }

    /// Installs these credentials on a request or response.
    pub fn apply_to(&self, order: &mut OrderFields) -> Result<()> {
        if self.test_mode {
            order.enable_test_mode();
            return Ok(());
        }
        self.check()?;
        if let Some(id) = &self.merchant_id {
            order.set_merchant_id(id)?;
        }
        if let Some(key) = &self.secret_key {
            order.set_secret_key(key)?;
        }
        if let Some(version) = &self.key_version {
            order.set_key_version(version)?;
        }
        Ok(())
    }
}

impl fmt::Debug for MerchantConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerchantConfig")
            .field("merchant_id", &self.merchant_id)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("key_version", &self.key_version)
            .field("test_mode", &self.test_mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = MerchantConfig::from_toml(
            r#"
            merchant_id = "002020000000001"
            secret_key = "002020000000001_KEY1"
            key_version = "1"
            "#,
        )
        .unwrap();
        assert_eq!(config.merchant_id.as_deref(), Some("002020000000001"));
        assert!(!config.test_mode);

        let mut order = OrderFields::new();
        config.apply_to(&mut order).unwrap();
        assert_eq!(order.merchant_id(), Some("002020000000001"));
        assert_eq!(order.key_version(), Some("1"));
        assert!(order.has_secret_key());
    }

    #[test]
    fn test_test_mode_needs_no_credentials() {
        let config = MerchantConfig::from_toml("test_mode = true").unwrap();
        let mut order = OrderFields::new();
        config.apply_to(&mut order).unwrap();
        assert!(order.is_test_mode());
        assert_eq!(order.merchant_id(), Some("002020000000001"));
    }

    #[test]
    fn test_missing_credentials() {
        let err = MerchantConfig::from_toml(r#"merchant_id = "002020000000001""#).unwrap_err();
        assert!(matches!(err, GatewayError::Config(_)));
        assert!(err.to_string().contains("secret_key"));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = MerchantConfig::from_toml("test_mode = true\nsecret = \"x\"").unwrap_err();
        assert!(matches!(err, GatewayError::Config(_)));
    }

    #[test]
    fn test_invalid_merchant_id_surfaces_on_apply() {
        let config = MerchantConfig::from_toml(
            r#"
            merchant_id = "123"
            secret_key = "k"
            key_version = "1"
            "#,
        )
        .unwrap();
        let mut order = OrderFields::new();
        assert!(matches!(
            config.apply_to(&mut order),
            Err(GatewayError::Length(_))
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = MerchantConfig {
            secret_key: Some("hunter2".to_string()),
            ..Default::default()
        };
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
