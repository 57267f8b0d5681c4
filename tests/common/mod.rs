#![allow(dead_code)]

use omnikassa::application::request::PaymentRequest;
use omnikassa::domain::seal;
use std::io::Error;
use std::path::Path;

pub const SANDBOX_KEY: &str = "002020000000001_KEY1";

/// The sandbox order used across the request tests, without credentials.
pub fn reference_request() -> PaymentRequest {
    let mut request = PaymentRequest::new();
    request
        .set_currency("EUR")
        .and_then(|r| r.set_amount("0.55"))
        .and_then(|r| r.set_merchant_id("002020000000001"))
        .and_then(|r| r.set_normal_return_url("http://www.normalreturnurl.nl"))
        .and_then(|r| r.set_automatic_response_url("http://www.autoresponse.nl"))
        .and_then(|r| r.set_transaction_reference("534654"))
        .and_then(|r| r.set_order_id("201208345"))
        .and_then(|r| r.set_key_version("1"))
        .and_then(|r| r.set_secret_key(SANDBOX_KEY))
        .unwrap();
    request
}

pub fn sandbox_seal(data: &str) -> String {
    seal::compute(data, SANDBOX_KEY)
}

/// Writes a callbacks CSV in the shape the gateway posts them.
pub fn write_callbacks(path: &Path, rows: &[(&str, &str)]) -> Result<(), Error> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["Data", "InterfaceVersion", "Seal"])?;
    for (data, seal) in rows {
        wtr.write_record([*data, "HP_1.0", *seal])?;
    }
    wtr.flush()?;
    Ok(())
}
