//! Value types and validation rules of the gateway's wire format.

pub mod amount;
pub mod brand;
pub mod capture;
pub mod currency;
pub mod language;
pub mod order;
pub mod response_code;
pub mod seal;
