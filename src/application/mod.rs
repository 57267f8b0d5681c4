//! Application layer: building sealed payment requests and verifying the
//! gateway's payment callbacks.
//!
//! [`request::PaymentRequest`] and [`response::PaymentResponse`] both wrap the
//! shared [`crate::domain::order::OrderFields`], so field validation lives in
//! one place. [`verifier::CallbackVerifier`] applies a merchant configuration
//! to batches of callbacks.

pub mod request;
pub mod response;
pub mod verifier;
