//! CSV adapters used by the command line to verify recorded callbacks in bulk.

pub mod callback_reader;
pub mod outcome_writer;
