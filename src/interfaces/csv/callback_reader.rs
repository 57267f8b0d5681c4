use crate::error::{GatewayError, Result};
use serde::Deserialize;
use std::io::Read;

/// One posted callback: the gateway's `Data` and `Seal` form fields.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct CallbackRecord {
    #[serde(rename = "Data")]
    pub data: String,
    #[serde(rename = "Seal")]
    pub seal: String,
}

/// Reads recorded callbacks from a CSV source with `Data` and `Seal` columns.
///
/// Other columns (`InterfaceVersion`, `Encode`, ...) are ignored. Only the
/// header names are trimmed; values are sealed bytes and are read verbatim.
pub struct CallbackReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CallbackReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes records, one `Result` per row.
    pub fn callbacks(self) -> impl Iterator<Item = Result<CallbackRecord>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(GatewayError::from))
    }
}
