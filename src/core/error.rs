use thiserror::Error;

/// Structural failures, the only fatal class.
///
/// Per-voucher data problems (unparseable lines, unbalanced vouchers,
/// unknown description shapes) are deliberately *not* represented here:
/// they are logged with voucher context and processing continues, so
/// that real files round-trip without silent record loss.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AvstamningError {
    /// The input file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path as given by the caller.
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Every encoding in the probe order failed to decode the input.
    #[error("no accepted encoding decodes the file (first undecodable byte at offset {offset})")]
    Encoding {
        /// Byte offset of the first undecodable byte in the last probe.
        offset: usize,
    },

    /// Invalid or inconsistent configuration.
    #[error("configuration error: {0}")]
    Config(String),
}
