use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Text encodings accepted for SIE files, in probe order.
///
/// Historical Swedish accounting software wrote SIE files in the IBM PC
/// code pages; newer exports use Latin-1 or UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SieEncoding {
    /// IBM PC code page 437 (the SIE standard's "PC8").
    Cp437,
    /// IBM PC code page 850.
    Cp850,
    /// ISO-8859-1 / Windows-1252.
    Latin1,
    /// UTF-8.
    Utf8,
}

impl SieEncoding {
    /// Human-readable label used in log messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cp437 => "CP437",
            Self::Cp850 => "CP850",
            Self::Latin1 => "Latin-1",
            Self::Utf8 => "UTF-8",
        }
    }

    /// Probe order when no encoding is pinned.
    pub const PROBE_ORDER: [SieEncoding; 4] =
        [Self::Cp437, Self::Cp850, Self::Latin1, Self::Utf8];
}

/// Thresholds and account numbers threaded through decoder, classifier,
/// and matcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Accounts-payable account (Leverantörsskulder).
    pub ap_account: String,
    /// Corporate bank account (Företagskonto).
    pub bank_account: String,
    /// Longest accepted receipt-to-clearing gap, in whole days.
    pub max_days: i64,
    /// Equality tolerance for balance checks and amount comparisons.
    pub amount_tolerance: Decimal,
    /// Pin the file encoding instead of probing.
    pub encoding: Option<SieEncoding>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ap_account: "2440".into(),
            bank_account: "1930".into(),
            max_days: 120,
            amount_tolerance: dec!(0.005),
            encoding: None,
        }
    }
}

impl Config {
    /// Whether two signed amounts are equal within the tolerance.
    pub fn amounts_equal(&self, a: Decimal, b: Decimal) -> bool {
        (a - b).abs() <= self.amount_tolerance
    }

    /// Whether two amounts have equal absolute value within the tolerance.
    pub fn abs_amounts_equal(&self, a: Decimal, b: Decimal) -> bool {
        (a.abs() - b.abs()).abs() <= self.amount_tolerance
    }

    /// Whether a signed sum counts as balanced.
    pub fn is_balanced(&self, sum: Decimal) -> bool {
        sum.abs() <= self.amount_tolerance
    }
}

/// Builder for [`Config`].
///
/// # Example
///
/// ```
/// use avstamning::core::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .ap_account("2441")
///     .max_days(90)
///     .build();
/// assert_eq!(config.ap_account, "2441");
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a builder seeded with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the accounts-payable account.
    pub fn ap_account(mut self, account: impl Into<String>) -> Self {
        self.config.ap_account = account.into();
        self
    }

    /// Override the bank account.
    pub fn bank_account(mut self, account: impl Into<String>) -> Self {
        self.config.bank_account = account.into();
        self
    }

    /// Set the receipt-to-clearing window in days.
    pub fn max_days(mut self, days: i64) -> Self {
        self.config.max_days = days;
        self
    }

    /// Set the amount tolerance.
    pub fn amount_tolerance(mut self, tolerance: Decimal) -> Self {
        self.config.amount_tolerance = tolerance;
        self
    }

    /// Pin the SIE text encoding instead of probing.
    pub fn encoding(mut self, encoding: SieEncoding) -> Self {
        self.config.encoding = Some(encoding);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Config {
        self.config
    }
}
