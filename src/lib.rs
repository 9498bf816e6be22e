//! # avstamning
//!
//! Supplier-invoice reconciliation for Swedish double-entry bookkeeping
//! exported in the SIE file format: decode vouchers, classify liability
//! events on the accounts-payable account, and match receipts to their
//! bank clearings across fiscal years.
//!
//! All monetary values use [`rust_decimal::Decimal`] — never floating point.
//! Dates are plain [`chrono::NaiveDate`] calendar dates, as in the SIE
//! format itself.
//!
//! ## Quick Start
//!
//! ```rust
//! use avstamning::classify::classify_year;
//! use avstamning::core::Config;
//! use avstamning::matching::reconcile;
//! use avstamning::sie::parse_sie;
//! use rust_decimal_macros::dec;
//!
//! let config = Config::default();
//! let sie = "\
//! #FNAMN \"Exempelbolaget AB\"
//! #VER A 129 20250308 \"Leverantörsfaktura - Mottagen - Elbolaget - 55001\"
//! {
//! #TRANS 2440 {} -163.00
//! #TRANS 4010 {} 163.00
//! }
//! #VER A 137 20250311 \"Leverantörsfaktura - Betalat - Elbolaget - 55001\"
//! {
//! #TRANS 2440 {} 163.00
//! #TRANS 1930 {} -163.00
//! }
//! ";
//!
//! let file = parse_sie(sie, &config);
//! let year = classify_year(file.vouchers, 2025, &config);
//! let report = reconcile(&year, None, dec!(0), &config);
//!
//! assert_eq!(report.cases.len(), 1);
//! assert_eq!(report.cases[0].confidence, 100);
//! assert_eq!(report.summary.closing_balance, dec!(0));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Domain types, config, classifier, matcher |
//! | `sie` (default) | SIE decoder with legacy code-page probe |
//! | `report` | Case rows and Swedish-locale CSV rendering |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod classify;

#[cfg(feature = "core")]
pub mod matching;

#[cfg(feature = "sie")]
pub mod sie;

#[cfg(feature = "report")]
pub mod report;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
