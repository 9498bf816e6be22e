//! Event classification: vouchers in, typed liability events out.
//!
//! Each voucher is interpreted through the debit/credit semantics of
//! the accounts-payable account: receipts recognize a
//! liability, clearings settle one through the bank account, correction
//! markers link cancelling vouchers, and self-canceling vouchers are
//! excluded outright.

mod classifier;
mod corrections;
mod describe;
mod event;

pub use classifier::*;
pub use corrections::*;
pub use describe::*;
pub use event::*;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::{Config, Voucher};

/// A fully classified matcher input for one target year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedYear {
    /// The fiscal year whose receipts are reconciled.
    pub year: i32,
    /// All vouchers from the file, in file order. Events reference
    /// into this vector by index.
    pub vouchers: Vec<Voucher>,
    /// Events derived once from the vouchers; immutable thereafter.
    pub events: Vec<Event>,
    /// Indices of vouchers excluded as same-year correction pairs.
    pub excluded: HashSet<usize>,
}

impl ClassifiedYear {
    /// The voucher an event references.
    pub fn voucher(&self, index: usize) -> &Voucher {
        &self.vouchers[index]
    }
}

/// Classify a voucher set for one target year.
///
/// All vouchers are classified (a file may straddle year ends); the
/// correction-pair exclude set is scoped to `year`.
pub fn classify_year(vouchers: Vec<Voucher>, year: i32, config: &Config) -> ClassifiedYear {
    let mut events = Vec::new();
    for index in 0..vouchers.len() {
        events.extend(classify_voucher(&vouchers, index, config));
    }
    let excluded = correction_exclusions(&vouchers, year);
    ClassifiedYear {
        year,
        vouchers,
        events,
        excluded,
    }
}
