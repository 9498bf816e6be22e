//! Year-level accounts-payable balance arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::case::{CaseStatus, InvoiceCase};
use crate::core::{Config, Voucher};

/// Case counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub ok: usize,
    pub missing_clearing: usize,
    pub missing_receipt: usize,
    pub needs_review: usize,
    pub ambiguous: usize,
}

impl StatusCounts {
    /// Tally the statuses of a finished case list.
    pub fn tally(cases: &[InvoiceCase]) -> Self {
        let mut counts = Self::default();
        for case in cases {
            match case.status {
                CaseStatus::Ok => counts.ok += 1,
                CaseStatus::MissingClearing => counts.missing_clearing += 1,
                CaseStatus::MissingReceipt => counts.missing_receipt += 1,
                CaseStatus::NeedsReview => counts.needs_review += 1,
                CaseStatus::Ambiguous => counts.ambiguous += 1,
            }
        }
        counts
    }
}

/// Per-year run summary: balance movement plus case statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub year: i32,
    /// Supplied by the caller: the prior year's closing balance, or
    /// zero when there is none.
    pub opening_balance: Decimal,
    /// Σ |amount| over credit (negative) accounts-payable lines:
    /// liability growth.
    pub kredit_sum: Decimal,
    /// Σ |amount| over debit (positive) accounts-payable lines:
    /// liability reduction.
    pub debet_sum: Decimal,
    /// `kredit_sum − debet_sum`; positive means the liability grew.
    pub period_change: Decimal,
    /// `opening_balance + period_change`.
    pub closing_balance: Decimal,
    pub case_count: usize,
    pub status_counts: StatusCounts,
}

/// Compute the summary over all target-year accounts-payable lines.
///
/// Every voucher counts here, excluded ones included: the balance must
/// reproduce the ledger, not the matcher's view of it.
pub fn year_summary(
    vouchers: &[Voucher],
    year: i32,
    opening_balance: Decimal,
    cases: &[InvoiceCase],
    config: &Config,
) -> RunSummary {
    let mut kredit_sum = Decimal::ZERO;
    let mut debet_sum = Decimal::ZERO;
    for voucher in vouchers.iter().filter(|v| v.year() == year) {
        for (_, transaction) in voucher.transactions_on(&config.ap_account) {
            if transaction.amount < Decimal::ZERO {
                kredit_sum += transaction.amount.abs();
            } else {
                debet_sum += transaction.amount;
            }
        }
    }

    let period_change = kredit_sum - debet_sum;
    RunSummary {
        year,
        opening_balance,
        kredit_sum,
        debet_sum,
        period_change,
        closing_balance: opening_balance + period_change,
        case_count: cases.len(),
        status_counts: StatusCounts::tally(cases),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use crate::core::Transaction;

    fn voucher(year: i32, amounts: &[Decimal]) -> Voucher {
        Voucher {
            series: "A".into(),
            number: 1,
            date: NaiveDate::from_ymd_opt(year, 2, 1).unwrap(),
            reg_date: None,
            description: String::new(),
            transactions: amounts
                .iter()
                .map(|amount| Transaction {
                    account: "2440".into(),
                    amount: *amount,
                    date: None,
                    description: None,
                })
                .collect(),
        }
    }

    #[test]
    fn balance_closure() {
        let vouchers = vec![
            voucher(2025, &[dec!(-163.00)]),
            voucher(2025, &[dec!(163.00), dec!(-500.00)]),
            voucher(2024, &[dec!(-999.00)]), // other year, ignored
        ];
        let summary = year_summary(&vouchers, 2025, dec!(100.00), &[], &Config::default());
        assert_eq!(summary.kredit_sum, dec!(663.00));
        assert_eq!(summary.debet_sum, dec!(163.00));
        assert_eq!(summary.period_change, dec!(500.00));
        assert_eq!(summary.closing_balance, dec!(600.00));
        assert_eq!(
            summary.opening_balance + summary.kredit_sum - summary.debet_sum,
            summary.closing_balance
        );
    }
}
