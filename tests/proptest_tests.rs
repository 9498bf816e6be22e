//! Property-based tests for the reconciliation pipeline.
//!
//! Run with: `cargo test --test proptest_tests`

#![cfg(feature = "core")]

use avstamning::classify::{ClassifiedYear, Event, classify_year};
use avstamning::core::{Config, Transaction, Voucher};
use avstamning::matching::{CaseStatus, RunReport, Settlement, reconcile};
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const AMOUNTS: [Decimal; 3] = [dec!(100.00), dec!(163.00), dec!(250.50)];
const SUPPLIERS: [&str; 3] = ["Ahlsell", "Elektroskandia", "Elbolaget"];

/// (kind, amount index, day offset, supplier index) tuples drive the
/// generated voucher set: 0 = receipt, 1 = clearing, 2 = self-canceling.
type Spec = (u8, u8, u16, u8);

fn build_vouchers(specs: &[Spec]) -> Vec<Voucher> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    specs
        .iter()
        .enumerate()
        .map(|(i, &(kind, amount_index, day, supplier_index))| {
            let amount = AMOUNTS[amount_index as usize % AMOUNTS.len()];
            let supplier = SUPPLIERS[supplier_index as usize % SUPPLIERS.len()];
            let date = start + Duration::days(i64::from(day) % 330);
            let number = i as u32 + 1;
            let transaction = |account: &str, amount: Decimal| Transaction {
                account: account.into(),
                amount,
                date: None,
                description: None,
            };
            match kind % 3 {
                0 => Voucher {
                    series: "A".into(),
                    number,
                    date,
                    reg_date: None,
                    description: format!(
                        "Leverantörsfaktura - Mottagen - {supplier} - {number}"
                    ),
                    transactions: vec![
                        transaction("2440", -amount),
                        transaction("4010", amount),
                    ],
                },
                1 => Voucher {
                    series: "A".into(),
                    number,
                    date,
                    reg_date: None,
                    description: format!(
                        "Leverantörsfaktura - Betalat - {supplier} - {number}"
                    ),
                    transactions: vec![
                        transaction("2440", amount),
                        transaction("1930", -amount),
                    ],
                },
                _ => Voucher {
                    series: "A".into(),
                    number,
                    date,
                    reg_date: None,
                    description: "Faktura och kreditfaktura".into(),
                    transactions: vec![
                        transaction("2440", -amount),
                        transaction("2440", amount),
                    ],
                },
            }
        })
        .collect()
}

fn run(specs: &[Spec]) -> (ClassifiedYear, RunReport) {
    let config = Config::default();
    let year = classify_year(build_vouchers(specs), 2025, &config);
    let report = reconcile(&year, None, dec!(0), &config);
    (year, report)
}

fn arb_specs() -> impl Strategy<Value = Vec<Spec>> {
    proptest::collection::vec((0u8..3, 0u8..3, 0u16..330, 0u8..3), 0..40)
}

proptest! {
    /// Re-running the pipeline on identical input yields identical
    /// case ordering and field values.
    #[test]
    fn pipeline_is_deterministic(specs in arb_specs()) {
        let (_, first) = run(&specs);
        let (_, second) = run(&specs);
        prop_assert_eq!(
            serde_json::to_string(&first.cases).unwrap(),
            serde_json::to_string(&second.cases).unwrap()
        );
        prop_assert_eq!(
            serde_json::to_string(&first.summary).unwrap(),
            serde_json::to_string(&second.summary).unwrap()
        );
    }

    /// opening + kredit − debet = closing, for any input.
    #[test]
    fn balance_closure(specs in arb_specs()) {
        let (_, report) = run(&specs);
        let summary = &report.summary;
        prop_assert_eq!(
            summary.opening_balance + summary.kredit_sum - summary.debet_sum,
            summary.closing_balance
        );
        prop_assert_eq!(summary.case_count, report.cases.len());
    }

    /// Every clearing appears as the settlement of at most one case,
    /// and every non-excluded target-year receipt of exactly one.
    #[test]
    fn consumption_is_exclusive_and_complete(specs in arb_specs()) {
        let (year, report) = run(&specs);

        let mut seen = std::collections::HashSet::new();
        for case in &report.cases {
            if let Some(Settlement::Clearing(clearing)) = &case.settlement {
                prop_assert!(
                    seen.insert((clearing.voucher_index, clearing.ap_transaction_index)),
                    "clearing consumed twice"
                );
            }
        }

        let receipt_events = year
            .events
            .iter()
            .filter(|event| {
                matches!(event, Event::Receipt(_))
                    && !year.excluded.contains(&event.voucher_index())
            })
            .count();
        let receipt_cases = report
            .cases
            .iter()
            .filter(|case| case.receipt.is_some())
            .count();
        prop_assert_eq!(receipt_events, receipt_cases);
    }

    /// OK cases pair amounts within tolerance and respect the window.
    #[test]
    fn ok_cases_respect_amount_and_window(specs in arb_specs()) {
        let config = Config::default();
        let (year, report) = run(&specs);

        for case in &report.cases {
            if case.status != CaseStatus::Ok {
                continue;
            }
            let receipt = case.receipt.as_ref().expect("OK case without receipt");
            let clearing = match &case.settlement {
                Some(Settlement::Clearing(c)) => c,
                _ => continue,
            };
            prop_assert!(config.abs_amounts_equal(receipt.ap_amount, clearing.ap_amount));

            let gap = (year.voucher(clearing.voucher_index).date
                - year.voucher(receipt.voucher_index).date)
                .num_days();
            prop_assert!(gap >= 0);
            prop_assert!(gap <= config.max_days);
        }
    }

    /// No event from an excluded voucher surfaces in any case row.
    #[test]
    fn exclusion_closure(specs in arb_specs()) {
        let (year, report) = run(&specs);
        for case in &report.cases {
            if let Some(receipt) = &case.receipt {
                prop_assert!(!year.excluded.contains(&receipt.voucher_index));
            }
            if let Some(Settlement::Clearing(clearing)) = &case.settlement {
                prop_assert!(!year.excluded.contains(&clearing.voucher_index));
            }
        }
    }
}
