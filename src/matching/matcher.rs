//! Receipt-to-clearing matching for one target year, with optional
//! carry-over corrections from the following year.
//!
//! Nothing in here is an error: every anomaly becomes a case row with a
//! non-OK status and a comment, so each record the user sees traces
//! back to a specific voucher.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::balance::{RunSummary, year_summary};
use super::case::{CaseStatus, InvoiceCase, Settlement};
use crate::classify::{
    ClassifiedYear, ClearingEvent, CorrectionEvent, CorrectionKind, Event, ReceiptEvent,
};
use crate::core::Config;

/// Result of one matcher run: ordered cases plus the year summary.
///
/// Cases appear in ascending receipt-voucher order, with orphan
/// clearings appended in ascending clearing-voucher order. The
/// ordering is part of the contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub year: i32,
    pub cases: Vec<InvoiceCase>,
    pub summary: RunSummary,
}

/// Reconcile one target year.
///
/// `carry` is the classified following year, consulted only for
/// cross-year correction settlements. `opening_balance` is typically
/// the prior year's closing balance, zero when there is none.
pub fn reconcile(
    target: &ClassifiedYear,
    carry: Option<&ClassifiedYear>,
    opening_balance: Decimal,
    config: &Config,
) -> RunReport {
    // Events from excluded vouchers and from other calendar years
    // drop out before anything is paired.
    let mut receipts: Vec<&ReceiptEvent> = Vec::new();
    let mut clearings: Vec<&ClearingEvent> = Vec::new();
    for event in &target.events {
        let index = event.voucher_index();
        if target.excluded.contains(&index) || target.voucher(index).year() != target.year {
            continue;
        }
        match event {
            Event::Receipt(receipt) => receipts.push(receipt),
            Event::Clearing(clearing) => clearings.push(clearing),
            _ => {}
        }
    }

    receipts.sort_by(|a, b| {
        (voucher_key(target, a.voucher_index), a.transaction_index)
            .cmp(&(voucher_key(target, b.voucher_index), b.transaction_index))
    });
    clearings.sort_by(|a, b| {
        (voucher_key(target, a.voucher_index), a.ap_transaction_index)
            .cmp(&(voucher_key(target, b.voucher_index), b.ap_transaction_index))
    });

    let corrections: Vec<&CorrectionEvent> = carry
        .map(|year| {
            let mut list: Vec<&CorrectionEvent> = year
                .events
                .iter()
                .filter_map(|event| match event {
                    Event::Correction(c) if c.kind == CorrectionKind::Correction => Some(c),
                    _ => None,
                })
                .collect();
            list.sort_by(|a, b| {
                voucher_key(year, a.voucher_index).cmp(&voucher_key(year, b.voucher_index))
            });
            list
        })
        .unwrap_or_default();

    let mut used_clearings: HashSet<usize> = HashSet::new();
    let mut used_corrections: HashSet<usize> = HashSet::new();
    let mut cases = Vec::with_capacity(receipts.len());

    for receipt in &receipts {
        if let Some(chosen) = best_clearing(receipt, &clearings, &used_clearings, target, config) {
            assert!(
                used_clearings.insert(chosen),
                "clearing consumed twice — matcher invariant broken"
            );
            cases.push(matched_case(receipt, clearings[chosen], target));
            continue;
        }

        if let Some((chosen, confidence)) =
            settle_by_correction(receipt, &corrections, &used_corrections, target, config)
        {
            used_corrections.insert(chosen);
            debug!(
                "receipt {} settled by cross-year correction",
                target.voucher(receipt.voucher_index).id()
            );
            cases.push(InvoiceCase {
                receipt: Some((*receipt).clone()),
                settlement: Some(Settlement::Correction(corrections[chosen].clone())),
                status: CaseStatus::Ok,
                confidence,
                comment: "Cleared by cross-year correction".into(),
            });
            continue;
        }

        cases.push(unmatched_receipt_case(receipt, config));
    }

    // Orphan clearings keep their sorted order.
    for (index, clearing) in clearings.iter().enumerate() {
        if used_clearings.contains(&index) {
            continue;
        }
        cases.push(InvoiceCase {
            receipt: None,
            settlement: Some(Settlement::Clearing((*clearing).clone())),
            status: CaseStatus::MissingReceipt,
            confidence: 0,
            comment: "No matching receipt found".into(),
        });
    }

    let summary = year_summary(&target.vouchers, target.year, opening_balance, &cases, config);
    RunReport {
        year: target.year,
        cases,
        summary,
    }
}

/// Reconcile consecutive classified years, oldest first.
///
/// Each year's closing balance becomes the next year's opening balance,
/// and each following year serves as its predecessor's carry-over set.
pub fn reconcile_chain(
    years: &[ClassifiedYear],
    opening_balance: Decimal,
    config: &Config,
) -> Vec<RunReport> {
    let mut reports = Vec::with_capacity(years.len());
    let mut opening = opening_balance;
    for (i, year) in years.iter().enumerate() {
        let report = reconcile(year, years.get(i + 1), opening, config);
        opening = report.summary.closing_balance;
        reports.push(report);
    }
    reports
}

fn voucher_key<'y>(year: &'y ClassifiedYear, index: usize) -> (&'y str, u32) {
    let voucher = year.voucher(index);
    (voucher.series.as_str(), voucher.number)
}

fn supplier_matches(a: &Option<String>, b: &Option<String>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => !a.is_empty() && a.to_lowercase() == b.to_lowercase(),
        _ => false,
    }
}

fn invoice_matches(a: &Option<String>, b: &Option<String>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => !a.is_empty() && a == b,
        _ => false,
    }
}

/// Candidate generation and three-key ranking, with a deterministic
/// tie-break by clearing voucher id.
fn best_clearing(
    receipt: &ReceiptEvent,
    clearings: &[&ClearingEvent],
    used: &HashSet<usize>,
    target: &ClassifiedYear,
    config: &Config,
) -> Option<usize> {
    let receipt_date = target.voucher(receipt.voucher_index).date;

    let mut best: Option<((bool, bool, i64, String, u32, usize), usize)> = None;
    for (index, clearing) in clearings.iter().enumerate() {
        if used.contains(&index) {
            continue;
        }
        if !config.abs_amounts_equal(receipt.ap_amount, clearing.ap_amount) {
            continue;
        }
        let clearing_voucher = target.voucher(clearing.voucher_index);
        let days = (clearing_voucher.date - receipt_date).num_days();
        if days < 0 || days > config.max_days {
            continue;
        }

        let supplier = supplier_matches(&receipt.supplier, &clearing.supplier);
        let invoice = invoice_matches(&receipt.invoice_number, &clearing.invoice_number);
        let key = (
            !(supplier && invoice),
            !invoice,
            days,
            clearing_voucher.series.clone(),
            clearing_voucher.number,
            clearing.ap_transaction_index,
        );
        if best.as_ref().is_none_or(|(current, _)| key < *current) {
            best = Some((key, index));
        }
    }
    best.map(|(_, index)| index)
}

fn matched_case(
    receipt: &ReceiptEvent,
    clearing: &ClearingEvent,
    target: &ClassifiedYear,
) -> InvoiceCase {
    let supplier = supplier_matches(&receipt.supplier, &clearing.supplier);
    let invoice = invoice_matches(&receipt.invoice_number, &clearing.invoice_number);
    let confidence = match (supplier, invoice) {
        (true, true) => 100,
        (false, true) => 75,
        (true, false) => 50,
        (false, false) => 25,
    };

    let days = (target.voucher(clearing.voucher_index).date
        - target.voucher(receipt.voucher_index).date)
        .num_days();
    let mut comment = if receipt.voucher_index == clearing.voucher_index {
        "Receipt and clearing in same voucher".to_string()
    } else {
        format!("Clearing found {days} days after receipt")
    };
    match (supplier, invoice) {
        (true, true) => {}
        (false, true) => comment.push_str("; supplier mismatch"),
        (true, false) => comment.push_str("; invoice number mismatch"),
        (false, false) => comment.push_str("; matched on amount and date only"),
    }

    let status = if clearing.bank_pair_by_position {
        comment.push_str("; bank line chosen by position");
        CaseStatus::NeedsReview
    } else {
        CaseStatus::Ok
    };

    InvoiceCase {
        receipt: Some(receipt.clone()),
        settlement: Some(Settlement::Clearing(clearing.clone())),
        status,
        confidence,
        comment,
    }
}

/// A carry-over correction settles a still-unmatched receipt when it
/// references the receipt's voucher by id, or failing that when amount
/// and supplier both agree.
fn settle_by_correction(
    receipt: &ReceiptEvent,
    corrections: &[&CorrectionEvent],
    used: &HashSet<usize>,
    target: &ClassifiedYear,
    config: &Config,
) -> Option<(usize, u8)> {
    let receipt_voucher = target.voucher(receipt.voucher_index);

    // An explicit voucher reference outranks a fuzzy amount+supplier hit.
    for (index, correction) in corrections.iter().enumerate() {
        if used.contains(&index) {
            continue;
        }
        let references = correction.target.as_ref().is_some_and(|t| {
            t.series == receipt_voucher.series && t.number == receipt_voucher.number
        });
        if references {
            return Some((index, 100));
        }
    }
    for (index, correction) in corrections.iter().enumerate() {
        if used.contains(&index) {
            continue;
        }
        if config.abs_amounts_equal(receipt.ap_amount, correction.ap_amount)
            && supplier_matches(&receipt.supplier, &correction.supplier)
        {
            return Some((index, 75));
        }
    }
    None
}

fn unmatched_receipt_case(receipt: &ReceiptEvent, config: &Config) -> InvoiceCase {
    let comment = if receipt.is_credit_note {
        format!("No clearing found within {} days (credit note)", config.max_days)
    } else {
        format!("No clearing found within {} days", config.max_days)
    };
    InvoiceCase {
        receipt: Some(receipt.clone()),
        settlement: None,
        status: CaseStatus::MissingClearing,
        confidence: 0,
        comment,
    }
}
