use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::classify::ClassifiedYear;
use crate::matching::{CaseStatus, InvoiceCase, RunReport, Settlement};

/// One report row with the full column set.
///
/// The enrichment placeholders (invoice date, total amount, currency,
/// source file) stay empty when the core alone produced the row; the
/// invoice number is filled from the receipt or, for orphans, the
/// clearing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRow {
    /// Renders as `JA` (needs review) or `NEJ`.
    pub review: bool,
    pub receipt_voucher: String,
    pub receipt_date: Option<NaiveDate>,
    pub receipt_amount: Option<Decimal>,
    pub supplier: String,
    pub description: String,
    pub clearing_voucher: String,
    pub clearing_date: Option<NaiveDate>,
    pub clearing_ap_amount: Option<Decimal>,
    pub clearing_bank_amount: Option<Decimal>,
    pub invoice_number: String,
    pub invoice_date: Option<NaiveDate>,
    pub total_amount: Option<Decimal>,
    pub currency: String,
    pub source_file: String,
    pub status: CaseStatus,
    pub confidence: u8,
    pub comment: String,
}

/// Flatten a run report into rows, resolving event back-references
/// against the voucher vectors.
///
/// `currency` and `source_file` fill the corresponding placeholder
/// columns when known (e.g. from the SIE header metadata); pass `None`
/// to leave them for downstream enrichment.
pub fn case_rows(
    report: &RunReport,
    target: &ClassifiedYear,
    carry: Option<&ClassifiedYear>,
    currency: Option<&str>,
    source_file: Option<&str>,
) -> Vec<CaseRow> {
    report
        .cases
        .iter()
        .map(|case| case_row(case, target, carry, currency, source_file))
        .collect()
}

fn case_row(
    case: &InvoiceCase,
    target: &ClassifiedYear,
    carry: Option<&ClassifiedYear>,
    currency: Option<&str>,
    source_file: Option<&str>,
) -> CaseRow {
    let mut row = CaseRow {
        review: case.status.needs_review(),
        receipt_voucher: String::new(),
        receipt_date: None,
        receipt_amount: None,
        supplier: String::new(),
        description: String::new(),
        clearing_voucher: String::new(),
        clearing_date: None,
        clearing_ap_amount: None,
        clearing_bank_amount: None,
        invoice_number: String::new(),
        invoice_date: None,
        total_amount: None,
        currency: currency.unwrap_or_default().to_string(),
        source_file: source_file.unwrap_or_default().to_string(),
        status: case.status,
        confidence: case.confidence,
        comment: case.comment.clone(),
    };

    if let Some(receipt) = &case.receipt {
        let voucher = target.voucher(receipt.voucher_index);
        row.receipt_voucher = voucher.id();
        row.receipt_date = Some(voucher.date);
        row.receipt_amount = Some(receipt.ap_amount);
        row.description = voucher.description.clone();
        if let Some(supplier) = &receipt.supplier {
            row.supplier = supplier.clone();
        }
        if let Some(number) = &receipt.invoice_number {
            row.invoice_number = number.clone();
        }
    }

    match &case.settlement {
        Some(Settlement::Clearing(clearing)) => {
            let voucher = target.voucher(clearing.voucher_index);
            row.clearing_voucher = voucher.id();
            row.clearing_date = Some(voucher.date);
            row.clearing_ap_amount = Some(clearing.ap_amount);
            row.clearing_bank_amount = Some(clearing.bank_amount);
            // Orphans take supplier, number, and text from the clearing.
            if case.receipt.is_none() {
                row.description = voucher.description.clone();
                if let Some(supplier) = &clearing.supplier {
                    row.supplier = supplier.clone();
                }
                if let Some(number) = &clearing.invoice_number {
                    row.invoice_number = number.clone();
                }
            }
        }
        Some(Settlement::Correction(correction)) => {
            if let Some(carry) = carry {
                let voucher = carry.voucher(correction.voucher_index);
                row.clearing_voucher = voucher.id();
                row.clearing_date = Some(voucher.date);
            }
            row.clearing_ap_amount = Some(correction.ap_amount);
        }
        None => {}
    }

    row
}
