//! Per-voucher event classification.
//!
//! The sign conventions on the accounts-payable account drive the
//! interpretation: a credit (negative) recognizes a liability, a debit
//! (positive) reduces one. A bank line with opposite sign and equal
//! absolute amount turns the line into a settlement.

use rust_decimal::Decimal;
use tracing::info;

use super::describe::{correction_marker, extract_fields};
use super::event::{ClearingEvent, CorrectionEvent, Event, ReceiptEvent};
use crate::core::{Config, Transaction, Voucher};

/// Classify one voucher into zero or more events.
///
/// Emits up to one receipt or clearing per accounts-payable line, plus
/// a correction event when the description carries a marker, plus an
/// exclusion for self-canceling vouchers.
pub fn classify_voucher(vouchers: &[Voucher], index: usize, config: &Config) -> Vec<Event> {
    let voucher = &vouchers[index];
    let mut events = Vec::new();

    // A correction marker is recorded in addition to any posting-level
    // events, so a following year can consult it for carry-over
    // settlement.
    if let Some((kind, target)) = correction_marker(&voucher.description) {
        let extracted = extract_fields(&voucher.description);
        events.push(Event::Correction(CorrectionEvent {
            voucher_index: index,
            kind,
            target,
            ap_amount: voucher.sum_for(&config.ap_account),
            supplier: extracted.supplier,
        }));
    }

    let ap_lines: Vec<(usize, &Transaction)> =
        voucher.transactions_on(&config.ap_account).collect();
    if ap_lines.is_empty() {
        return events;
    }

    // Self-canceling: invoice and credit note booked together, nothing
    // paid. The voucher emits no posting events at all.
    if !voucher.has_account(&config.bank_account)
        && config.is_balanced(voucher.sum_for(&config.ap_account))
    {
        info!("excluding self-canceling voucher {}", voucher.id());
        events.push(Event::Excluded {
            voucher_index: index,
        });
        return events;
    }

    let extracted = extract_fields(&voucher.description);
    for (transaction_index, transaction) in ap_lines {
        match bank_partner(voucher, transaction.amount, config) {
            Some((bank_index, bank, by_position)) => {
                events.push(Event::Clearing(ClearingEvent {
                    voucher_index: index,
                    ap_transaction_index: transaction_index,
                    bank_transaction_index: bank_index,
                    ap_amount: transaction.amount,
                    bank_amount: bank.amount,
                    supplier: extracted.supplier.clone(),
                    invoice_number: extracted.invoice_number.clone(),
                    bank_pair_by_position: by_position,
                }));
            }
            None => {
                events.push(Event::Receipt(ReceiptEvent {
                    voucher_index: index,
                    transaction_index,
                    ap_amount: transaction.amount,
                    is_credit_note: transaction.amount > Decimal::ZERO,
                    supplier: extracted.supplier.clone(),
                    invoice_number: extracted.invoice_number.clone(),
                }));
            }
        }
    }

    events
}

/// Choose the bank line that settles an accounts-payable line.
///
/// The first bank line with equal absolute amount and opposite sign
/// wins. A debit (positive) line in a voucher that has bank lines but
/// no such partner still clears, against the first bank line, flagged
/// so the case lands in review. A credit line with no opposite-sign
/// partner is not a settlement at all: that keeps a same-voucher
/// receipt+payment pair classifying as one receipt and one clearing,
/// and lets credit-note refunds (bank debit) flow through the same
/// path as ordinary payments.
fn bank_partner<'v>(
    voucher: &'v Voucher,
    ap_amount: Decimal,
    config: &'v Config,
) -> Option<(usize, &'v Transaction, bool)> {
    let mut first_bank = None;
    for (i, t) in voucher.transactions_on(&config.bank_account) {
        if first_bank.is_none() {
            first_bank = Some((i, t));
        }
        let opposite = (ap_amount > Decimal::ZERO) != (t.amount > Decimal::ZERO);
        if opposite && config.abs_amounts_equal(ap_amount, t.amount) {
            return Some((i, t, false));
        }
    }
    if ap_amount > Decimal::ZERO {
        first_bank.map(|(i, t)| (i, t, true))
    } else {
        None
    }
}
