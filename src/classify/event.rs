use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::describe::{CorrectionKind, VoucherRef};

/// A liability-creation or liability-reduction line on the
/// accounts-payable account with no same-voucher bank settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptEvent {
    /// Index of the originating voucher in the run's voucher vector.
    pub voucher_index: usize,
    /// Index of the accounts-payable line within that voucher.
    pub transaction_index: usize,
    /// Signed accounts-payable amount.
    pub ap_amount: Decimal,
    /// True when the sign is debit, meaning a credit note was received.
    pub is_credit_note: bool,
    pub supplier: Option<String>,
    pub invoice_number: Option<String>,
}

/// An accounts-payable movement settled through the bank account in the
/// same voucher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearingEvent {
    pub voucher_index: usize,
    pub ap_transaction_index: usize,
    pub bank_transaction_index: usize,
    /// Signed accounts-payable amount.
    pub ap_amount: Decimal,
    /// Signed bank amount.
    pub bank_amount: Decimal,
    pub supplier: Option<String>,
    pub invoice_number: Option<String>,
    /// No bank line had equal absolute amount and opposite sign; the
    /// partner was picked by position and the case needs review.
    pub bank_pair_by_position: bool,
}

/// A voucher declaring itself part of a correction, kept around so a
/// later year can settle a receipt the correction reverses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionEvent {
    pub voucher_index: usize,
    pub kind: CorrectionKind,
    /// Voucher reference following the marker word, when present.
    pub target: Option<VoucherRef>,
    /// Signed sum of the voucher's accounts-payable lines.
    pub ap_amount: Decimal,
    pub supplier: Option<String>,
}

/// One classified observation about a voucher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Receipt(ReceiptEvent),
    Clearing(ClearingEvent),
    Correction(CorrectionEvent),
    /// Self-canceling voucher: accounts-payable lines sum to zero and
    /// there is no bank line: an invoice and its credit note booked
    /// together with no payment.
    Excluded { voucher_index: usize },
}

impl Event {
    /// The originating voucher's index, for any variant.
    pub fn voucher_index(&self) -> usize {
        match self {
            Self::Receipt(e) => e.voucher_index,
            Self::Clearing(e) => e.voucher_index,
            Self::Correction(e) => e.voucher_index,
            Self::Excluded { voucher_index } => *voucher_index,
        }
    }
}
