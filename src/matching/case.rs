use serde::{Deserialize, Serialize};

use crate::classify::{ClearingEvent, CorrectionEvent, ReceiptEvent};

/// Reconciliation outcome of one case row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseStatus {
    /// Receipt and settlement paired within tolerance.
    Ok,
    /// Receipt with no clearing inside the window.
    MissingClearing,
    /// Clearing no receipt claims.
    MissingReceipt,
    /// Paired, but a human should look (e.g. bank line chosen by
    /// position).
    NeedsReview,
    /// Conflicting data from enrichment sources. The core matcher
    /// never emits this; it resolves ties deterministically instead.
    Ambiguous,
}

impl CaseStatus {
    /// Report label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::MissingClearing => "Missing clearing",
            Self::MissingReceipt => "Missing receipt",
            Self::NeedsReview => "Needs review",
            Self::Ambiguous => "Ambiguous",
        }
    }

    /// Parse from a report label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "OK" => Some(Self::Ok),
            "Missing clearing" => Some(Self::MissingClearing),
            "Missing receipt" => Some(Self::MissingReceipt),
            "Needs review" => Some(Self::NeedsReview),
            "Ambiguous" => Some(Self::Ambiguous),
            _ => None,
        }
    }

    /// Whether the row is flagged for human review (the JA/NEJ column).
    pub fn needs_review(&self) -> bool {
        !matches!(self, Self::Ok)
    }
}

/// What settled a receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Settlement {
    /// A bank clearing from the target year (possibly the receipt's own
    /// voucher).
    Clearing(ClearingEvent),
    /// A correction from the carry-over year; its `voucher_index`
    /// points into the carry-over year's voucher vector.
    Correction(CorrectionEvent),
}

/// One row of the output: the unit of reconciliation outcome.
///
/// At least one of `receipt` and `settlement` is always present; both
/// present means a successful match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceCase {
    pub receipt: Option<ReceiptEvent>,
    pub settlement: Option<Settlement>,
    pub status: CaseStatus,
    /// Match confidence, 0–100.
    pub confidence: u8,
    /// Human-readable explanation of the outcome.
    pub comment: String,
}

impl InvoiceCase {
    /// The settling clearing, when the settlement is one.
    pub fn clearing(&self) -> Option<&ClearingEvent> {
        match &self.settlement {
            Some(Settlement::Clearing(c)) => Some(c),
            _ => None,
        }
    }

    /// The settling cross-year correction, when the settlement is one.
    pub fn correction(&self) -> Option<&CorrectionEvent> {
        match &self.settlement {
            Some(Settlement::Correction(c)) => Some(c),
            _ => None,
        }
    }
}
