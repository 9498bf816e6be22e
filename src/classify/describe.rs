//! Heuristics over voucher description text.
//!
//! Descriptions carry structured sub-fields separated by a literal
//! ` - ` and, for corrections, a marker word plus a voucher reference.
//! Only the canonical shapes are recognized; anything else leaves the
//! extracted fields empty rather than guessing.

use serde::{Deserialize, Serialize};

/// Which side of a correction pair a marker word declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrectionKind {
    /// `korrigerad`: this voucher is the erroneous one, corrected later.
    Corrected,
    /// `Korrigering`: this voucher cancels another.
    Correction,
}

/// A `<series><digits>` voucher reference, e.g. `A532`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoucherRef {
    pub series: String,
    pub number: u32,
}

impl VoucherRef {
    pub fn id(&self) -> String {
        format!("{}{}", self.series, self.number)
    }
}

/// Supplier and invoice number pulled out of a canonical description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub supplier: Option<String>,
    pub invoice_number: Option<String>,
}

/// First tokens of the canonical supplier-invoice description shapes.
const CANONICAL_PREFIXES: [&str; 2] = ["Leverantörsfaktura", "Leverantörskreditfaktura"];

/// Split a description on the literal ` - ` delimiter.
pub fn split_description(description: &str) -> Vec<&str> {
    description.split(" - ").collect()
}

/// Extract supplier (field 2) and invoice number (digits-only prefix of
/// field 3, trailing parenthesized note stripped) from the canonical
/// shapes:
///
/// ```text
/// Leverantörsfaktura - Mottagen - <Supplier> - <Invoice#>[ (<note>)]
/// Leverantörskreditfaktura - Betalat - <Supplier> - <Invoice#>
/// ```
///
/// Descriptions that do not start with a recognized first token, or
/// have fewer fields than expected, yield empty fields.
pub fn extract_fields(description: &str) -> ExtractedFields {
    let fields = split_description(description);
    if fields.len() < 4 || !CANONICAL_PREFIXES.contains(&fields[0].trim()) {
        return ExtractedFields::default();
    }

    ExtractedFields {
        supplier: non_empty(fields[2]),
        invoice_number: invoice_number_of(fields[3]),
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn invoice_number_of(field: &str) -> Option<String> {
    let base = match field.find('(') {
        Some(i) => &field[..i],
        None => field,
    };
    let digits: String = base
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    (!digits.is_empty()).then_some(digits)
}

/// Scan a description for a correction marker and the voucher reference
/// that may follow it.
pub fn correction_marker(description: &str) -> Option<(CorrectionKind, Option<VoucherRef>)> {
    let words: Vec<&str> = description.split_whitespace().collect();
    for (i, word) in words.iter().enumerate() {
        let lower = trim_punctuation(word).to_lowercase();
        let kind = if lower.starts_with("korrigering") {
            CorrectionKind::Correction
        } else if lower.starts_with("korrigerad") {
            CorrectionKind::Corrected
        } else {
            continue;
        };
        let target = words[i + 1..]
            .iter()
            .find_map(|w| parse_voucher_ref(trim_punctuation(w)));
        return Some((kind, target));
    }
    None
}

/// Parse a single word as `<series><digits>`. Series is one or more
/// ASCII letters, the rest all digits; anything else is not a reference.
pub fn parse_voucher_ref(word: &str) -> Option<VoucherRef> {
    let digits_at = word.find(|c: char| c.is_ascii_digit())?;
    let (series, digits) = word.split_at(digits_at);
    if series.is_empty()
        || !series.chars().all(|c| c.is_ascii_alphabetic())
        || !digits.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }
    Some(VoucherRef {
        series: series.to_string(),
        number: digits.parse().ok()?,
    })
}

fn trim_punctuation(word: &str) -> &str {
    word.trim_matches(|c: char| matches!(c, ',' | '.' | '(' | ')' | ':' | ';'))
}
