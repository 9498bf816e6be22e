//! Report CSV rendering: semicolon separators, Swedish number format
//! (comma decimal separator), CRLF line endings.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::rows::CaseRow;
use crate::matching::RunSummary;

const HEADERS: [&str; 18] = [
    "Granska",
    "Verifikation",
    "Datum",
    "Belopp",
    "Leverantör",
    "Beskrivning",
    "Betalningsverifikation",
    "Betalningsdatum",
    "Betalningsbelopp",
    "Bankbelopp",
    "Fakturanummer",
    "Fakturadatum",
    "Totalbelopp",
    "Valuta",
    "Källfil",
    "Status",
    "Säkerhet",
    "Kommentar",
];

/// Render case rows as CSV, header line first.
pub fn render_csv(rows: &[CaseRow]) -> String {
    let mut out = String::new();

    for (i, header) in HEADERS.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        out.push_str(header);
    }
    out.push_str("\r\n");

    for row in rows {
        write_row(&mut out, row);
    }
    out
}

fn write_row(out: &mut String, row: &CaseRow) {
    push_text(out, if row.review { "JA" } else { "NEJ" });
    out.push(';');
    push_text(out, &row.receipt_voucher);
    out.push(';');
    push_date(out, row.receipt_date);
    out.push(';');
    push_amount(out, row.receipt_amount);
    out.push(';');
    push_text(out, &row.supplier);
    out.push(';');
    push_text(out, &row.description);
    out.push(';');
    push_text(out, &row.clearing_voucher);
    out.push(';');
    push_date(out, row.clearing_date);
    out.push(';');
    push_amount(out, row.clearing_ap_amount);
    out.push(';');
    push_amount(out, row.clearing_bank_amount);
    out.push(';');
    push_text(out, &row.invoice_number);
    out.push(';');
    push_date(out, row.invoice_date);
    out.push(';');
    push_amount(out, row.total_amount);
    out.push(';');
    push_text(out, &row.currency);
    out.push(';');
    push_text(out, &row.source_file);
    out.push(';');
    push_text(out, row.status.label());
    out.push(';');
    out.push_str(&row.confidence.to_string());
    out.push(';');
    push_text(out, &row.comment);
    out.push_str("\r\n");
}

/// Render the run summary as a key–value block.
pub fn render_summary(summary: &RunSummary) -> String {
    let mut out = String::new();
    let mut line = |key: &str, value: String| {
        out.push_str(key);
        out.push(';');
        out.push_str(&value);
        out.push_str("\r\n");
    };

    line("År", summary.year.to_string());
    line("Ingående saldo", format_amount(summary.opening_balance));
    line("Kreditsumma", format_amount(summary.kredit_sum));
    line("Debetsumma", format_amount(summary.debet_sum));
    line("Periodens förändring", format_amount(summary.period_change));
    line("Utgående saldo", format_amount(summary.closing_balance));
    line("Antal rader", summary.case_count.to_string());
    line("OK", summary.status_counts.ok.to_string());
    line("Saknar betalning", summary.status_counts.missing_clearing.to_string());
    line("Saknar kvitto", summary.status_counts.missing_receipt.to_string());
    line("Behöver granskas", summary.status_counts.needs_review.to_string());
    line("Tvetydig", summary.status_counts.ambiguous.to_string());
    out
}

/// Quote a text field, doubling embedded quotes.
fn push_text(out: &mut String, value: &str) {
    out.push('"');
    for ch in value.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
}

fn push_date(out: &mut String, value: Option<NaiveDate>) {
    if let Some(date) = value {
        out.push_str(&date.format("%Y-%m-%d").to_string());
    }
}

fn push_amount(out: &mut String, value: Option<Decimal>) {
    if let Some(amount) = value {
        out.push_str(&format_amount(amount));
    }
}

/// Format a Decimal the Swedish way: comma separator, 2 decimal places.
fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2)).replace('.', ",")
}
