#![cfg(feature = "report")]

use avstamning::classify::{ClassifiedYear, classify_year};
use avstamning::core::{Config, Transaction, Voucher};
use avstamning::matching::{CaseStatus, RunReport, reconcile};
use avstamning::report::{case_rows, render_csv, render_summary};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn voucher(
    series: &str,
    number: u32,
    date: (i32, u32, u32),
    description: &str,
    lines: &[(&str, Decimal)],
) -> Voucher {
    Voucher {
        series: series.into(),
        number,
        date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        reg_date: None,
        description: description.into(),
        transactions: lines
            .iter()
            .map(|(account, amount)| Transaction {
                account: (*account).into(),
                amount: *amount,
                date: None,
                description: None,
            })
            .collect(),
    }
}

fn matched_run() -> (ClassifiedYear, RunReport) {
    let config = Config::default();
    let year = classify_year(
        vec![
            voucher(
                "A",
                129,
                (2025, 3, 8),
                "Leverantörsfaktura - Mottagen - Elbolaget - 55001",
                &[("2440", dec!(-163.00)), ("4010", dec!(163.00))],
            ),
            voucher(
                "A",
                137,
                (2025, 3, 11),
                "Leverantörsfaktura - Betalat - Elbolaget - 55001",
                &[("2440", dec!(163.00)), ("1930", dec!(-163.00))],
            ),
            voucher(
                "A",
                358,
                (2025, 9, 1),
                "Leverantörsfaktura - Betalat - Ahlsell - 7466687907",
                &[("2440", dec!(330.00)), ("1930", dec!(-330.00))],
            ),
        ],
        2025,
        &config,
    );
    let report = reconcile(&year, None, dec!(0), &config);
    (year, report)
}

// --- Row shaping ---

#[test]
fn matched_case_fills_both_sides() {
    let (year, report) = matched_run();
    let rows = case_rows(&report, &year, None, Some("SEK"), Some("2025.se"));

    assert_eq!(rows.len(), 2);
    let row = &rows[0];
    assert!(!row.review);
    assert_eq!(row.receipt_voucher, "A129");
    assert_eq!(row.receipt_date, NaiveDate::from_ymd_opt(2025, 3, 8));
    assert_eq!(row.receipt_amount, Some(dec!(-163.00)));
    assert_eq!(row.supplier, "Elbolaget");
    assert_eq!(row.clearing_voucher, "A137");
    assert_eq!(row.clearing_ap_amount, Some(dec!(163.00)));
    assert_eq!(row.clearing_bank_amount, Some(dec!(-163.00)));
    assert_eq!(row.invoice_number, "55001");
    assert_eq!(row.currency, "SEK");
    assert_eq!(row.source_file, "2025.se");
    assert_eq!(row.status, CaseStatus::Ok);
    assert_eq!(row.confidence, 100);
}

#[test]
fn orphan_row_takes_fields_from_the_clearing() {
    let (year, report) = matched_run();
    let rows = case_rows(&report, &year, None, None, None);

    let orphan = &rows[1];
    assert!(orphan.review);
    assert_eq!(orphan.receipt_voucher, "");
    assert_eq!(orphan.receipt_amount, None);
    assert_eq!(orphan.clearing_voucher, "A358");
    assert_eq!(orphan.supplier, "Ahlsell");
    assert_eq!(orphan.invoice_number, "7466687907");
    assert_eq!(orphan.status, CaseStatus::MissingReceipt);
    // enrichment placeholders stay empty without metadata
    assert_eq!(orphan.currency, "");
    assert_eq!(orphan.source_file, "");
    assert_eq!(orphan.invoice_date, None);
    assert_eq!(orphan.total_amount, None);
}

#[test]
fn correction_settlement_resolves_against_the_carry_year() {
    let config = Config::default();
    let target = classify_year(
        vec![voucher(
            "A",
            49,
            (2024, 11, 20),
            "Leverantörsfaktura - Mottagen - Elbolaget - 123",
            &[("2440", dec!(-500.00)), ("4010", dec!(500.00))],
        )],
        2024,
        &config,
    );
    let carry = classify_year(
        vec![voucher(
            "B",
            3,
            (2025, 1, 15),
            "Korrigering av A49",
            &[("2440", dec!(500.00)), ("4010", dec!(-500.00))],
        )],
        2025,
        &config,
    );
    let report = reconcile(&target, Some(&carry), dec!(0), &config);
    let rows = case_rows(&report, &target, Some(&carry), None, None);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].clearing_voucher, "B3");
    assert_eq!(rows[0].clearing_date, NaiveDate::from_ymd_opt(2025, 1, 15));
    assert_eq!(rows[0].clearing_bank_amount, None);
}

// --- CSV rendering ---

#[test]
fn csv_uses_swedish_locale_and_crlf() {
    let (year, report) = matched_run();
    let rows = case_rows(&report, &year, None, Some("SEK"), None);
    let csv = render_csv(&rows);

    let mut lines = csv.split("\r\n");
    let header = lines.next().unwrap();
    assert!(header.starts_with("Granska;Verifikation;Datum;Belopp;Leverantör"));
    assert!(header.ends_with("Status;Säkerhet;Kommentar"));

    let first = lines.next().unwrap();
    assert!(first.starts_with("\"NEJ\";\"A129\";2025-03-08;-163,00;\"Elbolaget\""));
    assert!(first.contains("\"OK\";100;"));

    let second = lines.next().unwrap();
    assert!(second.starts_with("\"JA\";\"\";;;\"Ahlsell\""));

    // header + 2 rows + trailing terminator
    assert_eq!(csv.matches("\r\n").count(), 3);
}

#[test]
fn summary_block_renders_key_values() {
    let (_, report) = matched_run();
    let summary = render_summary(&report.summary);

    assert!(summary.contains("År;2025\r\n"));
    assert!(summary.contains("Ingående saldo;0,00\r\n"));
    assert!(summary.contains("Kreditsumma;163,00\r\n"));
    assert!(summary.contains("Debetsumma;493,00\r\n"));
    assert!(summary.contains("Periodens förändring;-330,00\r\n"));
    assert!(summary.contains("Utgående saldo;-330,00\r\n"));
    assert!(summary.contains("Antal rader;2\r\n"));
}
