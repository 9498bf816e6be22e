use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::fmt::Write as _;

use avstamning::classify::classify_year;
use avstamning::core::Config;
use avstamning::matching::reconcile;
use avstamning::sie::parse_sie;
use rust_decimal_macros::dec;

/// A synthetic year: 500 receipt/clearing pairs, three days apart.
fn build_year_text() -> String {
    let mut out = String::new();
    out.push_str("#FNAMN \"Benchbolaget AB\"\n#VALUTA SEK\n");
    for i in 0..500u32 {
        let day = 1 + (i % 25);
        let month = 1 + (i / 50) % 12;
        let amount = 100 + i;
        writeln!(
            out,
            "#VER A {} 2025{month:02}{day:02} \"Leverantörsfaktura - Mottagen - Bolag{} - {}\"",
            i * 2 + 1,
            i % 17,
            10_000 + i,
        )
        .unwrap();
        out.push_str("{\n");
        writeln!(out, "#TRANS 2440 {{}} -{amount}.00").unwrap();
        writeln!(out, "#TRANS 4010 {{}} {amount}.00").unwrap();
        out.push_str("}\n");
        writeln!(
            out,
            "#VER A {} 2025{month:02}{day:02} \"Leverantörsfaktura - Betalat - Bolag{} - {}\"",
            i * 2 + 2,
            i % 17,
            10_000 + i,
        )
        .unwrap();
        out.push_str("{\n");
        writeln!(out, "#TRANS 2440 {{}} {amount}.00").unwrap();
        writeln!(out, "#TRANS 1930 {{}} -{amount}.00").unwrap();
        out.push_str("}\n");
    }
    out
}

fn bench_parse(c: &mut Criterion) {
    let text = build_year_text();
    let config = Config::default();
    c.bench_function("parse_1000_vouchers", |b| {
        b.iter(|| parse_sie(black_box(&text), &config));
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let text = build_year_text();
    let config = Config::default();
    c.bench_function("decode_classify_match_1000_vouchers", |b| {
        b.iter(|| {
            let file = parse_sie(black_box(&text), &config);
            let year = classify_year(file.vouchers, 2025, &config);
            reconcile(&year, None, dec!(0), &config)
        });
    });
}

criterion_group!(benches, bench_parse, bench_pipeline);
criterion_main!(benches);
