use std::process::ExitCode;

use avstamning::classify::classify_year;
use avstamning::core::Config;
use avstamning::matching::{Settlement, reconcile};
use avstamning::sie::read_sie_file;
use rust_decimal_macros::dec;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "avstamning=warn".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(path), Some(year)) = (args.next(), args.next()) else {
        eprintln!("usage: reconcile <file.se> <year> [carry.se]");
        return ExitCode::FAILURE;
    };
    let year: i32 = match year.parse() {
        Ok(y) => y,
        Err(_) => {
            eprintln!("not a year: {year}");
            return ExitCode::FAILURE;
        }
    };

    let config = Config::default();
    let file = match read_sie_file(&path, &config) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    println!(
        "{} — {} vouchers",
        file.meta.company_name.as_deref().unwrap_or(&path),
        file.vouchers.len()
    );

    let target = classify_year(file.vouchers, year, &config);
    let carry = match args.next() {
        Some(carry_path) => match read_sie_file(&carry_path, &config) {
            Ok(carry_file) => Some(classify_year(carry_file.vouchers, year + 1, &config)),
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => None,
    };

    let report = reconcile(&target, carry.as_ref(), dec!(0), &config);

    for case in &report.cases {
        let receipt = case
            .receipt
            .as_ref()
            .map(|r| target.voucher(r.voucher_index).id())
            .unwrap_or_default();
        let settled = match &case.settlement {
            Some(Settlement::Clearing(c)) => target.voucher(c.voucher_index).id(),
            Some(Settlement::Correction(c)) => carry
                .as_ref()
                .map(|y| y.voucher(c.voucher_index).id())
                .unwrap_or_default(),
            None => String::new(),
        };
        println!(
            "{:12} {:8} -> {:8} {:3} {}",
            case.status.label(),
            receipt,
            settled,
            case.confidence,
            case.comment
        );
    }

    let s = &report.summary;
    println!(
        "\n{}: ingående {} + kredit {} - debet {} = utgående {}",
        s.year, s.opening_balance, s.kredit_sum, s.debet_sum, s.closing_balance
    );
    ExitCode::SUCCESS
}
