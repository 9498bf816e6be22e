use std::process::ExitCode;

use avstamning::classify::classify_year;
use avstamning::core::Config;
use avstamning::matching::reconcile;
use avstamning::report::{case_rows, render_csv, render_summary};
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
        eprintln!("usage: csv_report <file.se> <year>");
        return ExitCode::FAILURE;
    };
    let Ok(year) = year.parse::<i32>() else {
        eprintln!("not a year: {year}");
        return ExitCode::FAILURE;
    };

    let config = Config::default();
    let file = match read_sie_file(&path, &config) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let currency = file.meta.currency.clone();
    let source = file.meta.source.clone();
    let target = classify_year(file.vouchers, year, &config);
    let report = reconcile(&target, None, dec!(0), &config);

    let rows = case_rows(
        &report,
        &target,
        None,
        currency.as_deref(),
        source.as_deref(),
    );
    print!("{}", render_csv(&rows));
    eprint!("{}", render_summary(&report.summary));
    ExitCode::SUCCESS
}
