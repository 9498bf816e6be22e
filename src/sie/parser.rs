//! Line-oriented SIE voucher parser.
//!
//! The file format is a sequence of `#`-prefixed directives. Header
//! directives come first; each voucher is a `#VER` line followed by a
//! `{` … `}` block of `#TRANS` lines. The parser is a two-state
//! machine over the lines; per-voucher damage is logged and skipped,
//! never fatal.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::encoding::decode_bytes;
use crate::core::{AvstamningError, Config, Transaction, Voucher};

/// One fiscal-year span from a `#RAR` directive. Index 0 is the file's
/// current year, -1 the previous, and so on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiscalYear {
    pub index: i32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Header metadata recorded from directives outside voucher blocks.
///
/// The decoder records these but does not interpret them; they are
/// surfaced so reports can cite company, currency, and origin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SieMeta {
    /// `#FNAMN`: company name.
    pub company_name: Option<String>,
    /// `#ORGNR`: organisation number.
    pub org_number: Option<String>,
    /// `#VALUTA`: ISO currency code. SIE files without one are SEK.
    pub currency: Option<String>,
    /// `#SIETYP`: file type (4 for full voucher exports).
    pub sie_type: Option<String>,
    /// `#PROGRAM`: exporting program and version.
    pub program: Option<String>,
    /// `#FORMAT`: declared encoding label (informational only; the
    /// byte-level probe decides).
    pub format: Option<String>,
    /// `#GEN`: file generation date.
    pub generated: Option<NaiveDate>,
    /// `#RAR`: fiscal-year spans.
    pub fiscal_years: Vec<FiscalYear>,
    /// `#KONTO`: account number to name.
    pub account_names: BTreeMap<String, String>,
    /// Source path when the file was read from disk.
    pub source: Option<String>,
}

/// A decoded SIE file: header metadata plus vouchers in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SieFile {
    pub meta: SieMeta,
    pub vouchers: Vec<Voucher>,
}

/// Directives the decoder accepts without recording. Anything else
/// outside a block draws a warning.
const KNOWN_DIRECTIVES: &[&str] = &[
    "#FLAGGA", "#KPTYP", "#ADRESS", "#FTYP", "#TAXAR", "#OMFATTN", "#IB", "#UB", "#RES", "#OIB",
    "#OUB", "#DIM", "#UNDERDIM", "#OBJEKT", "#ENHET", "#SRU", "#BKOD", "#PROSA", "#PSALDO",
    "#PBUDGET", "#KTYP",
];

/// Read and parse an SIE file from disk.
///
/// Structural problems (unreadable file, exhausted encoding probe) are
/// fatal; everything else degrades to per-voucher warnings.
pub fn read_sie_file(
    path: impl AsRef<Path>,
    config: &Config,
) -> Result<SieFile, AvstamningError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| AvstamningError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let (text, _) = decode_bytes(&bytes, config)?;
    let mut file = parse_sie(&text, config);
    file.meta.source = Some(path.display().to_string());
    Ok(file)
}

/// Parse already-decoded SIE text into vouchers.
///
/// Never fails: malformed vouchers are skipped with a logged error and
/// unbalanced ones are emitted with a warning, so the output reproduces
/// the input data faithfully.
pub fn parse_sie(text: &str, config: &Config) -> SieFile {
    Parser::new(config).run(text)
}

enum State {
    Outside,
    /// `#VER` seen, `{` expected next.
    Staged(PendingVoucher),
    /// Inside a `{` … `}` block.
    Inside(PendingVoucher),
    /// Swallowing a block that has no usable voucher header.
    Discard,
}

struct PendingVoucher {
    voucher: Voucher,
    malformed: bool,
}

struct Parser<'c> {
    config: &'c Config,
    meta: SieMeta,
    vouchers: Vec<Voucher>,
}

impl<'c> Parser<'c> {
    fn new(config: &'c Config) -> Self {
        Self {
            config,
            meta: SieMeta::default(),
            vouchers: Vec::new(),
        }
    }

    fn run(mut self, text: &str) -> SieFile {
        let mut state = State::Outside;

        for (line_no, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            state = self.step(state, line, line_no + 1);
        }

        match state {
            State::Outside | State::Discard => {}
            State::Staged(pending) => {
                warn!(
                    "voucher {} has no transaction block at end of file; skipped",
                    pending.voucher.id()
                );
            }
            State::Inside(pending) => {
                warn!(
                    "unterminated transaction block for voucher {} at end of file",
                    pending.voucher.id()
                );
                self.finish_voucher(pending);
            }
        }

        SieFile {
            meta: self.meta,
            vouchers: self.vouchers,
        }
    }

    fn step(&mut self, state: State, line: &str, line_no: usize) -> State {
        match state {
            State::Outside => self.step_outside(line, line_no),
            State::Staged(pending) => self.step_staged(pending, line, line_no),
            State::Inside(pending) => self.step_inside(pending, line, line_no),
            State::Discard => {
                if line == "}" {
                    State::Outside
                } else {
                    State::Discard
                }
            }
        }
    }

    fn step_outside(&mut self, line: &str, line_no: usize) -> State {
        if line == "{" {
            warn!("line {line_no}: transaction block without voucher header; ignored");
            return State::Discard;
        }
        if line == "}" {
            warn!("line {line_no}: stray closing brace; ignored");
            return State::Outside;
        }

        let fields = split_fields(line);
        match fields.first().map(String::as_str) {
            Some("#VER") => match parse_ver(&fields) {
                Some(voucher) => State::Staged(PendingVoucher {
                    voucher,
                    malformed: false,
                }),
                None => {
                    warn!("line {line_no}: unparseable #VER line '{line}'; voucher skipped");
                    State::Discard
                }
            },
            Some(directive) if directive.starts_with('#') => {
                self.record_header(directive, &fields, line_no);
                State::Outside
            }
            _ => {
                debug!("line {line_no}: ignoring non-directive line '{line}'");
                State::Outside
            }
        }
    }

    fn step_staged(&mut self, pending: PendingVoucher, line: &str, line_no: usize) -> State {
        if line == "{" {
            return State::Inside(pending);
        }
        warn!(
            "line {line_no}: voucher {} has no transaction block; skipped",
            pending.voucher.id()
        );
        // Reprocess the current line from the outside state.
        self.step_outside(line, line_no)
    }

    fn step_inside(&mut self, mut pending: PendingVoucher, line: &str, line_no: usize) -> State {
        if line == "}" {
            self.finish_voucher(pending);
            return State::Outside;
        }

        let fields = split_fields(line);
        if fields.first().map(String::as_str) == Some("#TRANS") {
            match parse_trans(&fields) {
                Some(transaction) => pending.voucher.transactions.push(transaction),
                None => {
                    warn!(
                        "line {line_no}: unparseable #TRANS line '{line}' in voucher {}",
                        pending.voucher.id()
                    );
                    pending.malformed = true;
                }
            }
        } else {
            warn!(
                "line {line_no}: ignoring non-#TRANS line '{line}' in voucher {}",
                pending.voucher.id()
            );
        }
        State::Inside(pending)
    }

    fn finish_voucher(&mut self, pending: PendingVoucher) {
        let voucher = pending.voucher;
        if pending.malformed {
            warn!("skipping malformed voucher {}", voucher.id());
            return;
        }
        if voucher.transactions.is_empty() {
            warn!("skipping voucher {} without transactions", voucher.id());
            return;
        }

        let imbalance = voucher.imbalance();
        if !self.config.is_balanced(imbalance) {
            warn!("voucher {} does not balance ({imbalance})", voucher.id());
        }
        self.vouchers.push(voucher);
    }

    fn record_header(&mut self, directive: &str, fields: &[String], line_no: usize) {
        let arg = |i: usize| fields.get(i).cloned();
        match directive {
            "#FNAMN" => self.meta.company_name = arg(1),
            "#ORGNR" => self.meta.org_number = arg(1),
            "#VALUTA" => self.meta.currency = arg(1),
            "#SIETYP" => self.meta.sie_type = arg(1),
            "#FORMAT" => self.meta.format = arg(1),
            "#PROGRAM" => {
                let joined = fields[1..].join(" ");
                if !joined.is_empty() {
                    self.meta.program = Some(joined);
                }
            }
            "#GEN" => match arg(1).as_deref().map(parse_date) {
                Some(Some(date)) => self.meta.generated = Some(date),
                _ => warn!("line {line_no}: unparseable #GEN date"),
            },
            "#RAR" => {
                let parsed = (|| {
                    Some(FiscalYear {
                        index: fields.get(1)?.parse().ok()?,
                        start: parse_date(fields.get(2)?)?,
                        end: parse_date(fields.get(3)?)?,
                    })
                })();
                match parsed {
                    Some(fy) => self.meta.fiscal_years.push(fy),
                    None => warn!("line {line_no}: unparseable #RAR directive"),
                }
            }
            "#KONTO" => {
                if let (Some(number), Some(name)) = (arg(1), arg(2)) {
                    self.meta.account_names.insert(number, name);
                } else {
                    warn!("line {line_no}: unparseable #KONTO directive");
                }
            }
            other if KNOWN_DIRECTIVES.contains(&other) => {
                debug!("recorded header directive {other}");
            }
            other => {
                warn!("line {line_no}: unrecognized header directive {other}");
            }
        }
    }
}

/// Split a directive line into fields.
///
/// Double quotes delimit a single field that may contain spaces (the
/// quotes themselves are dropped); a `{` … `}` run is one field with
/// the braces kept, so callers can tell an object list from a bare
/// token. Whitespace runs separate fields.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut started = false;
    let mut in_quote = false;
    let mut in_brace = false;

    for ch in line.chars() {
        if in_quote {
            if ch == '"' {
                in_quote = false;
            } else {
                current.push(ch);
            }
            continue;
        }
        if in_brace {
            current.push(ch);
            if ch == '}' {
                in_brace = false;
            }
            continue;
        }
        match ch {
            '"' => {
                in_quote = true;
                started = true;
            }
            '{' => {
                current.push(ch);
                in_brace = true;
                started = true;
            }
            c if c.is_whitespace() => {
                if started {
                    fields.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            c => {
                current.push(c);
                started = true;
            }
        }
    }
    if started {
        fields.push(current);
    }
    fields
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    if s.len() != 8 {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y%m%d").ok()
}

/// Parse `#VER <series> <number> <yyyymmdd> <description> [<yyyymmdd>]`.
fn parse_ver(fields: &[String]) -> Option<Voucher> {
    let series = fields.get(1)?.clone();
    if series.is_empty() {
        return None;
    }
    let number: u32 = fields.get(2)?.parse().ok()?;
    let date = parse_date(fields.get(3)?)?;
    let description = fields.get(4).cloned().unwrap_or_default();
    let reg_date = fields.get(5).and_then(|s| parse_date(s));

    Some(Voucher {
        series,
        number,
        date,
        reg_date,
        description,
        transactions: Vec::new(),
    })
}

/// Parse `#TRANS <account> {<objects>} <amount> [<yyyymmdd>] [<description>]`.
///
/// The object list is accepted but not interpreted. Some exports omit
/// it entirely, in which case the amount follows the account directly.
fn parse_trans(fields: &[String]) -> Option<Transaction> {
    let account = fields.get(1)?;
    if account.is_empty() || !account.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let mut rest = 2;
    if fields.get(rest).is_some_and(|f| f.starts_with('{')) {
        rest += 1;
    }

    let amount = Decimal::from_str(fields.get(rest)?).ok()?;
    rest += 1;

    let mut date = None;
    let mut description = None;
    for field in &fields[rest.min(fields.len())..] {
        if date.is_none() && description.is_none() {
            if let Some(d) = parse_date(field) {
                date = Some(d);
                continue;
            }
        }
        if description.is_none() {
            description = Some(field.clone());
        }
    }
    Some(Transaction {
        account: account.clone(),
        amount,
        date,
        description,
    })
}
