use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One posting line within a voucher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Four-digit BAS account code (e.g. "2440").
    pub account: String,
    /// Signed amount in the file's declared currency.
    /// Positive = debit (debet), negative = credit (kredit). Zero is legal.
    pub amount: Decimal,
    /// Per-line transaction date; inherits the voucher date when absent.
    pub date: Option<NaiveDate>,
    /// Per-line free text; inherits the voucher description when absent.
    pub description: Option<String>,
}

/// A balanced group of transactions, the atom of bookkeeping
/// (*verifikation*).
///
/// Identified by series letter(s) plus a sequential number. Numbers are
/// only unique within one fiscal year: they reset or overlap between
/// years, which is why every year-crossing comparison in this crate is
/// scoped to a target year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voucher {
    /// Series letter(s), e.g. "A".
    pub series: String,
    /// Sequential number within the series.
    pub number: u32,
    /// Transaction date (primary).
    pub date: NaiveDate,
    /// Registration date, when the file carries one.
    pub reg_date: Option<NaiveDate>,
    /// Free text, possibly holding ` - `-separated sub-fields.
    pub description: String,
    /// Posting lines in file order.
    pub transactions: Vec<Transaction>,
}

impl Voucher {
    /// The identifier as presented in reports and descriptions, e.g. `A129`.
    pub fn id(&self) -> String {
        format!("{}{}", self.series, self.number)
    }

    /// Calendar year of the transaction date.
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// All transactions posted to the given account, in file order.
    pub fn transactions_on<'a>(
        &'a self,
        account: &'a str,
    ) -> impl Iterator<Item = (usize, &'a Transaction)> {
        self.transactions
            .iter()
            .enumerate()
            .filter(move |(_, t)| t.account == account)
    }

    /// Whether any line is posted to the given account.
    pub fn has_account(&self, account: &str) -> bool {
        self.transactions.iter().any(|t| t.account == account)
    }

    /// Signed sum of all lines on the given account.
    pub fn sum_for(&self, account: &str) -> Decimal {
        self.transactions
            .iter()
            .filter(|t| t.account == account)
            .map(|t| t.amount)
            .sum()
    }

    /// Signed sum over all lines. Zero (within tolerance) for a balanced
    /// voucher.
    pub fn imbalance(&self) -> Decimal {
        self.transactions.iter().map(|t| t.amount).sum()
    }

    /// Ordering key: series lexicographic, then number numeric.
    pub fn sort_key(&self) -> (&str, u32) {
        (self.series.as_str(), self.number)
    }
}
