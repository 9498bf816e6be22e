//! SIE file decoding: encoding probe plus voucher parser.
//!
//! The decoder is a pure function of its input: bytes in, an ordered
//! [`SieFile`] of vouchers out. It interprets header directives only
//! far enough to record them; the classifier and matcher carry the
//! domain semantics.

mod encoding;
mod parser;

pub use encoding::*;
pub use parser::*;
