//! Year-scoped correction-pair exclusion.

use std::collections::{HashMap, HashSet};

use tracing::info;

use super::describe::correction_marker;
use crate::core::Voucher;

/// Compute the vouchers withheld from matching because they form a
/// correction pair within the target year.
///
/// Voucher `X` pairs with voucher `Y` when either one's description
/// carries a correction marker referencing the other. Both members go
/// into the exclude set **only** when both transaction dates fall in
/// the target year: identifiers are sequential within a series and
/// reset between fiscal years, so an id match across years says
/// nothing.
pub fn correction_exclusions(vouchers: &[Voucher], target_year: i32) -> HashSet<usize> {
    let mut by_id: HashMap<String, Vec<usize>> = HashMap::new();
    for (i, voucher) in vouchers.iter().enumerate() {
        if voucher.year() == target_year {
            by_id.entry(voucher.id()).or_default().push(i);
        }
    }

    let mut excluded = HashSet::new();
    for (i, voucher) in vouchers.iter().enumerate() {
        if voucher.year() != target_year {
            continue;
        }
        let Some((_, Some(target))) = correction_marker(&voucher.description) else {
            continue;
        };
        let Some(partners) = by_id.get(&target.id()) else {
            continue;
        };
        for &partner in partners {
            if partner == i {
                continue;
            }
            info!(
                "excluding correction pair {} / {} in {target_year}",
                voucher.id(),
                vouchers[partner].id()
            );
            excluded.insert(i);
            excluded.insert(partner);
        }
    }
    excluded
}
