use log::debug;
use std::collections::BTreeSet;

use crate::config::Bill;

/// Returns the bills whose combined votes against reach the threshold.
///
/// Missing vote counts are zero: a bill with no vote data is only contested
/// with a threshold of 0.
pub fn contested_bills(bills: &[Bill], threshold: u64) -> BTreeSet<String> {
    let res: BTreeSet<String> = bills
        .iter()
        .filter(|b| b.votes_against() >= threshold)
        .map(|b| b.bill_number.clone())
        .collect();
    debug!(
        "contested_bills: {} of {} bills have at least {} votes against",
        res.len(),
        bills.len(),
        threshold
    );
    res
}
