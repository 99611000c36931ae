use std::collections::{BTreeMap, BTreeSet};

use crate::config::*;

/// Compares the votes of a legislator with the stances of an organization.
///
/// Arguments:
/// * `yeas`, `nays` the bills the legislator voted for and against
/// * `positions` the stances of the organization, keyed by bill number
/// * `restrict_to` if provided, bills outside of this set are ignored entirely
///
/// Bills the legislator did not vote on do not count. When no bill can be
/// compared, the alignment is `None`.
pub fn calculate_alignment(
    yeas: &BTreeSet<String>,
    nays: &BTreeSet<String>,
    positions: &BTreeMap<String, Stance>,
    restrict_to: Option<&BTreeSet<String>>,
) -> AlignmentScore {
    let mut agreements: u32 = 0;
    let mut disagreements: u32 = 0;
    for (bill, stance) in positions.iter() {
        if let Some(allowed) = restrict_to {
            if !allowed.contains(bill) {
                continue;
            }
        }
        let voted_yea = if yeas.contains(bill) {
            true
        } else if nays.contains(bill) {
            false
        } else {
            // Absent, excused or not voted yet.
            continue;
        };
        match (voted_yea, stance) {
            (true, Stance::Support) | (false, Stance::Oppose) => agreements += 1,
            (true, Stance::Oppose) | (false, Stance::Support) => disagreements += 1,
            (_, Stance::NoStance) => {}
        }
    }
    let total = agreements + disagreements;
    if total == 0 {
        return AlignmentScore::EMPTY;
    }
    AlignmentScore {
        alignment: Some(percentage(agreements, total)),
        agreements,
        disagreements,
    }
}

// Percentage rounded to one decimal place. The exact value of the float is
// rounded, ties to even: 6.25 gives 6.2 and 31.25 gives 31.2.
fn percentage(part: u32, total: u32) -> f64 {
    let p = part as f64 / total as f64 * 100.0;
    format!("{:.1}", p).parse::<f64>().unwrap_or(p)
}
