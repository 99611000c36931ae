pub mod builder;
pub mod calculator;
mod config;
pub mod contested;
pub mod manual;
pub mod positions;

use log::{debug, info, warn};
use std::collections::{BTreeMap, BTreeSet, HashSet};

pub use crate::calculator::calculate_alignment;
pub use crate::config::*;
pub use crate::contested::contested_bills;
pub use crate::positions::{build_position_index, discover_schema, OrganizationSchema};

/// Computes the alignment of every legislator with every organization.
///
/// Arguments:
/// * `bills` the bills, with their vote counts and organization position fields
/// * `legislators` the legislators and their votes
/// * `rules` the rules that govern this computation
///
/// Each legislator is compared with each organization twice: once over all the
/// bills, once over the contested bills only. Pairs without any compared bill
/// are left out of the result.
///
/// The input is checked first and nothing is computed if it is malformed.
pub fn run_alignment(
    bills: &[Bill],
    legislators: &[Legislator],
    rules: &AlignmentRules,
) -> Result<AlignmentResult, AlignmentErrors> {
    info!(
        "Processing {:?} legislators, {:?} bills, rules: {:?}",
        legislators.len(),
        bills.len(),
        rules
    );
    checks(bills, legislators, rules)?;

    let schema = discover_schema(bills);
    if schema.is_empty() && !bills.is_empty() {
        warn!("No organization position field found in {} bills", bills.len());
    }
    let organizations = build_position_index(bills, &schema);
    let contested = contested_bills(bills, rules.contested_threshold);
    info!(
        "{} contested bills (threshold: {} votes against)",
        contested.len(),
        rules.contested_threshold
    );

    let mut total_votes_analyzed: u64 = 0;
    let mut res_legislators: BTreeMap<String, LegislatorAlignments> = BTreeMap::new();
    for leg in legislators.iter() {
        total_votes_analyzed += leg.total_votes();
        let la = legislator_alignments(leg, &organizations, &contested);
        debug!(
            "run_alignment: {}: {} votes, {} organizations compared, {} on contested bills",
            la.name,
            la.total_votes,
            la.all_votes.len(),
            la.contested_only.len()
        );
        res_legislators.insert(leg.name.clone(), la);
    }

    Ok(AlignmentResult {
        organizations,
        legislators: res_legislators,
        contested_bills: contested,
        total_bills: bills.len() as u64,
        total_votes_analyzed,
    })
}

/// All the alignments of one legislator. Organizations without any compared
/// bill are omitted for the corresponding policy.
pub fn legislator_alignments(
    legislator: &Legislator,
    organizations: &BTreeMap<OrgId, Organization>,
    contested: &BTreeSet<String>,
) -> LegislatorAlignments {
    let mut all_votes: BTreeMap<OrgId, AlignmentScore> = BTreeMap::new();
    let mut contested_only: BTreeMap<OrgId, AlignmentScore> = BTreeMap::new();
    for (org_id, org) in organizations.iter() {
        for policy in Policy::ALL {
            let (restrict_to, dest) = match policy {
                Policy::AllVotes => (None, &mut all_votes),
                Policy::ContestedOnly => (Some(contested), &mut contested_only),
            };
            let score = calculate_alignment(
                &legislator.yea_votes,
                &legislator.nay_votes,
                &org.positions,
                restrict_to,
            );
            if score.bills_compared() > 0 {
                dest.insert(org_id.clone(), score);
            }
        }
    }
    LegislatorAlignments {
        name: legislator.name.clone(),
        total_votes: legislator.total_votes(),
        all_votes,
        contested_only,
    }
}

/// Checks a single legislator record.
pub(crate) fn check_legislator(index: usize, leg: &Legislator) -> Result<(), AlignmentErrors> {
    if leg.name.is_empty() {
        return Err(AlignmentErrors::MissingLegislatorName { index });
    }
    if let Some(bill_number) = leg.yea_votes.intersection(&leg.nay_votes).next() {
        return Err(AlignmentErrors::ConflictingVote {
            legislator: leg.name.clone(),
            bill_number: bill_number.clone(),
        });
    }
    Ok(())
}

fn checks(
    bills: &[Bill],
    legislators: &[Legislator],
    rules: &AlignmentRules,
) -> Result<(), AlignmentErrors> {
    let mut seen_bills: HashSet<&str> = HashSet::new();
    for (index, b) in bills.iter().enumerate() {
        if b.bill_number.is_empty() {
            return Err(AlignmentErrors::MissingBillNumber { index });
        }
        if !seen_bills.insert(b.bill_number.as_str()) {
            return Err(AlignmentErrors::DuplicateBill {
                bill_number: b.bill_number.clone(),
            });
        }
    }
    let mut seen_names: HashSet<&str> = HashSet::new();
    for (index, leg) in legislators.iter().enumerate() {
        check_legislator(index, leg)?;
        if !seen_names.insert(leg.name.as_str()) {
            return Err(AlignmentErrors::DuplicateLegislator {
                name: leg.name.clone(),
            });
        }
    }
    debug!(
        "checks: {} bills and {} legislators are valid",
        bills.len(),
        legislators.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn bill(number: &str, house: u64, senate: u64, fields: &[(&str, &str)]) -> Bill {
        let mut b = Bill::new(number);
        b.house_votes_against = Some(house);
        b.senate_votes_against = Some(senate);
        for (k, v) in fields {
            b.fields.insert(k.to_string(), v.to_string());
        }
        b
    }

    fn legislator(name: &str, yeas: &[&str], nays: &[&str]) -> Legislator {
        Legislator {
            name: name.to_string(),
            yea_votes: yeas.iter().map(|s| s.to_string()).collect(),
            nay_votes: nays.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn org(s: &str) -> OrgId {
        OrgId(s.to_string())
    }

    // B1 is uncontested, B2 is contested.
    fn sample_bills() -> Vec<Bill> {
        vec![
            bill(
                "B1",
                0,
                2,
                &[("o_position", "Support"), ("quiet_position", "Support")],
            ),
            bill("B2", 3, 3, &[("o_position", "Oppose")]),
            bill("B3", 1, 0, &[("o_position", "Unknown")]),
        ]
    }

    fn sample_legislators() -> Vec<Legislator> {
        vec![
            legislator("L", &["B1"], &["B2"]),
            legislator("L2", &["B2"], &["B1"]),
            legislator("L3", &["B3"], &[]),
        ]
    }

    #[test]
    fn scenarios() {
        init_logs();
        let res = run_alignment(
            &sample_bills(),
            &sample_legislators(),
            &AlignmentRules::DEFAULT_RULES,
        )
        .unwrap();

        let l = &res.legislators["L"];
        let s = l.all_votes[&org("o")];
        assert_eq!((s.agreements, s.disagreements), (2, 0));
        assert_eq!(s.bills_compared(), 2);
        assert_eq!(s.alignment, Some(100.0));

        let s = res.legislators["L2"].all_votes[&org("o")];
        assert_eq!((s.agreements, s.disagreements), (0, 2));
        assert_eq!(s.alignment, Some(0.0));

        // No overlap: the entry is omitted, not reported as 0%.
        let l3 = &res.legislators["L3"];
        assert!(l3.all_votes.is_empty());
        assert!(l3.contested_only.is_empty());
        assert_eq!(l3.total_votes, 1);
    }

    #[test]
    fn contested_policy_only_sees_contested_bills() {
        let res = run_alignment(
            &sample_bills(),
            &sample_legislators(),
            &AlignmentRules::DEFAULT_RULES,
        )
        .unwrap();
        assert_eq!(res.contested_bills.len(), 1);
        assert!(res.contested_bills.contains("B2"));

        let l = &res.legislators["L"];
        // quiet only tracks the uncontested B1.
        assert_eq!(l.all_votes[&org("quiet")].bills_compared(), 1);
        assert!(l.contested_only.get(&org("quiet")).is_none());
        let s = l.contested_only[&org("o")];
        assert_eq!(s.bills_compared(), 1);
        assert_eq!(s.alignment, Some(100.0));
    }

    #[test]
    fn invariants_hold_for_every_entry() {
        let res = run_alignment(
            &sample_bills(),
            &sample_legislators(),
            &AlignmentRules { contested_threshold: 1 },
        )
        .unwrap();
        for la in res.legislators.values() {
            for policy in Policy::ALL {
                for score in la.for_policy(policy).values() {
                    assert!(score.bills_compared() > 0);
                    let a = score.alignment.unwrap();
                    assert!((0.0..=100.0).contains(&a));
                }
            }
            for (org_id, contested) in la.contested_only.iter() {
                let all = la.all_votes[org_id];
                assert!(contested.bills_compared() <= all.bills_compared());
            }
        }
        for o in res.organizations.values() {
            assert_eq!(
                o.support_count() + o.oppose_count(),
                o.total_bills_tracked()
            );
        }
    }

    #[test]
    fn totals() {
        let res = run_alignment(
            &sample_bills(),
            &sample_legislators(),
            &AlignmentRules::DEFAULT_RULES,
        )
        .unwrap();
        assert_eq!(res.total_bills, 3);
        assert_eq!(res.total_votes_analyzed, 5);
        let ids: Vec<&OrgId> = res.organizations.keys().collect();
        assert_eq!(ids, vec![&org("o"), &org("quiet")]);
        assert_eq!(res.organizations[&org("o")].total_bills_tracked(), 2);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let a = run_alignment(
            &sample_bills(),
            &sample_legislators(),
            &AlignmentRules::DEFAULT_RULES,
        )
        .unwrap();
        let mut reversed = sample_legislators();
        reversed.reverse();
        let b = run_alignment(&sample_bills(), &reversed, &AlignmentRules::DEFAULT_RULES).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn malformed_input_is_fatal() {
        let rules = AlignmentRules::DEFAULT_RULES;

        let mut bills = sample_bills();
        bills.push(Bill::new(""));
        assert_eq!(
            run_alignment(&bills, &[], &rules),
            Err(AlignmentErrors::MissingBillNumber { index: 3 })
        );

        let mut bills = sample_bills();
        bills.push(Bill::new("B1"));
        assert_eq!(
            run_alignment(&bills, &[], &rules),
            Err(AlignmentErrors::DuplicateBill {
                bill_number: "B1".to_string()
            })
        );

        let mut legs = sample_legislators();
        legs.push(legislator("L2", &[], &[]));
        assert_eq!(
            run_alignment(&sample_bills(), &legs, &rules),
            Err(AlignmentErrors::DuplicateLegislator {
                name: "L2".to_string()
            })
        );

        let legs = vec![legislator("L4", &["B1", "B2"], &["B2"])];
        assert_eq!(
            run_alignment(&sample_bills(), &legs, &rules),
            Err(AlignmentErrors::ConflictingVote {
                legislator: "L4".to_string(),
                bill_number: "B2".to_string()
            })
        );
    }

    #[test]
    fn zero_threshold_contests_every_bill() {
        let rules = AlignmentRules {
            contested_threshold: 0,
        };
        let bills = sample_bills();
        let res = run_alignment(&bills, &[], &rules).unwrap();
        assert_eq!(res.contested_bills.len(), bills.len());
    }

    #[test]
    fn empty_input() {
        let res = run_alignment(&[], &[], &AlignmentRules::DEFAULT_RULES).unwrap();
        assert!(res.organizations.is_empty());
        assert!(res.legislators.is_empty());
        assert_eq!(res.total_bills, 0);
        assert_eq!(res.total_votes_analyzed, 0);
    }
}
