// ********* Input data structures ***********

use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::Display;

/// The stance of an organization on a bill.
///
/// Raw position strings are converted at the ingestion boundary. Only the two
/// exact literals `Support` and `Oppose` carry a stance: everything else,
/// including `Unknown`, `Watching` and the empty string, is `NoStance`.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Stance {
    Support,
    Oppose,
    NoStance,
}

impl Stance {
    /// Case-sensitive conversion from the value of a position field.
    pub fn parse(raw: &str) -> Stance {
        match raw {
            "Support" => Stance::Support,
            "Oppose" => Stance::Oppose,
            _ => Stance::NoStance,
        }
    }
}

/// A bill, as a generic record.
///
/// `fields` holds every string-valued attribute of the source record other
/// than the vote counts. Organization stances are discovered from it by
/// naming convention (see [`crate::positions`]).
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Bill {
    pub bill_number: String,
    pub house_votes_against: Option<u64>,
    pub senate_votes_against: Option<u64>,
    pub fields: BTreeMap<String, String>,
}

impl Bill {
    pub fn new(bill_number: &str) -> Bill {
        Bill {
            bill_number: bill_number.to_string(),
            house_votes_against: None,
            senate_votes_against: None,
            fields: BTreeMap::new(),
        }
    }

    /// Combined dissenting votes. Missing counts are zero.
    pub fn votes_against(&self) -> u64 {
        self.house_votes_against
            .unwrap_or(0)
            .saturating_add(self.senate_votes_against.unwrap_or(0))
    }
}

/// A voting member. Descriptive attributes (party, chamber...) are not needed
/// by the computation and stay with the caller.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Legislator {
    pub name: String,
    pub yea_votes: BTreeSet<String>,
    pub nay_votes: BTreeSet<String>,
}

impl Legislator {
    pub fn total_votes(&self) -> u64 {
        (self.yea_votes.len() + self.nay_votes.len()) as u64
    }
}

/// The identifier of an organization: the name of its position field without
/// the `_position` suffix.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Ord, PartialOrd)]
pub struct OrgId(pub String);

impl Display for OrgId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ******** Output data structures *********

/// An organization and the bills it took a stance on.
///
/// Invariant: `positions` only contains `Support` or `Oppose`, and is never
/// empty.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Organization {
    pub id: OrgId,
    pub positions: BTreeMap<String, Stance>,
}

impl Organization {
    pub fn total_bills_tracked(&self) -> usize {
        self.positions.len()
    }

    pub fn support_count(&self) -> usize {
        self.count(Stance::Support)
    }

    pub fn oppose_count(&self) -> usize {
        self.count(Stance::Oppose)
    }

    fn count(&self, stance: Stance) -> usize {
        self.positions.values().filter(|s| **s == stance).count()
    }
}

/// The outcome of comparing one legislator with one organization.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct AlignmentScore {
    /// Percentage of agreement, rounded to one decimal.
    /// `None` when no bill could be compared: this is not the same as 0%.
    pub alignment: Option<f64>,
    pub agreements: u32,
    pub disagreements: u32,
}

impl AlignmentScore {
    pub const EMPTY: AlignmentScore = AlignmentScore {
        alignment: None,
        agreements: 0,
        disagreements: 0,
    };

    pub fn bills_compared(&self) -> u32 {
        self.agreements + self.disagreements
    }
}

/// The bill-set filter applied before computing an alignment.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Policy {
    /// Every bill the organization tracks.
    AllVotes,
    /// Only the tracked bills that are contested.
    ContestedOnly,
}

impl Policy {
    pub const ALL: [Policy; 2] = [Policy::AllVotes, Policy::ContestedOnly];
}

/// The alignments of one legislator, for both policies.
/// Organizations without any compared bill are absent from the maps.
#[derive(PartialEq, Debug, Clone)]
pub struct LegislatorAlignments {
    pub name: String,
    pub total_votes: u64,
    pub all_votes: BTreeMap<OrgId, AlignmentScore>,
    pub contested_only: BTreeMap<OrgId, AlignmentScore>,
}

impl LegislatorAlignments {
    pub fn for_policy(&self, policy: Policy) -> &BTreeMap<OrgId, AlignmentScore> {
        match policy {
            Policy::AllVotes => &self.all_votes,
            Policy::ContestedOnly => &self.contested_only,
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct AlignmentResult {
    pub organizations: BTreeMap<OrgId, Organization>,
    pub legislators: BTreeMap<String, LegislatorAlignments>,
    pub contested_bills: BTreeSet<String>,
    pub total_bills: u64,
    pub total_votes_analyzed: u64,
}

/// Errors that prevent the computation from completing.
///
/// All of them point at the record that needs to be fixed in the source data.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum AlignmentErrors {
    MissingBillNumber { index: usize },
    DuplicateBill { bill_number: String },
    MissingLegislatorName { index: usize },
    DuplicateLegislator { name: String },
    /// The same bill is both in the yea and nay votes of a legislator.
    ConflictingVote { legislator: String, bill_number: String },
}

impl Error for AlignmentErrors {}

impl Display for AlignmentErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlignmentErrors::MissingBillNumber { index } => {
                write!(f, "bill record #{} has no bill number", index)
            }
            AlignmentErrors::DuplicateBill { bill_number } => {
                write!(f, "bill {} appears more than once", bill_number)
            }
            AlignmentErrors::MissingLegislatorName { index } => {
                write!(f, "legislator record #{} has no name", index)
            }
            AlignmentErrors::DuplicateLegislator { name } => {
                write!(f, "legislator {} appears more than once", name)
            }
            AlignmentErrors::ConflictingVote {
                legislator,
                bill_number,
            } => write!(
                f,
                "legislator {} voted both yea and nay on bill {}",
                legislator, bill_number
            ),
        }
    }
}

// ********* Configuration **********

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AlignmentRules {
    /// A bill is contested when the combined house and senate votes against
    /// it reach this number.
    pub contested_threshold: u64,
}

impl AlignmentRules {
    pub const DEFAULT_RULES: AlignmentRules = AlignmentRules {
        contested_threshold: 6,
    };
}

impl Default for AlignmentRules {
    fn default() -> Self {
        AlignmentRules::DEFAULT_RULES
    }
}
