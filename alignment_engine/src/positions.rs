//! Discovery of the organizations and of their stances on bills.
//!
//! Organizations are not declared anywhere: a bill field named
//! `<org_id>_position` records the stance of `org_id` on this bill. The field
//! `author_position` is reserved for the sponsor and is not an organization.

use log::{debug, info};
use std::collections::{BTreeMap, BTreeSet};

use crate::config::*;

pub const POSITION_SUFFIX: &str = "_position";
pub const RESERVED_ORG: &str = "author";

/// The closed set of organizations found in a bill collection.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct OrganizationSchema {
    pub org_ids: BTreeSet<OrgId>,
}

impl OrganizationSchema {
    pub fn field_name(org_id: &OrgId) -> String {
        format!("{}{}", org_id.0, POSITION_SUFFIX)
    }

    pub fn len(&self) -> usize {
        self.org_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.org_ids.is_empty()
    }
}

/// Returns the organization named by a field, if this field is a position field.
pub fn org_id_of_field(field: &str) -> Option<OrgId> {
    match field.strip_suffix(POSITION_SUFFIX) {
        Some(base) if !base.is_empty() && base != RESERVED_ORG => Some(OrgId(base.to_string())),
        _ => None,
    }
}

/// Collects every organization that has a position field on at least one bill,
/// whatever the value of this field.
pub fn discover_schema(bills: &[Bill]) -> OrganizationSchema {
    let org_ids: BTreeSet<OrgId> = bills
        .iter()
        .flat_map(|b| b.fields.keys())
        .filter_map(|k| org_id_of_field(k))
        .collect();
    debug!("discover_schema: found {} position fields", org_ids.len());
    OrganizationSchema { org_ids }
}

/// Builds the stances of every organization of the schema.
///
/// Only `Support` and `Oppose` are recorded. Organizations that end up with no
/// stance at all are dropped.
pub fn build_position_index(
    bills: &[Bill],
    schema: &OrganizationSchema,
) -> BTreeMap<OrgId, Organization> {
    let mut res: BTreeMap<OrgId, Organization> = BTreeMap::new();
    for org_id in schema.org_ids.iter() {
        let field = OrganizationSchema::field_name(org_id);
        let positions: BTreeMap<String, Stance> = bills
            .iter()
            .filter_map(|b| {
                let stance = b
                    .fields
                    .get(&field)
                    .map(|raw| Stance::parse(raw))
                    .unwrap_or(Stance::NoStance);
                match stance {
                    Stance::NoStance => None,
                    s => Some((b.bill_number.clone(), s)),
                }
            })
            .collect();
        if positions.is_empty() {
            debug!(
                "build_position_index: dropping {} (no support or oppose position)",
                org_id
            );
            continue;
        }
        res.insert(
            org_id.clone(),
            Organization {
                id: org_id.clone(),
                positions,
            },
        );
    }
    info!(
        "{} organizations with Support/Oppose positions (out of {} discovered)",
        res.len(),
        schema.len()
    );
    let mut by_size: Vec<&Organization> = res.values().collect();
    by_size.sort_by_key(|o| std::cmp::Reverse(o.total_bills_tracked()));
    for org in by_size {
        info!(
            "    {}: {}S/{}O = {} bills",
            org.id,
            org.support_count(),
            org.oppose_count(),
            org.total_bills_tracked()
        );
    }
    res
}
