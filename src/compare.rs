use log::{debug, info, warn};

use alignment_engine::builder::Builder;
use alignment_engine::*;
use snafu::{prelude::*, Snafu};

use std::collections::BTreeMap;
use std::fs;

use serde::Serialize;
use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::compare::config_reader::*;
use crate::compare::io_common::{display_name, read_json_file};
use crate::compare::io_json::*;

pub mod config_reader;
mod io_common;
pub mod io_json;

const TIMESTAMP_FIELD: &str = "lastUpdated";

#[derive(Debug, Snafu)]
pub enum CompareError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON in {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error serializing the comparison data"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("{path}: expected {expected}"))]
    UnexpectedCollection { path: String, expected: String },
    #[snafu(display("Bill record #{index}: {message}"))]
    MalformedBill { index: usize, message: String },
    #[snafu(display("Legislator {name} could not be read"))]
    MalformedLegislator {
        source: serde_json::Error,
        name: String,
    },
    #[snafu(display("No {what} file provided (use --{what} or --config)"))]
    MissingInput { what: String },
    #[snafu(display("Invalid input data"))]
    Alignment { source: AlignmentErrors },
    #[snafu(display("Difference detected between computed data and reference {path}"))]
    ReferenceMismatch { path: String },
}

pub type CompareResult<T> = Result<T, CompareError>;

// ******** Output document *********

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct OrganizationOutput {
    pub id: String,
    pub name: String,
    #[serde(rename = "totalBillsTracked")]
    pub total_bills_tracked: usize,
    #[serde(rename = "supportCount")]
    pub support_count: usize,
    #[serde(rename = "opposeCount")]
    pub oppose_count: usize,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct AlignmentOutput {
    pub alignment: f64,
    pub agreements: u32,
    pub disagreements: u32,
    #[serde(rename = "billsCompared")]
    pub bills_compared: u32,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct LegislatorOutput {
    pub name: String,
    pub party: JSValue,
    pub chamber: JSValue,
    pub district: JSValue,
    pub email: JSValue,
    pub image: JSValue,
    #[serde(rename = "totalVotes")]
    pub total_votes: u64,
    pub alignments: BTreeMap<String, AlignmentOutput>,
    #[serde(rename = "alignmentsContested")]
    pub alignments_contested: BTreeMap<String, AlignmentOutput>,
    pub yea_votes: Vec<String>,
    pub nay_votes: Vec<String>,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct CompareData {
    pub organizations: BTreeMap<String, OrganizationOutput>,
    pub legislators: BTreeMap<String, LegislatorOutput>,
    #[serde(rename = "lastUpdated")]
    pub last_updated: String,
    #[serde(rename = "totalBills")]
    pub total_bills: u64,
    #[serde(rename = "contestedBills")]
    pub contested_bills: u64,
    #[serde(rename = "contestedThreshold")]
    pub contested_threshold: u64,
    #[serde(rename = "totalVotesAnalyzed")]
    pub total_votes_analyzed: u64,
}

// Entries without an alignment are dropped.
fn alignments_to_output(
    scores: &BTreeMap<OrgId, AlignmentScore>,
) -> BTreeMap<String, AlignmentOutput> {
    scores
        .iter()
        .filter_map(|(org_id, score)| {
            score.alignment.map(|alignment| {
                (
                    org_id.0.clone(),
                    AlignmentOutput {
                        alignment,
                        agreements: score.agreements,
                        disagreements: score.disagreements,
                        bills_compared: score.bills_compared(),
                    },
                )
            })
        })
        .collect()
}

/// Assembles the output document. The positions of the organizations are left
/// out to keep the document small.
pub fn build_compare_data(
    result: &AlignmentResult,
    records: &[LegislatorRecord],
    rules: &AlignmentRules,
    last_updated: String,
) -> CompareData {
    let organizations: BTreeMap<String, OrganizationOutput> = result
        .organizations
        .values()
        .map(|org| {
            (
                org.id.0.clone(),
                OrganizationOutput {
                    id: org.id.0.clone(),
                    name: display_name(&org.id.0),
                    total_bills_tracked: org.total_bills_tracked(),
                    support_count: org.support_count(),
                    oppose_count: org.oppose_count(),
                },
            )
        })
        .collect();

    let mut legislators: BTreeMap<String, LegislatorOutput> = BTreeMap::new();
    for rec in records.iter() {
        let leg = &rec.legislator;
        let la = match result.legislators.get(&leg.name) {
            Some(la) => la,
            None => {
                warn!("build_compare_data: no alignments for {}", leg.name);
                continue;
            }
        };
        legislators.insert(
            leg.name.clone(),
            LegislatorOutput {
                name: leg.name.clone(),
                party: rec.info.party.clone(),
                chamber: rec.info.chamber.clone(),
                district: rec.info.district.clone(),
                email: rec.info.email.clone(),
                image: rec.info.image.clone(),
                total_votes: la.total_votes,
                alignments: alignments_to_output(&la.all_votes),
                alignments_contested: alignments_to_output(&la.contested_only),
                yea_votes: leg.yea_votes.iter().cloned().collect(),
                nay_votes: leg.nay_votes.iter().cloned().collect(),
            },
        );
    }

    CompareData {
        organizations,
        legislators,
        last_updated,
        total_bills: result.total_bills,
        contested_bills: result.contested_bills.len() as u64,
        contested_threshold: rules.contested_threshold,
        total_votes_analyzed: result.total_votes_analyzed,
    }
}

fn log_sample(data: &CompareData) {
    if let Some(leg) = data.legislators.values().next() {
        info!("Sample: {}", leg.name);
        for (org_id, a) in leg.alignments.iter().take(5) {
            let name = data
                .organizations
                .get(org_id)
                .map(|o| o.name.clone())
                .unwrap_or_else(|| org_id.clone());
            info!(
                "  vs {}: {}% ({} bills)",
                name, a.alignment, a.bills_compared
            );
        }
    }
}

/// The document without its timestamp, for comparisons between runs.
pub fn without_timestamp(mut js: JSValue) -> JSValue {
    if let Some(obj) = js.as_object_mut() {
        obj.remove(TIMESTAMP_FIELD);
    }
    js
}

fn check_reference(computed: &JSValue, reference_path: &str) -> CompareResult<()> {
    let reference = without_timestamp(read_json_file(reference_path)?);
    let pretty_reference =
        serde_json::to_string_pretty(&reference).context(SerializingJsonSnafu)?;
    let pretty_computed = serde_json::to_string_pretty(&without_timestamp(computed.clone()))
        .context(SerializingJsonSnafu)?;
    if pretty_reference != pretty_computed {
        warn!("Found differences with the reference {}", reference_path);
        print_diff(pretty_reference.as_str(), pretty_computed.as_str(), "\n");
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    info!("Computed data matches the reference {}", reference_path);
    Ok(())
}

/// Reads the inputs, computes every alignment and builds the output document.
pub fn compute(settings: &RunSettings, last_updated: String) -> CompareResult<CompareData> {
    let records = read_legislators(&settings.legislators_path)?;
    let bills = read_bills(&settings.bills_path)?;

    let mut builder = Builder::new(&settings.rules).context(AlignmentSnafu)?;
    for bill in bills {
        builder.add_bill(bill).context(AlignmentSnafu)?;
    }
    for rec in records.iter() {
        builder
            .add_legislator(rec.legislator.clone())
            .context(AlignmentSnafu)?;
    }
    let result = builder.run().context(AlignmentSnafu)?;
    debug!(
        "compute: {} organizations, {} legislators",
        result.organizations.len(),
        result.legislators.len()
    );

    Ok(build_compare_data(
        &result,
        &records,
        &settings.rules,
        last_updated,
    ))
}

pub fn run_compare(args: &Args) -> CompareResult<()> {
    let settings = RunSettings::resolve(args)?;
    info!("settings: {:?}", settings);

    let data = compute(&settings, chrono::Local::now().to_rfc3339())?;
    log_sample(&data);
    info!(
        "{} legislators, {} organizations, {} total votes analyzed",
        data.legislators.len(),
        data.organizations.len(),
        data.total_votes_analyzed
    );

    let js = serde_json::to_value(&data).context(SerializingJsonSnafu)?;
    let pretty_js = serde_json::to_string_pretty(&js).context(SerializingJsonSnafu)?;
    match &settings.output_path {
        Some(path) => {
            fs::write(path, pretty_js.as_bytes()).context(WritingJsonSnafu {
                path: path.clone(),
            })?;
            info!("Wrote comparison data to {:?}", path);
        }
        None => println!("{}", pretty_js),
    }

    if let Some(reference_path) = &settings.reference_path {
        check_reference(&js, reference_path)?;
    }
    Ok(())
}
