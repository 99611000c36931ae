use crate::compare::io_common::{read_json_file, resolve_path};
use crate::compare::*;

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompareConfig {
    #[serde(rename = "legislatorsPath")]
    pub legislators_path: Option<String>,
    #[serde(rename = "billsPath")]
    pub bills_path: Option<String>,
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
    #[serde(rename = "referencePath")]
    pub reference_path: Option<String>,
    #[serde(rename = "contestedThreshold")]
    pub contested_threshold: Option<u64>,
}

/// The settings of a run, after merging the configuration file and the command line.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RunSettings {
    pub legislators_path: String,
    pub bills_path: String,
    /// `None` writes to the standard output.
    pub output_path: Option<String>,
    pub reference_path: Option<String>,
    pub rules: AlignmentRules,
}

pub fn read_config(path: &str) -> CompareResult<CompareConfig> {
    let js = read_json_file(path)?;
    let config: CompareConfig = serde_json::from_value(js).context(ParsingJsonSnafu { path })?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

impl RunSettings {
    /// Command line values take precedence over the configuration file.
    pub fn resolve(args: &Args) -> CompareResult<RunSettings> {
        let (config, root) = match &args.config {
            Some(p) => (read_config(p)?, Path::new(p).parent()),
            None => (CompareConfig::default(), None),
        };
        let from_config =
            |p: &Option<String>| p.as_ref().map(|x| resolve_path(root, x.as_str()));

        let legislators_path = args
            .legislators
            .clone()
            .or_else(|| from_config(&config.legislators_path))
            .context(MissingInputSnafu {
                what: "legislators",
            })?;
        let bills_path = args
            .bills
            .clone()
            .or_else(|| from_config(&config.bills_path))
            .context(MissingInputSnafu { what: "bills" })?;
        let output_path = args
            .out
            .clone()
            .or_else(|| from_config(&config.output_path))
            .filter(|p| !p.is_empty() && p != "stdout");
        let reference_path = args
            .reference
            .clone()
            .or_else(|| from_config(&config.reference_path));
        let contested_threshold = args
            .threshold
            .or(config.contested_threshold)
            .unwrap_or(AlignmentRules::DEFAULT_RULES.contested_threshold);

        Ok(RunSettings {
            legislators_path,
            bills_path,
            output_path,
            reference_path,
            rules: AlignmentRules {
                contested_threshold,
            },
        })
    }
}
