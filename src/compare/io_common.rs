use std::fs;
use std::path::{Path, PathBuf};

use crate::compare::*;

/// Resolves a path relative to the directory of the configuration file, if any.
pub fn resolve_path(root: Option<&Path>, path: &str) -> String {
    match root {
        Some(r) if Path::new(path).is_relative() => {
            let p: PathBuf = [r, Path::new(path)].iter().collect();
            p.display().to_string()
        }
        _ => path.to_string(),
    }
}

pub fn read_file(path: &str) -> CompareResult<String> {
    info!("Attempting to read file {:?}", path);
    fs::read_to_string(path).context(OpeningJsonSnafu { path })
}

pub fn read_json_file(path: &str) -> CompareResult<JSValue> {
    let contents = read_file(path)?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(js)
}

/// Some collections are stored either bare or wrapped in an object under a single key.
pub fn unwrap_collection(js: JSValue, key: &str) -> JSValue {
    match js {
        JSValue::Object(mut obj) if obj.get(key).map_or(false, |v| v.is_object() || v.is_array()) => {
            obj.remove(key).unwrap_or(JSValue::Null)
        }
        x => x,
    }
}

/// Display name of an organization: utah_farm_bureau -> Utah Farm Bureau
pub fn display_name(org_id: &str) -> String {
    let words: Vec<String> = org_id
        .split('_')
        .filter(|w| !w.is_empty())
        .enumerate()
        .map(|(idx, w)| match w.to_lowercase().as_str() {
            "pta" => "PTA".to_string(),
            "aclu" => "ACLU".to_string(),
            "ulct" => "ULCT".to_string(),
            c @ ("of" | "for" | "and") if idx > 0 => c.to_string(),
            c => {
                let mut chars = c.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        })
        .collect();
    words.join(" ")
}
