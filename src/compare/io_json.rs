// Readers for the legislator and bill collections.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;

use crate::compare::io_common::{read_file, read_json_file, unwrap_collection};
use crate::compare::*;

/// The descriptive attributes of a legislator. They are copied as-is to the output.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct LegislatorInfo {
    pub party: JSValue,
    pub chamber: JSValue,
    pub district: JSValue,
    pub email: JSValue,
    pub image: JSValue,
}

/// A legislator, as read from the input.
#[derive(PartialEq, Debug, Clone)]
pub struct LegislatorRecord {
    pub legislator: Legislator,
    pub info: LegislatorInfo,
}

#[derive(Deserialize, Debug)]
struct ParsedLegislator {
    name: Option<String>,
    yea_votes: Option<Vec<String>>,
    nay_votes: Option<Vec<String>>,
    party: Option<JSValue>,
    chamber: Option<JSValue>,
    district: Option<JSValue>,
    email: Option<JSValue>,
    image: Option<JSValue>,
}

fn or_empty(v: Option<JSValue>) -> JSValue {
    match v {
        None | Some(JSValue::Null) => json!(""),
        Some(x) => x,
    }
}

fn to_record(name: String, pl: ParsedLegislator) -> LegislatorRecord {
    let yea_votes: BTreeSet<String> = pl.yea_votes.unwrap_or_default().into_iter().collect();
    let nay_votes: BTreeSet<String> = pl.nay_votes.unwrap_or_default().into_iter().collect();
    LegislatorRecord {
        legislator: Legislator {
            name,
            yea_votes,
            nay_votes,
        },
        info: LegislatorInfo {
            party: or_empty(pl.party),
            chamber: or_empty(pl.chamber),
            district: or_empty(pl.district),
            email: or_empty(pl.email),
            image: or_empty(pl.image),
        },
    }
}

/// The legislator collection as written in the file.
///
/// Unlike `JSValue`, the keyed form keeps every entry in the document order, so
/// that a name given twice can be reported.
#[derive(PartialEq, Debug, Clone)]
pub enum LegislatorCollection {
    Keyed {
        entries: Vec<(String, JSValue)>,
        /// The first name that appears more than once.
        repeated: Option<String>,
    },
    Listed(Vec<JSValue>),
    Other(JSValue),
}

impl LegislatorCollection {
    fn into_value(self) -> JSValue {
        match self {
            LegislatorCollection::Keyed { entries, .. } => {
                JSValue::Object(entries.into_iter().collect())
            }
            LegislatorCollection::Listed(arr) => JSValue::Array(arr),
            LegislatorCollection::Other(v) => v,
        }
    }
}

struct CollectionVisitor;

impl<'de> Visitor<'de> for CollectionVisitor {
    type Value = LegislatorCollection;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "an object or an array of legislators")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut seen: BTreeSet<String> = BTreeSet::new();
        let mut repeated: Option<String> = None;
        let mut entries: Vec<(String, LegislatorCollection)> = Vec::new();
        while let Some(key) = map.next_key::<String>()? {
            // The collection may be wrapped under this key.
            let value = if key == "legislators" {
                map.next_value::<LegislatorCollection>()?
            } else {
                LegislatorCollection::Other(map.next_value::<JSValue>()?)
            };
            if !seen.insert(key.clone()) && repeated.is_none() {
                repeated = Some(key.clone());
            }
            entries.push((key, value));
        }
        let wrapped = entries.len() == 1
            && entries[0].0 == "legislators"
            && !matches!(entries[0].1, LegislatorCollection::Other(_));
        if wrapped {
            if let Some((_, inner)) = entries.pop() {
                return Ok(inner);
            }
        }
        Ok(LegislatorCollection::Keyed {
            entries: entries.into_iter().map(|(k, v)| (k, v.into_value())).collect(),
            repeated,
        })
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut res: Vec<JSValue> = Vec::new();
        while let Some(v) = seq.next_element::<JSValue>()? {
            res.push(v);
        }
        Ok(LegislatorCollection::Listed(res))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(LegislatorCollection::Other(json!(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(LegislatorCollection::Other(json!(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(LegislatorCollection::Other(json!(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(LegislatorCollection::Other(json!(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(LegislatorCollection::Other(json!(v)))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(LegislatorCollection::Other(JSValue::Null))
    }
}

impl<'de> Deserialize<'de> for LegislatorCollection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CollectionVisitor)
    }
}

/// Reads the legislators.
///
/// The collection is either an object keyed by name or an array of records with
/// a `name` field, optionally wrapped in a `legislators` field.
pub fn read_legislators(path: &str) -> CompareResult<Vec<LegislatorRecord>> {
    let contents = read_file(path)?;
    parse_legislators(&contents, path)
}

pub fn parse_legislators(contents: &str, path: &str) -> CompareResult<Vec<LegislatorRecord>> {
    let collection: LegislatorCollection =
        serde_json::from_str(contents).context(ParsingJsonSnafu { path })?;
    let mut res: Vec<LegislatorRecord> = Vec::new();
    match collection {
        LegislatorCollection::Keyed { entries, repeated } => {
            if let Some(name) = repeated {
                return Err(CompareError::Alignment {
                    source: AlignmentErrors::DuplicateLegislator { name },
                });
            }
            for (name, v) in entries.into_iter() {
                let pl: ParsedLegislator = serde_json::from_value(v)
                    .context(MalformedLegislatorSnafu { name: name.clone() })?;
                res.push(to_record(name, pl));
            }
        }
        LegislatorCollection::Listed(arr) => {
            for (idx, v) in arr.into_iter().enumerate() {
                let pl: ParsedLegislator = serde_json::from_value(v).context(
                    MalformedLegislatorSnafu {
                        name: format!("#{}", idx),
                    },
                )?;
                let name = match pl.name.clone() {
                    Some(n) if !n.is_empty() => n,
                    _ => {
                        return Err(CompareError::Alignment {
                            source: AlignmentErrors::MissingLegislatorName { index: idx },
                        })
                    }
                };
                res.push(to_record(name, pl));
            }
        }
        LegislatorCollection::Other(_) => {
            return UnexpectedCollectionSnafu {
                path,
                expected: "an object or an array of legislators",
            }
            .fail();
        }
    }
    info!("read_legislators: {} legislators", res.len());
    Ok(res)
}

/// Reads the bills: an array, optionally wrapped in a `bills` field.
pub fn read_bills(path: &str) -> CompareResult<Vec<Bill>> {
    let js = unwrap_collection(read_json_file(path)?, "bills");
    parse_bills(js, path)
}

pub fn parse_bills(js: JSValue, path: &str) -> CompareResult<Vec<Bill>> {
    let arr = match js {
        JSValue::Array(arr) => arr,
        _ => {
            return UnexpectedCollectionSnafu {
                path,
                expected: "an array of bills",
            }
            .fail();
        }
    };
    let mut res: Vec<Bill> = Vec::new();
    for (index, v) in arr.into_iter().enumerate() {
        let obj = match v {
            JSValue::Object(obj) => obj,
            x => {
                return MalformedBillSnafu {
                    index,
                    message: format!("expected an object, found {}", x),
                }
                .fail();
            }
        };
        let bill_number = match obj.get("bill_number") {
            Some(JSValue::String(s)) if !s.is_empty() => s.clone(),
            Some(JSValue::String(_)) | Some(JSValue::Null) | None => {
                return Err(CompareError::Alignment {
                    source: AlignmentErrors::MissingBillNumber { index },
                });
            }
            Some(x) => {
                return MalformedBillSnafu {
                    index,
                    message: format!("bill_number must be a string, found {}", x),
                }
                .fail();
            }
        };
        let house_votes_against =
            read_vote_count(&bill_number, "house_votes_against", obj.get("house_votes_against"));
        let senate_votes_against = read_vote_count(
            &bill_number,
            "senate_votes_against",
            obj.get("senate_votes_against"),
        );

        let mut fields: BTreeMap<String, String> = BTreeMap::new();
        for (k, v) in obj.into_iter() {
            match v {
                JSValue::String(s) => {
                    fields.insert(k, s);
                }
                JSValue::Null => {}
                x if alignment_engine::positions::org_id_of_field(&k).is_some() => {
                    warn!(
                        "bill {}: ignoring non-string position {} = {}",
                        bill_number, k, x
                    );
                }
                _ => {}
            }
        }
        res.push(Bill {
            bill_number,
            house_votes_against,
            senate_votes_against,
            fields,
        });
    }
    info!("read_bills: {} bills", res.len());
    Ok(res)
}

// Missing or null counts are absent. Unreadable ones are treated the same way.
fn read_vote_count(bill_number: &str, field: &str, v: Option<&JSValue>) -> Option<u64> {
    match v {
        None | Some(JSValue::Null) => None,
        Some(JSValue::Number(n)) if n.as_u64().is_some() => n.as_u64(),
        Some(JSValue::String(s)) if s.trim().parse::<u64>().is_ok() => s.trim().parse::<u64>().ok(),
        Some(x) => {
            warn!(
                "bill {}: could not read {} = {}, counting 0",
                bill_number, field, x
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legislators_keyed_by_name() {
        let js = json!({
            "Jane Doe": {
                "party": "R", "chamber": "House", "district": 12,
                "yea_votes": ["HB1", "HB2"], "nay_votes": ["HB3"]
            },
            "John Roe": {"yea_votes": null}
        });
        let res = parse_legislators(&js.to_string(), "test").unwrap();
        assert_eq!(res.len(), 2);
        let jane = res.iter().find(|r| r.legislator.name == "Jane Doe").unwrap();
        assert_eq!(jane.legislator.yea_votes.len(), 2);
        assert_eq!(jane.info.district, json!(12));
        assert_eq!(jane.info.email, json!(""));
        let john = res.iter().find(|r| r.legislator.name == "John Roe").unwrap();
        assert!(john.legislator.yea_votes.is_empty());
        assert_eq!(john.info.party, json!(""));
    }

    #[test]
    fn legislators_as_array() {
        let js = json!([
            {"name": "A", "yea_votes": ["HB1"]},
            {"name": "B", "nay_votes": ["HB1"]}
        ]);
        let res = parse_legislators(&js.to_string(), "test").unwrap();
        assert_eq!(res[0].legislator.name, "A");
        assert_eq!(res[1].legislator.nay_votes.len(), 1);

        let js = json!([{"yea_votes": ["HB1"]}]);
        assert!(matches!(
            parse_legislators(&js.to_string(), "test"),
            Err(CompareError::Alignment {
                source: AlignmentErrors::MissingLegislatorName { index: 0 }
            })
        ));
    }

    #[test]
    fn malformed_votes_name_the_legislator() {
        let js = json!({"Jane Doe": {"yea_votes": [1, 2]}});
        match parse_legislators(&js.to_string(), "test") {
            Err(CompareError::MalformedLegislator { name, .. }) => assert_eq!(name, "Jane Doe"),
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn repeated_legislator_names_are_fatal() {
        let contents = r#"{"A": {"yea_votes": ["B1"]}, "A": {"nay_votes": ["B2"]}}"#;
        assert!(matches!(
            parse_legislators(contents, "test"),
            Err(CompareError::Alignment {
                source: AlignmentErrors::DuplicateLegislator { name }
            }) if name == "A"
        ));
        let contents = r#"{"legislators": {"B": {}, "A": {}, "B": {}}}"#;
        assert!(matches!(
            parse_legislators(contents, "test"),
            Err(CompareError::Alignment {
                source: AlignmentErrors::DuplicateLegislator { name }
            }) if name == "B"
        ));
    }

    #[test]
    fn wrapped_legislators() {
        let contents = r#"{"legislators": {"A": {"yea_votes": ["B1"]}, "B": {}}}"#;
        let res = parse_legislators(contents, "test").unwrap();
        assert_eq!(res.len(), 2);
        assert_eq!(res[0].legislator.name, "A");
        assert_eq!(res[0].legislator.yea_votes.len(), 1);

        let contents = r#"{"legislators": [{"name": "A"}]}"#;
        let res = parse_legislators(contents, "test").unwrap();
        assert_eq!(res[0].legislator.name, "A");

        // A legislator who happens to be called "legislators".
        let contents = r#"{"legislators": {"yea_votes": ["B1"]}, "A": {}}"#;
        let res = parse_legislators(contents, "test").unwrap();
        assert_eq!(res[0].legislator.name, "legislators");
        assert_eq!(res[0].legislator.yea_votes.len(), 1);

        assert!(matches!(
            parse_legislators("12", "test"),
            Err(CompareError::UnexpectedCollection { .. })
        ));
        assert!(matches!(
            parse_legislators("{", "test"),
            Err(CompareError::ParsingJson { .. })
        ));
    }

    #[test]
    fn bills_fields_and_counts() {
        let js = json!([
            {
                "bill_number": "HB1",
                "house_votes_against": 3,
                "senate_votes_against": "3",
                "heal_utah_position": "Support",
                "libertas_position": 4,
                "title": "A bill"
            },
            {"bill_number": "HB2", "house_votes_against": null, "senate_votes_against": "many"}
        ]);
        let res = parse_bills(js, "test").unwrap();
        assert_eq!(res[0].votes_against(), 6);
        assert_eq!(res[0].fields.get("heal_utah_position").unwrap(), "Support");
        assert!(res[0].fields.get("libertas_position").is_none());
        assert!(res[0].fields.get("house_votes_against").is_none());
        assert_eq!(res[1].house_votes_against, None);
        assert_eq!(res[1].senate_votes_against, None);
        assert_eq!(res[1].votes_against(), 0);
    }

    #[test]
    fn bills_without_number_are_fatal() {
        let js = json!([{"bill_number": "HB1"}, {"title": "no number"}]);
        assert!(matches!(
            parse_bills(js, "test"),
            Err(CompareError::Alignment {
                source: AlignmentErrors::MissingBillNumber { index: 1 }
            })
        ));
        let js = json!([{"bill_number": 12}]);
        assert!(matches!(
            parse_bills(js, "test"),
            Err(CompareError::MalformedBill { index: 0, .. })
        ));
        assert!(matches!(
            parse_bills(json!({"HB1": {}}), "test"),
            Err(CompareError::UnexpectedCollection { .. })
        ));
    }
}
