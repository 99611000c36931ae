use std::collections::{BTreeMap, HashSet};

pub use crate::config::*;

/// A builder for collecting bills and legislators.
///
/// Records are checked as they are added, so that a malformed record is
/// reported with its position in the input.
///
/// ```
/// pub use alignment_engine::builder::Builder;
/// pub use alignment_engine::AlignmentRules;
/// # use alignment_engine::AlignmentErrors;
///
/// let mut builder = Builder::new(&AlignmentRules::DEFAULT_RULES)?;
/// builder.add_bill_simple("HB1", 3, 3, &[("heal_utah_position", "Support")])?;
/// builder.add_legislator_simple("Jane Doe", &["HB1"], &[])?;
/// let res = builder.run()?;
/// assert_eq!(res.contested_bills.len(), 1);
/// # Ok::<(), AlignmentErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: AlignmentRules,
    pub(crate) _bills: Vec<Bill>,
    pub(crate) _legislators: Vec<Legislator>,
    _bill_numbers: HashSet<String>,
    _names: HashSet<String>,
}

impl Builder {
    pub fn new(rules: &AlignmentRules) -> Result<Builder, AlignmentErrors> {
        Ok(Builder {
            _rules: rules.clone(),
            _bills: Vec::new(),
            _legislators: Vec::new(),
            _bill_numbers: HashSet::new(),
            _names: HashSet::new(),
        })
    }

    /// Adds a bill with its vote counts and string fields.
    ///
    /// This is the simplest use case, mostly useful for tests and small datasets.
    pub fn add_bill_simple(
        &mut self,
        bill_number: &str,
        house_votes_against: u64,
        senate_votes_against: u64,
        fields: &[(&str, &str)],
    ) -> Result<(), AlignmentErrors> {
        let fields: BTreeMap<String, String> = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.add_bill(Bill {
            bill_number: bill_number.to_string(),
            house_votes_against: Some(house_votes_against),
            senate_votes_against: Some(senate_votes_against),
            fields,
        })
    }

    pub fn add_bill(&mut self, bill: Bill) -> Result<(), AlignmentErrors> {
        if bill.bill_number.is_empty() {
            return Err(AlignmentErrors::MissingBillNumber {
                index: self._bills.len(),
            });
        }
        if !self._bill_numbers.insert(bill.bill_number.clone()) {
            return Err(AlignmentErrors::DuplicateBill {
                bill_number: bill.bill_number,
            });
        }
        self._bills.push(bill);
        Ok(())
    }

    pub fn add_legislator_simple(
        &mut self,
        name: &str,
        yea_votes: &[&str],
        nay_votes: &[&str],
    ) -> Result<(), AlignmentErrors> {
        self.add_legislator(Legislator {
            name: name.to_string(),
            yea_votes: yea_votes.iter().map(|s| s.to_string()).collect(),
            nay_votes: nay_votes.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Adds a legislator.
    ///
    /// Fails if the name is empty or already taken, or if a bill is both in the
    /// yea and nay votes.
    pub fn add_legislator(&mut self, legislator: Legislator) -> Result<(), AlignmentErrors> {
        crate::check_legislator(self._legislators.len(), &legislator)?;
        if !self._names.insert(legislator.name.clone()) {
            return Err(AlignmentErrors::DuplicateLegislator {
                name: legislator.name,
            });
        }
        self._legislators.push(legislator);
        Ok(())
    }

    pub fn bills(&self) -> &[Bill] {
        &self._bills
    }

    pub fn legislators(&self) -> &[Legislator] {
        &self._legislators
    }

    pub fn run(&self) -> Result<AlignmentResult, AlignmentErrors> {
        crate::run_alignment(&self._bills, &self._legislators, &self._rules)
    }
}
