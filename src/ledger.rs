use std::collections::HashMap;

use crate::error::LedgerError;
use crate::weight::round_to_half;

/// Weight samples collected for one product code.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleGroup {
    pub product_code: String,
    pub description: String,
    weights: Vec<f64>,
}

impl SampleGroup {
    fn new(product_code: &str, description: &str, weight: f64) -> Self {
        SampleGroup {
            product_code: product_code.to_owned(),
            description: description.to_owned(),
            weights: vec![weight],
        }
    }

    /// Raw samples in scan order.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn summary(&self) -> GroupSummary {
        // `weights` is never empty: a group only exists after its first sample.
        let weights = self.weights();
        let sample_count = weights.len();
        let average_weight = weights.iter().sum::<f64>() / sample_count as f64;

        GroupSummary {
            product_code: self.product_code.clone(),
            description: self.description.clone(),
            average_weight,
            sample_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub product_code: String,
    pub description: String,
    pub average_weight: f64,
    pub sample_count: usize,
}

impl GroupSummary {
    /// Average weight as shown to the operator and written to exports.
    pub fn rounded_average(&self) -> f64 {
        round_to_half(self.average_weight)
    }
}

/// Per-product sample accumulator. Summaries come back in order of first scan.
#[derive(Debug, Default)]
pub struct SampleLedger {
    groups: Vec<SampleGroup>,
    index: HashMap<String, usize>,
}

impl SampleLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sample. The description is only recorded for the first sample of a code.
    pub fn append(
        &mut self,
        product_code: &str,
        description: &str,
        weight: f64,
    ) -> Result<&SampleGroup, LedgerError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(LedgerError::InvalidWeight(weight));
        }

        let i = match self.index.get(product_code) {
            Some(&i) => {
                self.groups[i].weights.push(weight);
                i
            }
            None => {
                let i = self.groups.len();
                self.index.insert(product_code.to_owned(), i);
                self.groups
                    .push(SampleGroup::new(product_code, description, weight));
                i
            }
        };

        Ok(&self.groups[i])
    }

    pub fn group(&self, product_code: &str) -> Option<&SampleGroup> {
        self.index.get(product_code).map(|&i| &self.groups[i])
    }

    pub fn summary_for(&self, product_code: &str) -> Option<GroupSummary> {
        self.group(product_code).map(SampleGroup::summary)
    }

    pub fn all_summaries(&self) -> Vec<GroupSummary> {
        self.groups.iter().map(SampleGroup::summary).collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn clear(&mut self) {
        self.groups.clear();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_new_group() {
        let mut ledger = SampleLedger::new();

        ledger.append("0123", "Beef", 1.0).unwrap();

        let group = ledger.group("0123").unwrap();
        assert_eq!(group.description, "Beef");
        assert_eq!(group.weights(), &[1.0]);
    }

    #[test]
    fn append_existing_group() {
        let mut ledger = SampleLedger::new();

        ledger.append("0123", "Beef", 1.0).unwrap();
        ledger.append("0123", "Beef", 2.0).unwrap();

        let summary = ledger.summary_for("0123").unwrap();
        assert_eq!(summary.description, "Beef");
        assert_eq!(summary.average_weight, 1.5);
        assert_eq!(summary.sample_count, 2);
    }

    #[test]
    fn append_keeps_first_description() {
        let mut ledger = SampleLedger::new();

        ledger.append("0123", "Beef", 1.0).unwrap();
        ledger.append("0123", "Beef Chuck", 3.0).unwrap();

        let group = ledger.group("0123").unwrap();
        assert_eq!(group.description, "Beef");
        assert_eq!(group.weights(), &[1.0, 3.0]);
    }

    #[test]
    fn append_rejects_invalid_weight() {
        let mut ledger = SampleLedger::new();

        assert_eq!(
            ledger.append("0123", "Beef", -1.0),
            Err(LedgerError::InvalidWeight(-1.0))
        );
        assert!(ledger.append("0123", "Beef", f64::INFINITY).is_err());
        assert!(ledger.append("0123", "Beef", f64::NAN).is_err());
        assert!(ledger.is_empty());
    }

    #[test]
    fn summaries_in_first_scan_order() {
        let mut ledger = SampleLedger::new();

        ledger.append("0456", "Pork", 2.0).unwrap();
        ledger.append("0123", "Beef", 1.0).unwrap();
        ledger.append("0456", "Pork", 4.0).unwrap();
        ledger.append("0007", "Chicken", 0.5).unwrap();

        let codes: Vec<String> = ledger
            .all_summaries()
            .into_iter()
            .map(|s| s.product_code)
            .collect();
        assert_eq!(codes, vec!["0456", "0123", "0007"]);
        assert_eq!(ledger.summary_for("0456").unwrap().average_weight, 3.0);
    }

    #[test]
    fn summary_for_unknown_code() {
        let ledger = SampleLedger::new();

        assert_eq!(ledger.summary_for("0123"), None);
    }

    #[test]
    fn rounded_average_does_not_touch_samples() {
        let mut ledger = SampleLedger::new();

        ledger.append("0123", "Beef", 1.0).unwrap();
        ledger.append("0123", "Beef", 1.5).unwrap();

        let summary = ledger.summary_for("0123").unwrap();
        assert_eq!(summary.average_weight, 1.25);
        assert_eq!(summary.rounded_average(), 1.5);
        assert_eq!(ledger.group("0123").unwrap().weights(), &[1.0, 1.5]);
    }

    #[test]
    fn clear_resets_everything() {
        let mut ledger = SampleLedger::new();
        ledger.append("0123", "Beef", 1.0).unwrap();
        ledger.append("0456", "Pork", 1.0).unwrap();

        ledger.clear();

        assert!(ledger.is_empty());
        assert!(ledger.all_summaries().is_empty());

        ledger.append("0456", "Pork Loin", 2.0).unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.summary_for("0456").unwrap().description, "Pork Loin");
    }
}
