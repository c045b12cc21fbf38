use std::collections::BTreeMap;

use serde::Serialize;

use crate::aggregation::merge::Period;
use crate::detection::SuperCategory;

/// Periods per super-category. Both keys are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AggregationReport {
    periods: BTreeMap<SuperCategory, Vec<Period>>,
}

impl Default for AggregationReport {
    fn default() -> Self {
        Self {
            periods: SuperCategory::ALL
                .into_iter()
                .map(|category| (category, Vec::new()))
                .collect(),
        }
    }
}

impl AggregationReport {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, super_category: SuperCategory, periods: Vec<Period>) {
        self.periods.insert(super_category, periods);
    }

    pub fn periods(&self, super_category: SuperCategory) -> &[Period] {
        self.periods
            .get(&super_category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn people(&self) -> &[Period] {
        self.periods(SuperCategory::People)
    }

    pub fn vehicles(&self) -> &[Period] {
        self.periods(SuperCategory::Vehicles)
    }

    pub fn is_empty(&self) -> bool {
        self.periods.values().all(Vec::is_empty)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
