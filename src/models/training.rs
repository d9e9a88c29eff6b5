use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const UNKNOWN_EXERCISE: &str = "Unbekannte Übung";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lb,
}

/// One logged set. Weight is always normalized to kilograms.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SetEntry {
    pub weight: f64,
    pub reps: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpe: Option<f64>,
    pub unit: WeightUnit,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub name: String,
    pub sets: Vec<SetEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superset_with: Option<String>,
}

impl Exercise {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sets: vec![],
            notes: None,
            superset_with: None,
        }
    }

    /// Mean RPE over the sets that carry one
    pub fn average_rpe(&self) -> Option<f64> {
        let rpes: Vec<f64> = self.sets.iter().filter_map(|s| s.rpe).collect();
        if rpes.is_empty() {
            return None;
        }
        Some(rpes.iter().sum::<f64>() / rpes.len() as f64)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingSession {
    pub session_date: NaiveDate,
    pub split_type: String,
    pub exercises: Vec<Exercise>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Diagnostics gathered while parsing a log
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ParseMeta {
    pub warnings: Vec<String>,
    pub lines_total: usize,
    pub lines_ignored: usize,
    pub sets_parsed: usize,
    pub supersets: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParsedTrainingLog {
    pub session: TrainingSession,
    pub markdown: String,
    pub meta: ParseMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_unit_defaults_to_kg() {
        assert_eq!(WeightUnit::default(), WeightUnit::Kg);
        assert_eq!(serde_json::to_value(WeightUnit::default()).unwrap(), "kg");
    }
}
