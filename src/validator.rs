use serde::{Deserialize, Serialize};

use crate::dataset_index::DatasetIndex;
use crate::environment::Environment;
use crate::reference_parser::ParsedReference;

/// Outcome of checking one reference against an environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub identifier: String,
    pub path: String,
    pub source_line: usize,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_collection_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_collection_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_item_name: Option<String>,
}

/// All results for one environment, in reference order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub environment: Environment,
    pub total: usize,
    pub valid_count: usize,
    pub invalid_count: usize,
    pub results: Vec<ValidationResult>,
}

impl ValidationReport {
    pub fn valid(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results.iter().filter(|r| r.valid)
    }

    pub fn invalid(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results.iter().filter(|r| !r.valid)
    }
}

/// Check each reference against `index`.
///
/// Nothing is dropped or merged: a repeated identifier yields one result per
/// occurrence. Zero references or zero valid ones are ordinary reports.
pub fn validate_references(
    references: &[ParsedReference],
    index: &DatasetIndex<'_>,
    environment: Environment,
) -> ValidationReport {
    let results: Vec<ValidationResult> = references
        .iter()
        .map(|reference| {
            let resolved = index.by_identifier(&reference.identifier);
            ValidationResult {
                identifier: reference.identifier.clone(),
                path: reference.path.clone(),
                source_line: reference.source_line,
                valid: resolved.is_some(),
                resolved_collection_id: resolved.as_ref().map(|r| r.collection_id.clone()),
                resolved_collection_name: resolved.as_ref().map(|r| r.collection_name.clone()),
                resolved_item_name: resolved.map(|r| r.item_name),
            }
        })
        .collect();

    let valid_count = results.iter().filter(|r| r.valid).count();
    let total = results.len();

    ValidationReport {
        environment,
        total,
        valid_count,
        invalid_count: total - valid_count,
        results,
    }
}
