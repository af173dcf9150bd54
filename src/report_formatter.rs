//! Plain-text rendering of query results.
//!
//! Output is deterministic: environments always appear in `dev, prod, stg`
//! order and absent entries are printed as `none` rather than skipped.

use crate::comparison::{CollectionListing, ComparisonResult};
use crate::environment::Environment;
use crate::matcher::MatchResult;
use crate::reference_parser::ParsedReference;
use crate::search::{NameSearchResult, SearchOutcome};
use crate::validator::ValidationReport;

const RULE: &str = "================================================================================";
const THIN_RULE: &str = "--------------------------------------------------------------------------------";

pub fn format_references(references: &[ParsedReference]) -> String {
    if references.is_empty() {
        return "No block references found.".to_string();
    }
    let mut lines = vec![format!("{} block references:", references.len())];
    for r in references {
        lines.push(format!("  [{:3}] {} = {}", r.source_line, r.path, r.identifier));
    }
    lines.join("\n")
}

pub fn format_validation(report: &ValidationReport) -> String {
    let mut lines = vec![
        format!("[{}] block reference validation", report.environment.label()),
        RULE.to_string(),
        format!(
            "total: {}, valid: {}, invalid: {}",
            report.total, report.valid_count, report.invalid_count
        ),
    ];

    if report.valid_count > 0 {
        lines.push(String::new());
        lines.push("Valid:".to_string());
        lines.push(THIN_RULE.to_string());
        for r in report.valid() {
            lines.push(format!("  [{:3}] {}", r.source_line, r.path));
            lines.push(format!("        id: {}", r.identifier));
            lines.push(format!(
                "        scenario: {} | block: {}",
                r.resolved_collection_name.as_deref().unwrap_or(""),
                r.resolved_item_name.as_deref().unwrap_or("")
            ));
        }
    }

    if report.invalid_count > 0 {
        lines.push(String::new());
        lines.push("Invalid:".to_string());
        lines.push(THIN_RULE.to_string());
        for r in report.invalid() {
            lines.push(format!("  [{:3}] {}", r.source_line, r.path));
            lines.push(format!("        id: {} (not found in {})", r.identifier, report.environment));
        }
    }

    lines.push(RULE.to_string());
    lines.join("\n")
}

pub fn format_match(result: &MatchResult) -> String {
    let (Some(collection), Some(item)) = (&result.collection_name, &result.item_name) else {
        return format!("Block id '{}' not found.", result.identifier);
    };

    let mut lines = vec![
        format!("Block id '{}'", result.identifier),
        format!("scenario: {}", collection),
        format!("block: {}", item),
        RULE.to_string(),
    ];
    for env in Environment::ALL {
        match result.get(env) {
            Some(m) => lines.push(format!(
                "[{}] scenario id: {} | block id: {}",
                env.label(),
                m.collection_id,
                m.item_id
            )),
            None => lines.push(format!("[{}] none", env.label())),
        }
    }
    lines.push(RULE.to_string());
    lines.join("\n")
}

pub fn format_name_search(result: &NameSearchResult) -> String {
    if result.total_hits == 0 {
        return format!("No blocks matching '{}'.", result.term);
    }

    let mut lines = vec![format!("{} blocks matching '{}':", result.total_hits, result.term)];
    lines.push(RULE.to_string());
    for (idx, row) in result.rows.iter().enumerate() {
        lines.push(format!("[{}] scenario: {}", idx + 1, row.collection_name));
        lines.push(format!("    block: {}", row.item_name));
        lines.push(THIN_RULE.to_string());
        for env in Environment::ALL {
            match row.environments.get(&env).and_then(Option::as_ref) {
                Some(ids) => lines.push(format!(
                    "    [{}] scenario id: {} | block id: {}",
                    env.label(),
                    ids.collection_id,
                    ids.item_id
                )),
                None => lines.push(format!("    [{}] none", env.label())),
            }
        }
        lines.push(RULE.to_string());
    }
    lines.join("\n")
}

pub fn format_search(outcome: &SearchOutcome) -> String {
    match outcome {
        SearchOutcome::Identifier(result) => format_match(result),
        SearchOutcome::Name(result) => format_name_search(result),
    }
}

pub fn format_listing(listing: &CollectionListing) -> String {
    if listing.collections.is_empty() {
        return format!("[{}] no scenarios.", listing.environment.label());
    }

    let mut lines = vec![format!(
        "[{}] {} scenarios:",
        listing.environment.label(),
        listing.total_collections
    )];
    lines.push(RULE.to_string());
    for collection in &listing.collections {
        lines.push(format!("scenario id: {}", collection.id));
        lines.push(format!("scenario name: {}", collection.name));
        lines.push(format!("blocks: {}", collection.items.len()));
        lines.push(THIN_RULE.to_string());
        if collection.items.is_empty() {
            lines.push("  (no blocks)".to_string());
        }
        for (idx, item) in collection.items.iter().enumerate() {
            lines.push(format!("  [{}] block id: {} | block name: {}", idx + 1, item.id, item.name));
        }
        lines.push(RULE.to_string());
    }
    lines.join("\n")
}

pub fn format_comparison(result: &ComparisonResult) -> String {
    let mut lines = vec![
        "Scenario comparison".to_string(),
        RULE.to_string(),
        format!("{} unique scenarios", result.unique_collections),
    ];
    for comparison in &result.collections {
        lines.push(String::new());
        lines.push(format!("scenario: {}", comparison.collection_name));
        lines.push(THIN_RULE.to_string());
        for env in Environment::ALL {
            match comparison.environments.get(&env).and_then(Option::as_ref) {
                Some(p) => lines.push(format!(
                    "  [{}] id: {} | blocks: {}",
                    env.label(),
                    p.collection_id,
                    p.item_count
                )),
                None => lines.push(format!("  [{}] none", env.label())),
            }
        }
    }
    lines.push(RULE.to_string());
    lines.join("\n")
}
