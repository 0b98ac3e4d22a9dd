use std::collections::HashSet;

use kis_store::models::{ApiMatch, ApiRecord, SearchEnvelope};
use kis_store::schema::{MAX_RESULTS, MatchMode, SearchField};

use super::query::{Predicate, Predicates, SearchQuery};
use crate::catalog::Catalog;

pub const MSG_DATA_NOT_LOADED: &str = "Data not loaded";
pub const MSG_NO_VALID_PARAMETERS: &str = "No valid search parameters";

/// Runs `query` against `catalog` and shapes the response envelope.
///
/// A single `category` or `subcategory` predicate yields the full
/// de-duplicated listing; every other query yields at most `MAX_RESULTS`
/// detailed rows.
#[must_use]
pub fn search_catalog(catalog: &Catalog, query: &SearchQuery) -> SearchEnvelope {
    let predicates = Predicates::normalize(query, |field| catalog.has_field(field));
    if predicates.is_empty() {
        return SearchEnvelope::error(MSG_NO_VALID_PARAMETERS);
    }

    let matched: Vec<&ApiRecord> = catalog
        .records()
        .iter()
        .filter(|record| matches_all(record, &predicates))
        .collect();

    if matched.is_empty() {
        return SearchEnvelope::no_results(format!(
            "No APIs found with conditions: {predicates}"
        ));
    }

    if predicates.sole_grouping_field().is_some() {
        summarize(&matched)
    } else {
        detail(&matched)
    }
}

fn matches_all(record: &ApiRecord, predicates: &Predicates) -> bool {
    predicates
        .iter()
        .all(|predicate| matches_predicate(record, predicate))
}

fn matches_predicate(record: &ApiRecord, predicate: &Predicate) -> bool {
    let Some(cell) = record.get(predicate.field) else {
        return false;
    };
    match predicate.field.match_mode() {
        MatchMode::Exact => cell == predicate.value,
        MatchMode::Substring => contains_ignore_case(cell, &predicate.value),
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn summarize(matched: &[&ApiRecord]) -> SearchEnvelope {
    let mut seen = HashSet::new();
    let results: Vec<ApiMatch> = matched
        .iter()
        .filter(|record| seen.insert(record.get(SearchField::ApiName)))
        .map(|record| ApiMatch::summary(record))
        .collect();

    let total = matched.len();
    let unique = results.len();
    SearchEnvelope::success(
        format!("Found {total} APIs ({unique} unique)"),
        total,
        results,
    )
}

fn detail(matched: &[&ApiRecord]) -> SearchEnvelope {
    let total = matched.len();
    let results: Vec<ApiMatch> = matched
        .iter()
        .take(MAX_RESULTS)
        .map(|record| ApiMatch::detail(record))
        .collect();

    let message = if total > MAX_RESULTS {
        format!("Found {total} APIs (showing first {MAX_RESULTS})")
    } else {
        format!("Found {total} APIs")
    };
    SearchEnvelope::success(message, total, results)
}
