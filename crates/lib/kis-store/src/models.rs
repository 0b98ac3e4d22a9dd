use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::SearchField;

/// One row of the API catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_main: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_chk: Option<String>,
    /// Columns outside the search schema. Kept for completeness, never projected.
    #[serde(default, flatten, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl ApiRecord {
    /// Creates a record with the four identifying columns set.
    pub fn new(
        category: impl Into<String>,
        subcategory: impl Into<String>,
        function_name: impl Into<String>,
        api_name: impl Into<String>,
    ) -> Self {
        Self {
            category: Some(category.into()),
            subcategory: Some(subcategory.into()),
            function_name: Some(function_name.into()),
            api_name: Some(api_name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: SearchField, value: impl Into<String>) -> Self {
        self.set(field, Some(value.into()));
        self
    }

    /// Returns the cell for a search field, if present.
    #[must_use]
    pub fn get(&self, field: SearchField) -> Option<&str> {
        let cell = match field {
            SearchField::Category => &self.category,
            SearchField::Subcategory => &self.subcategory,
            SearchField::FunctionName => &self.function_name,
            SearchField::ApiName => &self.api_name,
            SearchField::Description => &self.description,
            SearchField::Response => &self.response,
            SearchField::UrlMain => &self.url_main,
            SearchField::UrlChk => &self.url_chk,
        };
        cell.as_deref()
    }

    pub fn set(&mut self, field: SearchField, value: Option<String>) {
        let cell = match field {
            SearchField::Category => &mut self.category,
            SearchField::Subcategory => &mut self.subcategory,
            SearchField::FunctionName => &mut self.function_name,
            SearchField::ApiName => &mut self.api_name,
            SearchField::Description => &mut self.description,
            SearchField::Response => &mut self.response,
            SearchField::UrlMain => &mut self.url_main,
            SearchField::UrlChk => &mut self.url_chk,
        };
        *cell = value;
    }

    fn text(&self, field: SearchField) -> String {
        self.get(field).unwrap_or_default().to_string()
    }
}

/// Projection of a matched record returned to callers.
///
/// Summary listings leave the URL fields unset; detail listings always carry
/// them, empty when the catalog has no value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiMatch {
    pub function_name: String,
    pub api_name: String,
    pub category: String,
    pub subcategory: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_main: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_chk: Option<String>,
}

impl ApiMatch {
    #[must_use]
    pub fn summary(record: &ApiRecord) -> Self {
        Self {
            function_name: record.text(SearchField::FunctionName),
            api_name: record.text(SearchField::ApiName),
            category: record.text(SearchField::Category),
            subcategory: record.text(SearchField::Subcategory),
            url_main: None,
            url_chk: None,
        }
    }

    #[must_use]
    pub fn detail(record: &ApiRecord) -> Self {
        Self {
            url_main: Some(record.text(SearchField::UrlMain)),
            url_chk: Some(record.text(SearchField::UrlChk)),
            ..Self::summary(record)
        }
    }
}

/// Outcome class of a catalog search.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    Success,
    NoResults,
    Error,
}

/// Uniform response envelope for catalog searches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchEnvelope {
    pub status: SearchStatus,
    pub message: String,
    pub total_count: usize,
    pub results: Vec<ApiMatch>,
}

impl SearchEnvelope {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: SearchStatus::Error,
            message: message.into(),
            total_count: 0,
            results: Vec::new(),
        }
    }

    pub fn no_results(message: impl Into<String>) -> Self {
        Self {
            status: SearchStatus::NoResults,
            message: message.into(),
            total_count: 0,
            results: Vec::new(),
        }
    }

    pub fn success(message: impl Into<String>, total_count: usize, results: Vec<ApiMatch>) -> Self {
        Self {
            status: SearchStatus::Success,
            message: message.into(),
            total_count,
            results,
        }
    }
}

/// Outcome class of a source file fetch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    Success,
    PartialSuccess,
    Error,
}

/// Result of fetching a single source file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceFile {
    pub status: FetchStatus,
    pub message: String,
    pub content: String,
    /// URL as supplied by the caller.
    pub url: String,
    /// Raw URL actually requested, when the supplied URL could be resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_url: Option<String>,
}

/// Per-kind source fetch results.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceFiles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<SourceFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check: Option<SourceFile>,
}

impl SourceFiles {
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &SourceFile> {
        self.main.iter().chain(self.check.iter())
    }
}

/// Aggregate report for a source fetch request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceFetchReport {
    pub status: FetchStatus,
    pub message: String,
    pub results: SourceFiles,
}
