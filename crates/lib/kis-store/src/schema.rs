use std::{error::Error, fmt, str::FromStr};

pub const FIELD_CATEGORY: &str = "category";
pub const FIELD_SUBCATEGORY: &str = "subcategory";
pub const FIELD_FUNCTION_NAME: &str = "function_name";
pub const FIELD_API_NAME: &str = "api_name";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_RESPONSE: &str = "response";
pub const FIELD_URL_MAIN: &str = "url_main";
pub const FIELD_URL_CHK: &str = "url_chk";

pub const CATEGORY_AUTH: &str = "auth";
pub const CATEGORY_DOMESTIC_STOCK: &str = "domestic_stock";
pub const CATEGORY_DOMESTIC_BOND: &str = "domestic_bond";
pub const CATEGORY_DOMESTIC_FUTUREOPTION: &str = "domestic_futureoption";
pub const CATEGORY_OVERSEAS_STOCK: &str = "overseas_stock";
pub const CATEGORY_OVERSEAS_FUTUREOPTION: &str = "overseas_futureoption";
pub const CATEGORY_ELW: &str = "elw";
pub const CATEGORY_ETFETN: &str = "etfetn";

/// Maximum number of rows returned by a detail search.
pub const MAX_RESULTS: usize = 10;

/// How a predicate on a field is compared against catalog cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchMode {
    /// Case-sensitive equality.
    Exact,
    /// Case-insensitive literal containment.
    Substring,
}

/// Catalog columns that can be used as search predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SearchField {
    Category,
    Subcategory,
    FunctionName,
    ApiName,
    Description,
    Response,
    UrlMain,
    UrlChk,
}

impl SearchField {
    pub const ALL: [Self; 8] = [
        Self::Category,
        Self::Subcategory,
        Self::FunctionName,
        Self::ApiName,
        Self::Description,
        Self::Response,
        Self::UrlMain,
        Self::UrlChk,
    ];

    /// Columns a catalog source must provide to be loadable.
    pub const REQUIRED: [Self; 4] = [
        Self::Category,
        Self::Subcategory,
        Self::FunctionName,
        Self::ApiName,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Category => FIELD_CATEGORY,
            Self::Subcategory => FIELD_SUBCATEGORY,
            Self::FunctionName => FIELD_FUNCTION_NAME,
            Self::ApiName => FIELD_API_NAME,
            Self::Description => FIELD_DESCRIPTION,
            Self::Response => FIELD_RESPONSE,
            Self::UrlMain => FIELD_URL_MAIN,
            Self::UrlChk => FIELD_URL_CHK,
        }
    }

    #[must_use]
    pub const fn match_mode(self) -> MatchMode {
        match self {
            Self::Category | Self::Subcategory => MatchMode::Exact,
            _ => MatchMode::Substring,
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a column name is not a known search field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField(pub String);

impl fmt::Display for UnknownField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown search field: {}", self.0)
    }
}

impl Error for UnknownField {}

impl FromStr for SearchField {
    type Err = UnknownField;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == value)
            .ok_or_else(|| UnknownField(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_round_trip_case_sensitively() {
        for field in SearchField::ALL {
            assert_eq!(field.as_str().parse::<SearchField>(), Ok(field));
        }
        assert!("Category".parse::<SearchField>().is_err());
        assert!("query".parse::<SearchField>().is_err());
    }

    #[test]
    fn only_grouping_fields_match_exactly() {
        let exact: Vec<SearchField> = SearchField::ALL
            .into_iter()
            .filter(|field| field.match_mode() == MatchMode::Exact)
            .collect();
        assert_eq!(exact, vec![SearchField::Category, SearchField::Subcategory]);
    }
}
