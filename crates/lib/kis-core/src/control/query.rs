use std::fmt;

use kis_store::schema::SearchField;

/// Caller-supplied predicates, in the order they were given.
///
/// Keys are free-form so the tool layer can forward whatever it received;
/// unknown keys and missing values are dropped when the query is normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    predicates: Vec<(String, Option<String>)>,
}

impl SearchQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, Some(value.into()));
        self
    }

    #[must_use]
    pub fn with_optional(mut self, key: impl Into<String>, value: Option<String>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: Option<String>) {
        self.predicates.push((key.into(), value));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.predicates
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_deref()))
    }
}

impl<K, V> FromIterator<(K, Option<V>)> for SearchQuery
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        Self {
            predicates: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.map(Into::into)))
                .collect(),
        }
    }
}

/// One validated predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub field: SearchField,
    pub value: String,
}

/// Predicates that survived normalization, in first-seen key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicates(Vec<Predicate>);

impl Predicates {
    /// Drops null values and keys that are not search fields or that
    /// `has_column` rejects. A repeated key keeps its first position and takes
    /// the last value.
    pub fn normalize(query: &SearchQuery, has_column: impl Fn(SearchField) -> bool) -> Self {
        let mut predicates: Vec<Predicate> = Vec::new();
        for (key, value) in query.iter() {
            let Some(value) = value else {
                continue;
            };
            let Ok(field) = key.parse::<SearchField>() else {
                continue;
            };
            if !has_column(field) {
                continue;
            }
            match predicates.iter_mut().find(|existing| existing.field == field) {
                Some(existing) => value.clone_into(&mut existing.value),
                None => predicates.push(Predicate {
                    field,
                    value: value.to_string(),
                }),
            }
        }
        Self(predicates)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Predicate> {
        self.0.iter()
    }

    /// The single grouping field this query filters on, if that is all it does.
    #[must_use]
    pub fn sole_grouping_field(&self) -> Option<SearchField> {
        match self.0.as_slice() {
            [only] if matches!(only.field, SearchField::Category | SearchField::Subcategory) => {
                Some(only.field)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Predicates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (index, predicate) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "'{}': '{}'", predicate.field, predicate.value)?;
        }
        f.write_str("}")
    }
}
