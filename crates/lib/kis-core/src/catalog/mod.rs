//! In-memory API catalog and its loaders.
//!
//! The catalog is read once from a tabular source (CSV, or a JSON array of
//! objects) and never mutated afterwards.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::{error::Error, fmt};

use kis_store::models::ApiRecord;
use kis_store::schema::SearchField;

mod loader;

pub use loader::{read_csv, read_json};

#[derive(Debug)]
pub enum CatalogError {
    NotFound(PathBuf),
    Io(io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    MissingColumn(&'static str),
    InvalidFormat(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "catalog source not found: {}", path.display()),
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Csv(err) => write!(f, "CSV error: {err}"),
            Self::Json(err) => write!(f, "JSON error: {err}"),
            Self::MissingColumn(name) => write!(f, "missing required column: {name}"),
            Self::InvalidFormat(message) => write!(f, "invalid catalog format: {message}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Csv(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::NotFound(_) | Self::MissingColumn(_) | Self::InvalidFormat(_) => None,
        }
    }
}

impl From<io::Error> for CatalogError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CatalogError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Ordered, immutable collection of API records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    fields: BTreeSet<SearchField>,
    records: Vec<ApiRecord>,
}

impl Catalog {
    /// Builds a catalog whose schema carries every search field.
    #[must_use]
    pub fn new(records: Vec<ApiRecord>) -> Self {
        Self::with_fields(SearchField::ALL, records)
    }

    /// Builds a catalog whose schema carries only the given search fields.
    pub fn with_fields(
        fields: impl IntoIterator<Item = SearchField>,
        records: Vec<ApiRecord>,
    ) -> Self {
        Self {
            fields: fields.into_iter().collect(),
            records,
        }
    }

    /// Loads a catalog from disk. Paths ending in `.json` are read as JSON,
    /// everything else as CSV with a header row.
    ///
    /// # Errors
    /// Returns `CatalogError::NotFound` when the file does not exist, and the
    /// other variants when the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                CatalogError::NotFound(path.to_path_buf())
            } else {
                CatalogError::Io(err)
            }
        })?;
        let reader = BufReader::new(file);
        if is_json(path) {
            read_json(reader)
        } else {
            read_csv(reader)
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn records(&self) -> &[ApiRecord] {
        &self.records
    }

    /// Whether the source this catalog came from has a column for `field`.
    #[must_use]
    pub fn has_field(&self, field: SearchField) -> bool {
        self.fields.contains(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = SearchField> + '_ {
        self.fields.iter().copied()
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_reports_missing_file_as_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing.csv");
        let err = Catalog::load(&path).expect_err("missing file should fail");
        assert!(matches!(err, CatalogError::NotFound(ref missing) if *missing == path));
    }

    #[test]
    fn load_dispatches_on_json_extension() {
        let mut file = tempfile::Builder::new()
            .suffix(".JSON")
            .tempfile()
            .expect("tempfile");
        write!(
            file,
            r#"[{{"category":"auth","subcategory":"인증","function_name":"auth_token","api_name":"A1"}}]"#
        )
        .expect("write fixture");

        let catalog = Catalog::load(file.path()).expect("json catalog should load");
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.records()[0].get(SearchField::ApiName), Some("A1"));
    }

    #[test]
    fn load_reads_csv_by_default() {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("tempfile");
        writeln!(file, "category,subcategory,function_name,api_name").expect("write header");
        writeln!(file, "elw,ELW시세,volume_rank,ELW 거래량순위").expect("write row");

        let catalog = Catalog::load(file.path()).expect("csv catalog should load");
        assert_eq!(catalog.len(), 1);
        assert!(catalog.has_field(SearchField::Category));
        assert!(!catalog.has_field(SearchField::Response));
    }
}
