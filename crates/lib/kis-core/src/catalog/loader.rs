use std::collections::BTreeSet;
use std::io::Read;

use kis_store::models::ApiRecord;
use kis_store::schema::SearchField;
use serde_json::Value;

use super::{Catalog, CatalogError};

/// Header of a source column: either a search field or an extra column.
enum Column {
    Field(SearchField),
    Extra(String),
}

impl Column {
    fn from_header(header: &str) -> Self {
        let name = header.trim_start_matches('\u{feff}').trim();
        name.parse()
            .map_or_else(|_| Self::Extra(name.to_string()), Self::Field)
    }

    const fn field(&self) -> Option<SearchField> {
        match self {
            Self::Field(field) => Some(*field),
            Self::Extra(_) => None,
        }
    }

    fn assign(&self, record: &mut ApiRecord, value: Option<String>) {
        match self {
            Self::Field(field) => record.set(*field, value),
            Self::Extra(name) => {
                if let Some(value) = value {
                    record.extra.insert(name.clone(), value);
                }
            }
        }
    }
}

/// Reads a CSV catalog with a header row. Empty cells are missing values.
///
/// # Errors
/// Returns `CatalogError` if the CSV is malformed or a required column is
/// absent from the header.
pub fn read_csv<R: Read>(reader: R) -> Result<Catalog, CatalogError> {
    let mut reader = csv::ReaderBuilder::new().from_reader(reader);
    let columns: Vec<Column> = reader.headers()?.iter().map(Column::from_header).collect();
    let fields = present_fields(columns.iter().filter_map(Column::field))?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let mut record = ApiRecord::default();
        for (column, cell) in columns.iter().zip(row.iter()) {
            let value = (!cell.is_empty()).then(|| cell.to_string());
            column.assign(&mut record, value);
        }
        records.push(record);
    }

    Ok(Catalog::with_fields(fields, records))
}

/// Reads a JSON catalog: an array of flat objects keyed by column name.
///
/// Non-string scalars are stored in their string form and `null` is a
/// missing value.
///
/// # Errors
/// Returns `CatalogError` if the document is not an array of objects or a
/// required column never appears.
pub fn read_json<R: Read>(reader: R) -> Result<Catalog, CatalogError> {
    let value: Value = serde_json::from_reader(reader)?;
    let Value::Array(rows) = value else {
        return Err(CatalogError::InvalidFormat(
            "expected a JSON array of objects".to_string(),
        ));
    };
    if rows.is_empty() {
        return Ok(Catalog::new(Vec::new()));
    }

    let mut seen = BTreeSet::new();
    let mut records = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        let Value::Object(cells) = row else {
            return Err(CatalogError::InvalidFormat(format!(
                "row {index} is not an object"
            )));
        };
        let mut record = ApiRecord::default();
        for (key, cell) in cells {
            let column = Column::from_header(&key);
            if let Some(field) = column.field() {
                seen.insert(field);
            }
            column.assign(&mut record, cell_text(cell));
        }
        records.push(record);
    }

    let fields = present_fields(seen)?;
    Ok(Catalog::with_fields(fields, records))
}

fn cell_text(cell: Value) -> Option<String> {
    match cell {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

fn present_fields(
    fields: impl IntoIterator<Item = SearchField>,
) -> Result<BTreeSet<SearchField>, CatalogError> {
    let fields: BTreeSet<SearchField> = fields.into_iter().collect();
    if let Some(missing) = SearchField::REQUIRED
        .into_iter()
        .find(|field| !fields.contains(field))
    {
        return Err(CatalogError::MissingColumn(missing.as_str()));
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "category,subcategory,function_name,api_name,description,response,url_main,url_chk,method";

    #[test]
    fn csv_rows_keep_table_order_and_extra_columns() {
        let data = format!(
            "\u{feff}{HEADER}\n\
             auth,인증,auth_token,접근토큰발급,토큰 발급,,https://x/examples_llm/auth/auth_token/auth_token.py,,POST\n\
             auth,인증,auth_ws_token,실시간 접속키,웹소켓 접속키,approval_key,,,POST\n"
        );
        let catalog = read_csv(data.as_bytes()).expect("csv should parse");

        assert_eq!(catalog.len(), 2);
        let first = &catalog.records()[0];
        assert_eq!(first.get(SearchField::FunctionName), Some("auth_token"));
        assert_eq!(first.get(SearchField::Response), None);
        assert_eq!(first.get(SearchField::UrlChk), None);
        assert_eq!(first.extra.get("method").map(String::as_str), Some("POST"));
        assert_eq!(
            catalog.records()[1].get(SearchField::Response),
            Some("approval_key")
        );
        assert!(catalog.has_field(SearchField::Category));
    }

    #[test]
    fn csv_without_required_column_is_rejected() {
        let data = "category,subcategory,function_name\nauth,인증,auth_token\n";
        let err = read_csv(data.as_bytes()).expect_err("api_name is required");
        assert!(matches!(err, CatalogError::MissingColumn("api_name")));
    }

    #[test]
    fn csv_with_ragged_rows_is_rejected() {
        let data = "category,subcategory,function_name,api_name\nauth,인증\n";
        let err = read_csv(data.as_bytes()).expect_err("ragged rows should fail");
        assert!(matches!(err, CatalogError::Csv(_)));
    }

    #[test]
    fn json_scalars_are_coerced_to_text() {
        let data = r#"[
            {"category": "auth", "subcategory": "인증", "function_name": "auth_token",
             "api_name": 1001, "response": true, "description": null, "rank": 3}
        ]"#;
        let catalog = read_json(data.as_bytes()).expect("json should parse");
        let record = &catalog.records()[0];

        assert_eq!(record.get(SearchField::ApiName), Some("1001"));
        assert_eq!(record.get(SearchField::Response), Some("true"));
        assert_eq!(record.get(SearchField::Description), None);
        assert_eq!(record.extra.get("rank").map(String::as_str), Some("3"));
        assert!(catalog.has_field(SearchField::Description));
        assert!(!catalog.has_field(SearchField::UrlMain));
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        let err = read_json(r#"{"category": "auth"}"#.as_bytes()).expect_err("object root");
        assert!(matches!(err, CatalogError::InvalidFormat(_)));

        let err = read_json("[1, 2]".as_bytes()).expect_err("scalar rows");
        assert!(matches!(err, CatalogError::InvalidFormat(_)));
    }

    #[test]
    fn empty_json_array_is_an_empty_catalog() {
        let catalog = read_json("[]".as_bytes()).expect("empty array");
        assert!(catalog.is_empty());
        assert!(catalog.has_field(SearchField::Response));
    }
}
