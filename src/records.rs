use calamine::{open_workbook_auto, Data, Reader};
use serde::Deserialize;
use std::{fs::File, path::Path};
use tracing::{debug, info, warn};

use crate::catalog::{ReferenceCatalog, ReferenceEntry};
use crate::error::ImportError;

pub const DESCRIPTION_COLUMN: &str = "Description";
pub const PRICE_COLUMN: &str = "Price per lb.";

// Column 0 is the product code whatever its header says; it is renamed to this before deserializing.
const CODE_FIELD: &str = "__product_code";
const PRODUCT_CODE_LEN: usize = 4;

/// A catalog row as read from the file, before coercion.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Record {
    #[serde(rename = "__product_code", deserialize_with = "trim_string")]
    pub code: String,
    #[serde(rename = "Description", deserialize_with = "trim_string")]
    pub description: String,
    #[serde(rename = "Price per lb.", deserialize_with = "trim_string")]
    pub price_per_pound: String,
}

impl Record {
    fn is_blank(&self) -> bool {
        self.code.is_empty() && self.description.is_empty() && self.price_per_pound.is_empty()
    }

    /// `row` is the 1-based sheet row, header included, used in error messages.
    fn into_entry(self, row: usize) -> Result<ReferenceEntry, ImportError> {
        let product_code =
            normalize_product_code(&self.code).ok_or_else(|| ImportError::InvalidProductCode {
                row,
                value: self.code.clone(),
            })?;
        let price_per_pound =
            parse_price(&self.price_per_pound).ok_or_else(|| ImportError::InvalidPrice {
                row,
                value: self.price_per_pound.clone(),
            })?;

        if price_per_pound <= 0.0 {
            warn!(row, code = %product_code, price_per_pound, "non-positive price per lb.");
        }

        Ok(ReferenceEntry {
            product_code,
            description: self.description,
            price_per_pound,
        })
    }
}

/// Loads a reference table, picking the reader from the file extension.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<ReferenceCatalog, ImportError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let entries = match extension.as_str() {
        "csv" => read_csv(path)?,
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path)?,
        _ => return Err(ImportError::UnsupportedFormat(path.display().to_string())),
    };

    let row_count = entries.len();
    let catalog = ReferenceCatalog::from_entries(entries);
    info!(
        path = %path.display(),
        rows = row_count,
        products = catalog.len(),
        "catalog loaded"
    );

    Ok(catalog)
}

pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Vec<ReferenceEntry>, ImportError> {
    let file = File::open(path)?;
    // csv::Reader buffers internally.
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(file);

    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(ImportError::NoHeaderRow);
    }
    let names: Vec<String> = headers.iter().map(str::to_owned).collect();
    check_columns(&names)?;

    let renamed: csv::StringRecord = std::iter::once(CODE_FIELD)
        .chain(headers.iter().skip(1))
        .collect();
    rdr.set_headers(renamed);

    let mut entries = Vec::new();
    for (i, record) in rdr.deserialize::<Record>().enumerate() {
        let record = record?;
        if record.is_blank() {
            continue;
        }
        entries.push(record.into_entry(i + 2)?);
    }

    Ok(entries)
}

/// Reads the first worksheet of a spreadsheet.
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<Vec<ReferenceEntry>, ImportError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| ImportError::Workbook(e.to_string()))?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ImportError::NoWorksheet)?;
    debug!(sheet = %sheet, "reading worksheet");

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| ImportError::Workbook(e.to_string()))?;

    // The range begins at the first used cell; indices and row numbers below are sheet-absolute.
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let start_col = start_col as usize;
    let header_row_number = start_row as usize + 1;

    let mut rows = range.rows();
    let header_row = rows.next().ok_or(ImportError::NoHeaderRow)?;
    let headers: Vec<String> = std::iter::repeat(String::new())
        .take(start_col)
        .chain(header_row.iter().map(|c| cell_string(c).unwrap_or_default()))
        .collect();
    let (description_idx, price_idx) = check_columns(&headers)?;

    let mut entries = Vec::new();
    for (i, row) in rows.enumerate() {
        let cell = |idx: usize| {
            idx.checked_sub(start_col)
                .and_then(|rel| row.get(rel))
                .and_then(cell_string)
                .unwrap_or_default()
        };
        let record = Record {
            code: cell(0),
            description: cell(description_idx),
            price_per_pound: cell(price_idx),
        };
        if record.is_blank() {
            continue;
        }
        entries.push(record.into_entry(header_row_number + i + 1)?);
    }

    Ok(entries)
}

/// Finds the description and price columns, never column 0.
fn check_columns(headers: &[String]) -> Result<(usize, usize), ImportError> {
    let position = |name: &'static str| {
        headers
            .iter()
            .skip(1)
            .position(|h| h.trim() == name)
            .map(|p| p + 1)
            .ok_or(ImportError::MissingColumn(name))
    };

    Ok((position(DESCRIPTION_COLUMN)?, position(PRICE_COLUMN)?))
}

/// Coerces a code cell to 4 zero-padded digits. `123`, `0123` and `123.0` all give `0123`.
pub fn normalize_product_code(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let digits = match raw.split_once('.') {
        Some((whole, fraction)) if fraction.bytes().all(|b| b == b'0') => whole,
        Some(_) => return None,
        None => raw,
    };

    if digits.is_empty()
        || digits.len() > PRODUCT_CODE_LEN
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    Some(format!("{:0>width$}", digits, width = PRODUCT_CODE_LEN))
}

pub fn parse_price(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
    let value: f64 = trimmed.parse().ok()?;
    value.is_finite().then_some(value)
}

fn cell_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.trim().to_string()),
        Data::Float(v) => Some(format!("{v}")),
        Data::Int(v) => Some(format!("{v}")),
        Data::Bool(v) => Some(v.to_string()),
        other => Some(format!("{other:?}")),
    }
}

fn trim_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = String::deserialize(deserializer)?;
    Ok(s.trim().to_owned())
}
