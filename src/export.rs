use rust_xlsxwriter::{Format, Workbook};
use serde::{Serialize, Serializer};
use std::path::Path;
use tracing::info;

use crate::error::ExportError;
use crate::ledger::SampleLedger;

pub const EXPORT_SHEET_NAME: &str = "Export";
pub const HEADERS: [&str; 4] = ["UPC", "Description", "Avg Weight", "Samples"];

#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct ExportRow {
    #[serde(rename = "UPC")]
    pub code: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Avg Weight", serialize_with = "serialize_f64_1dp")]
    pub avg_weight: f64,
    #[serde(rename = "Samples")]
    pub sample_count: usize,
}

/// One row per product in first-scan order, average rounded to the half pound.
pub fn format_rows(ledger: &SampleLedger) -> Vec<ExportRow> {
    ledger
        .all_summaries()
        .into_iter()
        .map(|summary| ExportRow {
            avg_weight: summary.rounded_average(),
            code: summary.product_code,
            description: summary.description,
            sample_count: summary.sample_count,
        })
        .collect()
}

/// Writes the rows, picking the format from the file extension.
pub fn write_export<P: AsRef<Path>>(path: P, rows: &[ExportRow]) -> Result<(), ExportError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => write_csv(path, rows)?,
        "xlsx" => write_xlsx(path, rows)?,
        _ => return Err(ExportError::UnsupportedFormat(path.display().to_string())),
    }

    info!(path = %path.display(), rows = rows.len(), "export written");
    Ok(())
}

pub fn write_csv<P: AsRef<Path>>(path: P, rows: &[ExportRow]) -> Result<(), ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    // Written by hand so an empty ledger still produces a header row.
    wtr.write_record(HEADERS)?;
    for row in rows {
        wtr.serialize(row)?;
    }

    wtr.flush()?;

    Ok(())
}

pub fn write_xlsx<P: AsRef<Path>>(path: P, rows: &[ExportRow]) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let weight_format = Format::new().set_num_format("0.0");

    let sheet = workbook.add_worksheet();
    sheet.set_name(EXPORT_SHEET_NAME)?;
    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    let mut row_idx: u32 = 1;
    for row in rows {
        sheet.write_string(row_idx, 0, &row.code)?;
        sheet.write_string(row_idx, 1, &row.description)?;
        sheet.write_number_with_format(row_idx, 2, row.avg_weight, &weight_format)?;
        sheet.write_number(row_idx, 3, row.sample_count as f64)?;
        row_idx += 1;
    }

    workbook.save(path.as_ref())?;

    Ok(())
}

fn serialize_f64_1dp<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("{:.1}", value))
}
