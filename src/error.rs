use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("barcode must be exactly 12 ASCII digits")]
    MalformedInput,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DivisionError {
    #[error("price per lb. must be greater than zero")]
    ZeroOrNegativeDivisor,
}

#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("weight must be a finite, non-negative number, got {0}")]
    InvalidWeight(f64),
}

/// Failures of a single scan attempt. None of them touch the ledger.
#[derive(Debug, Error, PartialEq)]
pub enum ScanError {
    #[error("Invalid barcode")]
    InvalidBarcode(#[from] DecodeError),

    #[error("Invalid barcode: zero price")]
    ZeroPrice,

    #[error("UPC {0} not found")]
    UnknownProduct(String),

    #[error("UPC {code} has an invalid catalog entry: {reason}")]
    InvalidCatalogEntry { code: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("workbook error: {0}")]
    Workbook(String),

    #[error("workbook has no worksheet")]
    NoWorksheet,

    #[error("missing header row")]
    NoHeaderRow,

    #[error("missing column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: invalid product code '{value}'")]
    InvalidProductCode { row: usize, value: String },

    #[error("row {row}: invalid price per lb. '{value}'")]
    InvalidPrice { row: usize, value: String },

    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),
}
