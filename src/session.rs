//! One scanning session: the loaded catalog plus the samples collected so far.
//!
//! Every operation takes `&mut self`, so a catalog swap can never interleave with the
//! lookup of an in-flight scan.

use tracing::{debug, info, warn};

use crate::barcode::decode;
use crate::catalog::ReferenceCatalog;
use crate::error::ScanError;
use crate::export::{format_rows, ExportRow};
use crate::ledger::{GroupSummary, SampleLedger};
use crate::weight::derive_weight;

#[derive(Debug, Default)]
pub struct Session {
    catalog: ReferenceCatalog,
    ledger: SampleLedger,
}

impl Session {
    pub fn new(catalog: ReferenceCatalog) -> Self {
        Session {
            catalog,
            ledger: SampleLedger::new(),
        }
    }

    /// Decode, look up, derive and record one scan. Returns the updated summary of the
    /// scanned product; on error the ledger is left as it was.
    pub fn handle_scan(&mut self, raw: &str) -> Result<GroupSummary, ScanError> {
        let decoded = decode(raw)?;
        if decoded.price_cents == 0 {
            return Err(ScanError::ZeroPrice);
        }

        let entry = self
            .catalog
            .lookup(&decoded.product_code)
            .ok_or_else(|| ScanError::UnknownProduct(decoded.product_code.clone()))?;

        let weight = derive_weight(decoded.embedded_price(), entry.price_per_pound).map_err(
            |e| ScanError::InvalidCatalogEntry {
                code: entry.product_code.clone(),
                reason: e.to_string(),
            },
        )?;

        let group = self
            .ledger
            .append(&entry.product_code, &entry.description, weight)
            .map_err(|e| ScanError::InvalidCatalogEntry {
                code: entry.product_code.clone(),
                reason: e.to_string(),
            })?;

        debug!(
            code = %group.product_code,
            price = decoded.embedded_price(),
            weight,
            "sample recorded"
        );

        Ok(group.summary())
    }

    /// Swaps in a freshly imported catalog. Existing groups keep their descriptions.
    pub fn replace_catalog(&mut self, catalog: ReferenceCatalog) {
        info!(
            previous = self.catalog.len(),
            products = catalog.len(),
            "catalog replaced"
        );
        self.catalog = catalog;
    }

    pub fn reset(&mut self) {
        if !self.ledger.is_empty() {
            warn!(products = self.ledger.len(), "discarding collected samples");
        }
        self.ledger.clear();
    }

    pub fn catalog(&self) -> &ReferenceCatalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &SampleLedger {
        &self.ledger
    }

    pub fn summaries(&self) -> Vec<GroupSummary> {
        self.ledger.all_summaries()
    }

    pub fn export_rows(&self) -> Vec<ExportRow> {
        format_rows(&self.ledger)
    }
}
