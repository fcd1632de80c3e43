use std::collections::HashMap;

use tracing::warn;

/// One row of the imported reference table.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceEntry {
    pub product_code: String,
    pub description: String,
    pub price_per_pound: f64,
}

/// Product code to entry. Immutable once built; a re-import builds a new one.
#[derive(Debug, Default, Clone)]
pub struct ReferenceCatalog {
    entries: HashMap<String, ReferenceEntry>,
}

impl ReferenceCatalog {
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = ReferenceEntry>,
    {
        let mut map = HashMap::new();
        for entry in entries {
            if let Some(previous) = map.insert(entry.product_code.clone(), entry) {
                warn!(
                    code = %previous.product_code,
                    "duplicate product code in catalog, keeping the later row"
                );
            }
        }

        Self { entries: map }
    }

    pub fn lookup(&self, product_code: &str) -> Option<&ReferenceEntry> {
        self.entries.get(product_code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(code: &str, description: &str, price_per_pound: f64) -> ReferenceEntry {
        ReferenceEntry {
            product_code: code.to_string(),
            description: description.to_string(),
            price_per_pound,
        }
    }

    #[test]
    fn lookup_exact_code() {
        let catalog = ReferenceCatalog::from_entries(vec![
            entry("0123", "Beef", 4.0),
            entry("0456", "Pork", 2.5),
        ]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.lookup("0123").unwrap().description, "Beef");
        assert_eq!(catalog.lookup("0456").unwrap().price_per_pound, 2.5);
        assert!(catalog.lookup("123").is_none());
        assert!(catalog.lookup("9999").is_none());
    }

    #[test]
    fn duplicate_code_last_write_wins() {
        let catalog = ReferenceCatalog::from_entries(vec![
            entry("0123", "Beef", 4.0),
            entry("0123", "Beef Chuck", 5.0),
        ]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.lookup("0123"), Some(&entry("0123", "Beef Chuck", 5.0)));
    }

    #[test]
    fn empty_catalog() {
        let catalog = ReferenceCatalog::default();

        assert!(catalog.is_empty());
        assert!(catalog.lookup("0123").is_none());
    }
}
