//! # Table Preferences
//!
//! Per-table column and filter choices for the document list screens,
//! behind an explicit repository the UI calls. Where they are stored
//! (browser storage, a settings endpoint) is the implementor's business.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Preferences for one list table (e.g. `"invoices"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TablePreferences {
    pub visible_columns: Vec<String>,
    pub column_order: Vec<String>,
    pub filters: BTreeMap<String, String>,
    pub page_size: u32,
}

impl Default for TablePreferences {
    fn default() -> Self {
        TablePreferences {
            visible_columns: Vec::new(),
            column_order: Vec::new(),
            filters: BTreeMap::new(),
            page_size: 20,
        }
    }
}

/// Storage for table preferences, keyed by table name.
pub trait PreferencesRepository: Send + Sync {
    /// Stored preferences, or the defaults when none were saved.
    fn load(&self, table: &str) -> TablePreferences;

    fn save(&self, table: &str, preferences: TablePreferences);

    /// Forgets the stored preferences for `table`.
    fn reset(&self, table: &str);
}

/// Process-local repository. Also the reference for other implementations.
#[derive(Debug, Default)]
pub struct InMemoryPreferences {
    tables: Mutex<HashMap<String, TablePreferences>>,
}

impl InMemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes every stored table to a JSON string.
    pub fn export_json(&self) -> serde_json::Result<String> {
        let tables = self.lock();
        let sorted: BTreeMap<&String, &TablePreferences> = tables.iter().collect();
        serde_json::to_string(&sorted)
    }

    /// Builds a repository from [`export_json`](Self::export_json) output.
    pub fn import_json(json: &str) -> serde_json::Result<Self> {
        let tables: HashMap<String, TablePreferences> = serde_json::from_str(json)?;
        Ok(InMemoryPreferences {
            tables: Mutex::new(tables),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, TablePreferences>> {
        // A panic while holding the lock cannot leave a map half-written.
        self.tables
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PreferencesRepository for InMemoryPreferences {
    fn load(&self, table: &str) -> TablePreferences {
        self.lock().get(table).cloned().unwrap_or_default()
    }

    fn save(&self, table: &str, preferences: TablePreferences) {
        debug!(table, columns = preferences.visible_columns.len(), "Saving table preferences");
        self.lock().insert(table.to_string(), preferences);
    }

    fn reset(&self, table: &str) {
        self.lock().remove(table);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice_prefs() -> TablePreferences {
        TablePreferences {
            visible_columns: vec!["number".to_string(), "customer".to_string()],
            column_order: vec!["customer".to_string(), "number".to_string()],
            filters: BTreeMap::from([("status".to_string(), "paid".to_string())]),
            page_size: 50,
        }
    }

    #[test]
    fn test_load_defaults_when_missing() {
        let repo = InMemoryPreferences::new();
        assert_eq!(repo.load("invoices"), TablePreferences::default());
    }

    #[test]
    fn test_save_load_reset() {
        let repo = InMemoryPreferences::new();
        repo.save("invoices", invoice_prefs());
        assert_eq!(repo.load("invoices"), invoice_prefs());
        assert_eq!(repo.load("vendors"), TablePreferences::default());

        repo.reset("invoices");
        assert_eq!(repo.load("invoices"), TablePreferences::default());
    }

    #[test]
    fn test_export_import() {
        let repo = InMemoryPreferences::new();
        repo.save("invoices", invoice_prefs());

        let json = repo.export_json().unwrap();
        let restored = InMemoryPreferences::import_json(&json).unwrap();
        assert_eq!(restored.load("invoices"), invoice_prefs());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let restored =
            InMemoryPreferences::import_json(r#"{"payments":{"visibleColumns":["amount"]}}"#)
                .unwrap();
        let prefs = restored.load("payments");
        assert_eq!(prefs.visible_columns, vec!["amount".to_string()]);
        assert_eq!(prefs.page_size, 20);
    }
}
