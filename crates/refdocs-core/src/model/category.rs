use serde::{Deserialize, Serialize};

/// Declared shape of one category: its name and ordered slot names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    pub slots: Vec<String>,
}

impl CategoryConfig {
    pub fn new(name: &str, slots: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            slots: slots.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// A named bucket of classified operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendlyOperationName {
    pub name: String,
    /// Indices into the `OperationStore`.
    pub operations: Vec<usize>,
}

/// A top-level grouping of slots, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationCategory {
    pub name: String,
    pub friendly_names: Vec<FriendlyOperationName>,
}

impl OperationCategory {
    /// An empty category with one slot per declared name.
    pub fn from_config(config: &CategoryConfig) -> Self {
        Self {
            name: config.name.clone(),
            friendly_names: config
                .slots
                .iter()
                .map(|s| FriendlyOperationName {
                    name: s.clone(),
                    operations: Vec::new(),
                })
                .collect(),
        }
    }

    pub fn operation_count(&self) -> usize {
        self.friendly_names.iter().map(|f| f.operations.len()).sum()
    }
}

/// The reference taxonomy: Write, Read, Status, Proxy, Misc.
pub fn default_categories() -> Vec<CategoryConfig> {
    vec![
        CategoryConfig::new(
            "Write Operations",
            &["Create", "Patch", "Replace", "Delete", "Delete Collection"],
        ),
        CategoryConfig::new(
            "Read Operations",
            &[
                "Read",
                "List",
                "List All Namespaces",
                "Watch",
                "Watch List",
                "Watch List All Namespaces",
            ],
        ),
        CategoryConfig::new(
            "Status Operations",
            &["Patch Status", "Read Status", "Replace Status"],
        ),
        CategoryConfig::new(
            "Proxy Operations",
            &[
                "Create Connect Proxy",
                "Create Connect Proxy Path",
                "Delete Connect Proxy",
                "Delete Connect Proxy Path",
                "Get Connect Proxy",
                "Get Connect Proxy Path",
                "Head Connect Proxy",
                "Head Connect Proxy Path",
                "Replace Connect Proxy",
                "Replace Connect Proxy Path",
                "Options Connect Proxy",
                "Options Connect Proxy Path",
                "Patch Connect Proxy",
                "Patch Connect Proxy Path",
            ],
        ),
        CategoryConfig::new(
            "Misc Operations",
            &[
                "Read Scale",
                "Replace Scale",
                "Patch Scale",
                "Rollback",
                "Read Log",
                "Create Eviction",
                "Create Binding",
            ],
        ),
    ]
}
