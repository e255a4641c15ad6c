//! Assigns operations to category slots by their friendly name.

use std::collections::HashMap;

use super::operations::{FriendlyOperationNames, OperationStore};
use crate::error::ConfigError;
use crate::model::{CategoryConfig, Diagnostic, OperationCategory, default_categories};

/// A validated category taxonomy with a slot lookup.
///
/// Slot names are unique across the whole taxonomy, so a friendly name maps to
/// exactly one `(category, slot)` position.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    categories: Vec<CategoryConfig>,
    slots: HashMap<String, (usize, usize)>,
}

impl CategoryTable {
    pub fn new(categories: Vec<CategoryConfig>) -> Result<Self, ConfigError> {
        let mut slots: HashMap<String, (usize, usize)> = HashMap::new();
        for (ci, category) in categories.iter().enumerate() {
            for (si, slot) in category.slots.iter().enumerate() {
                if let Some(&(first, _)) = slots.get(slot) {
                    return Err(ConfigError::DuplicateSlot {
                        slot: slot.clone(),
                        first: categories[first].name.clone(),
                        second: category.name.clone(),
                    });
                }
                slots.insert(slot.clone(), (ci, si));
            }
        }
        Ok(Self { categories, slots })
    }

    /// Where a friendly name lands, if any slot declares it.
    pub fn position(&self, friendly_name: &str) -> Option<(usize, usize)> {
        self.slots.get(friendly_name).copied()
    }

    /// Empty categories in declaration order.
    pub fn instantiate(&self) -> Vec<OperationCategory> {
        self.categories
            .iter()
            .map(OperationCategory::from_config)
            .collect()
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        let categories = default_categories();
        let slots = categories
            .iter()
            .enumerate()
            .flat_map(|(ci, c)| {
                c.slots
                    .iter()
                    .enumerate()
                    .map(move |(si, s)| (s.clone(), (ci, si)))
            })
            .collect();
        Self { categories, slots }
    }
}

/// Populated categories plus whatever could not be placed.
#[derive(Debug, Clone)]
pub struct Classification {
    pub categories: Vec<OperationCategory>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Place every operation of `store` into its slot and record its friendly name.
///
/// Operations are visited in id order. An operation that already carries a friendly
/// name is left alone and reported, so running this twice over one store never
/// places an operation in two slots.
pub fn classify(
    store: &mut OperationStore,
    table: &CategoryTable,
    friendly_names: &FriendlyOperationNames,
) -> Classification {
    let mut categories = table.instantiate();
    let mut diagnostics = Vec::new();

    for handle in store.sorted_handles() {
        let Some(operation) = store.get_index_mut(handle) else {
            continue;
        };
        if operation.is_classified() {
            diagnostics.push(Diagnostic::AlreadyClassified {
                operation_id: operation.id.clone(),
            });
            continue;
        }
        let Some(friendly_name) = friendly_names.get(&operation.id) else {
            log::debug!("no friendly name found for {}", operation.id);
            diagnostics.push(Diagnostic::Unclassified {
                operation_id: operation.id.clone(),
            });
            continue;
        };
        match table.position(friendly_name) {
            Some((ci, si)) => {
                categories[ci].friendly_names[si].operations.push(handle);
                operation.friendly_name = friendly_name.clone();
            }
            None => {
                log::debug!("'{friendly_name}' matches no slot ({})", operation.id);
                diagnostics.push(Diagnostic::UnmatchedFriendlyName {
                    operation_id: operation.id.clone(),
                    friendly_name: friendly_name.clone(),
                });
            }
        }
    }

    Classification {
        categories,
        diagnostics,
    }
}
