pub mod classify;
pub mod definitions;
pub mod name_resolver;
pub mod operations;
pub mod version;

pub use classify::{CategoryTable, Classification, classify};
pub use definitions::{DefinitionHandle, DefinitionIndex};
pub use operations::{FriendlyOperationNames, OperationStore, missing_friendly_names, visit_operations};
pub use version::{KubeVersionOrder, LexicalOrder, VersionOrder, VersionOrdering};
