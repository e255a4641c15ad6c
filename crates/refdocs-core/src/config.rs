use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{BuildError, ConfigError};
use crate::index::{CategoryTable, FriendlyOperationNames, VersionOrder};
use crate::model::{CategoryConfig, default_categories};
use crate::parse::{self, spec::SwaggerSpec};
use crate::pipeline::BuildOptions;

/// Project configuration loaded from `config.yaml` in the config directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RefdocsConfig {
    /// Spec files, relative to the config directory.
    pub specs: Vec<String>,
    /// Report unrecognized definition names instead of failing the build.
    pub allow_errors: bool,
    /// Reduce dotted operation groups (`rbac.authorization.k8s.io`) to their
    /// first segment so they match definition groups.
    pub munge_groups: bool,
    pub version_order: VersionOrder,
    pub categories: Vec<CategoryConfig>,
}

impl Default for RefdocsConfig {
    fn default() -> Self {
        Self {
            specs: vec!["swagger.json".to_string()],
            allow_errors: false,
            munge_groups: true,
            version_order: VersionOrder::Kubernetes,
            categories: default_categories(),
        }
    }
}

impl RefdocsConfig {
    /// Validate the taxonomy and turn the flags into pipeline options.
    pub fn build_options(&self) -> Result<BuildOptions, ConfigError> {
        Ok(BuildOptions {
            allow_errors: self.allow_errors,
            munge_groups: self.munge_groups,
            version_order: self.version_order,
            categories: CategoryTable::new(self.categories.clone())?,
        })
    }

    pub fn spec_paths(&self, config_dir: &Path) -> Vec<PathBuf> {
        self.specs.iter().map(|s| config_dir.join(s)).collect()
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Friendly operation name table file name.
pub const OP_NAMES_FILE_NAME: &str = "config-op-names.yaml";

/// Load `config.yaml` from a directory. Returns `None` if the file doesn't exist.
pub fn load_config(config_dir: &Path) -> Result<Option<RefdocsConfig>, ConfigError> {
    let path = config_dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }
    read_yaml(&path).map(Some)
}

/// Load the friendly-name table. It is authoritative, so a missing file is an error.
pub fn load_friendly_names(config_dir: &Path) -> Result<FriendlyOperationNames, ConfigError> {
    let path = config_dir.join(OP_NAMES_FILE_NAME);
    if !path.exists() {
        return Err(ConfigError::MissingOperationNames(path));
    }
    let content = read_file(&path)?;
    if content.trim().is_empty() {
        return Ok(FriendlyOperationNames::new());
    }
    parse_yaml(&path, &content)
}

/// Read and parse every spec file in order.
pub fn load_specs(paths: &[PathBuf]) -> Result<Vec<SwaggerSpec>, BuildError> {
    let mut specs = Vec::with_capacity(paths.len());
    for path in paths {
        let content = read_file(path)?;
        let spec = parse::from_path_contents(path, &content)?;
        log::debug!("loaded {} ({} paths)", path.display(), spec.paths.len());
        specs.push(spec);
    }
    Ok(specs)
}

fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = read_file(path)?;
    parse_yaml(path, &content)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_yaml<T: serde::de::DeserializeOwned>(path: &Path, content: &str) -> Result<T, ConfigError> {
    serde_yaml_ng::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# refdocs configuration
specs:
  - swagger.json
allow_errors: false     # report unrecognized definition names instead of failing
munge_groups: true      # rbac.authorization.k8s.io -> rbac when linking operations
version_order: kubernetes  # kubernetes | lexical

# Slot names must be unique across all categories.
categories:
  - name: Write Operations
    slots: [Create, Patch, Replace, Delete, Delete Collection]
  - name: Read Operations
    slots: [Read, List, List All Namespaces, Watch, Watch List, Watch List All Namespaces]
  - name: Status Operations
    slots: [Patch Status, Read Status, Replace Status]
  - name: Proxy Operations
    slots:
      - Create Connect Proxy
      - Create Connect Proxy Path
      - Delete Connect Proxy
      - Delete Connect Proxy Path
      - Get Connect Proxy
      - Get Connect Proxy Path
      - Head Connect Proxy
      - Head Connect Proxy Path
      - Replace Connect Proxy
      - Replace Connect Proxy Path
      - Options Connect Proxy
      - Options Connect Proxy Path
      - Patch Connect Proxy
      - Patch Connect Proxy Path
  - name: Misc Operations
    slots: [Read Scale, Replace Scale, Patch Scale, Rollback, Read Log, Create Eviction, Create Binding]
"#
}
