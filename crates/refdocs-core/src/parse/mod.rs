pub mod operation;
pub mod parameter;
pub mod response;
pub mod schema;
pub mod spec;

use std::path::Path;

use crate::error::ParseError;
use spec::SwaggerSpec;

/// Parse a Swagger spec from YAML.
pub fn from_yaml(input: &str) -> Result<SwaggerSpec, ParseError> {
    let spec: SwaggerSpec = serde_yaml_ng::from_str(input)?;
    validate_version(&spec)?;
    Ok(spec)
}

/// Parse a Swagger spec from JSON.
pub fn from_json(input: &str) -> Result<SwaggerSpec, ParseError> {
    let spec: SwaggerSpec = serde_json::from_str(input)?;
    validate_version(&spec)?;
    Ok(spec)
}

/// Parse by file extension: `.json` is JSON, everything else is YAML.
pub fn from_path_contents(path: &Path, input: &str) -> Result<SwaggerSpec, ParseError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => from_json(input),
        _ => from_yaml(input),
    }
}

fn validate_version(spec: &SwaggerSpec) -> Result<(), ParseError> {
    if !spec.swagger.starts_with("2.") {
        return Err(ParseError::UnsupportedVersion(spec.swagger.clone()));
    }
    Ok(())
}
