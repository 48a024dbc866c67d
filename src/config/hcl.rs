//! Read the version constraint from `terragrunt.hcl`.
//!
//! Only the top-level `terragrunt_version_constraint` attribute is looked at;
//! every other block and attribute in the file is ignored.

use anyhow::Result;
use ::hcl::Expression;
use std::path::Path;
use tracing::debug;

use crate::constants::HCL_CONSTRAINT_ATTRIBUTE;
use crate::core::TgswitchError;

/// Extract `terragrunt_version_constraint` from HCL source text.
///
/// Returns `Ok(None)` when the attribute is not set, so the caller can move
/// on to the next configuration source.
///
/// # Errors
///
/// [`TgswitchError::ConfigParseError`] when the text is not valid HCL or the
/// attribute is not a plain string.
///
/// # Examples
///
/// ```rust
/// use tgswitch::config::hcl::parse_constraint;
///
/// let source = r#"terragrunt_version_constraint = ">= 0.35, < 0.40""#;
/// let constraint = parse_constraint(source, "terragrunt.hcl")?;
/// assert_eq!(constraint.as_deref(), Some(">= 0.35, < 0.40"));
/// # Ok::<(), tgswitch::core::TgswitchError>(())
/// ```
pub fn parse_constraint(content: &str, file: &str) -> Result<Option<String>, TgswitchError> {
    let body = ::hcl::parse(content).map_err(|e| TgswitchError::ConfigParseError {
        file: file.to_string(),
        reason: e.to_string(),
    })?;

    let Some(attribute) = body.attributes().find(|attr| attr.key() == HCL_CONSTRAINT_ATTRIBUTE)
    else {
        debug!("{file} does not set {HCL_CONSTRAINT_ATTRIBUTE}");
        return Ok(None);
    };

    match attribute.expr() {
        Expression::String(value) => Ok(Some(value.trim().to_string())),
        other => Err(TgswitchError::ConfigParseError {
            file: file.to_string(),
            reason: format!("{HCL_CONSTRAINT_ATTRIBUTE} must be a string, found {other:?}"),
        }),
    }
}

/// Read `terragrunt_version_constraint` from an HCL file on disk.
///
/// # Errors
///
/// [`TgswitchError::ConfigParseError`] when the file cannot be read or parsed.
pub fn read_constraint(path: &Path) -> Result<Option<String>> {
    let file = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| TgswitchError::ConfigParseError {
        file: file.clone(),
        reason: e.to_string(),
    })?;

    Ok(parse_constraint(&content, &file)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_constraint() {
        let source = r#"
include {
  path = find_in_parent_folders()
}

terragrunt_version_constraint = ">= 0.35, < 0.40"

inputs = {
  region = "us-east-1"
}
"#;
        assert_eq!(parse_constraint(source, "terragrunt.hcl").unwrap().as_deref(), Some(">= 0.35, < 0.40"));
    }

    #[test]
    fn test_missing_attribute_is_absent() {
        let source = "inputs = {\n  region = \"us-east-1\"\n}\n";
        assert_eq!(parse_constraint(source, "terragrunt.hcl").unwrap(), None);
    }

    #[test]
    fn test_empty_file_is_absent() {
        assert_eq!(parse_constraint("", "terragrunt.hcl").unwrap(), None);
    }

    #[test]
    fn test_malformed_hcl_is_parse_error() {
        let result = parse_constraint("terragrunt_version_constraint = \"unterminated", "terragrunt.hcl");
        assert!(matches!(result, Err(TgswitchError::ConfigParseError { .. })));
    }

    #[test]
    fn test_non_string_attribute_is_parse_error() {
        let result = parse_constraint("terragrunt_version_constraint = 12", "terragrunt.hcl");
        assert!(matches!(result, Err(TgswitchError::ConfigParseError { .. })));
    }

    #[test]
    fn test_read_from_disk() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("terragrunt.hcl");
        std::fs::write(&path, "terragrunt_version_constraint = \"~> 0.38.0\"\n").unwrap();
        assert_eq!(read_constraint(&path).unwrap().as_deref(), Some("~> 0.38.0"));
    }
}
