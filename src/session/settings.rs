use crate::engine::is_valid_name;
use derive_builder::Builder;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Error type returned by settings validation
pub enum SettingsError {
    /// An error attributable to one of the fields
    #[error("Bad value for field `{0}`")]
    BadFieldValue(&'static str),
}

/// Session settings.
///
/// Build with [`SessionSettingsBuilder`], which validates the fields, or
/// start from `SessionSettings::default()`.
///
/// ```
/// use engine_bridge::session::SessionSettingsBuilder;
///
/// let settings = SessionSettingsBuilder::default()
///     .solve_prefix("MY")
///     .verbose(false)
///     .build()
///     .unwrap();
/// assert_eq!(settings.output_capacity, 4096 * 4096);
/// ```
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionSettings {
    /// scratch prefix of the linear solve.  Operands are `<prefix>_A`,
    /// `<prefix>_b` and `<prefix>_x`
    #[builder(default = r#""LS".to_string()"#, setter(into))]
    pub solve_prefix: String,

    /// prefix of the auxiliary variable used for triplet extraction
    #[builder(default = r#""temp_".to_string()"#, setter(into))]
    pub scratch_prefix: String,

    /// capture buffer size in bytes for the string returning script variants
    #[builder(default = "4096 * 4096")]
    pub output_capacity: usize,

    /// capture buffer size in bytes for dimension queries
    #[builder(default = "128")]
    pub size_query_capacity: usize,

    /// echo prompt stripped from captured output
    #[builder(default = r#"">> ".to_string()"#, setter(into))]
    pub prompt: String,

    /// the only accepted script file extension, compared case-insensitively
    #[builder(default = r#"".m".to_string()"#, setter(into))]
    pub script_extension: String,

    /// issue `clear functions;` before running a named script
    #[builder(default = "true")]
    pub clear_function_cache: bool,

    /// write diagnostics to the session print target
    #[builder(default = "true")]
    pub verbose: bool,
}

impl Default for SessionSettings {
    fn default() -> SessionSettings {
        SessionSettings {
            solve_prefix: "LS".to_string(),
            scratch_prefix: "temp_".to_string(),
            output_capacity: 4096 * 4096,
            size_query_capacity: 128,
            prompt: ">> ".to_string(),
            script_extension: ".m".to_string(),
            clear_function_cache: true,
            verbose: true,
        }
    }
}

impl SessionSettings {
    /// Check every field, e.g. after deserialization.
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_solve_prefix(&self.solve_prefix)?;
        validate_scratch_prefix(&self.scratch_prefix)?;
        validate_script_extension(&self.script_extension)?;
        validate_capacity(self.output_capacity, "output_capacity")?;
        validate_capacity(self.size_query_capacity, "size_query_capacity")?;
        Ok(())
    }
}

impl From<SettingsError> for SessionSettingsBuilderError {
    fn from(e: SettingsError) -> Self {
        SessionSettingsBuilderError::ValidationError(e.to_string())
    }
}

/// Automatic pre-build settings validation
impl SessionSettingsBuilder {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(ref prefix) = self.solve_prefix {
            validate_solve_prefix(prefix)?;
        }
        if let Some(ref prefix) = self.scratch_prefix {
            validate_scratch_prefix(prefix)?;
        }
        if let Some(ref ext) = self.script_extension {
            validate_script_extension(ext)?;
        }
        if let Some(capacity) = self.output_capacity {
            validate_capacity(capacity, "output_capacity")?;
        }
        if let Some(capacity) = self.size_query_capacity {
            validate_capacity(capacity, "size_query_capacity")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------
// individual validation functions go here
// ---------------------------------------------------------

// `<prefix>_A` must itself be a valid identifier
fn validate_solve_prefix(prefix: &str) -> Result<(), SettingsError> {
    if prefix.is_empty() || !is_valid_name(&format!("{}_A", prefix)) {
        return Err(SettingsError::BadFieldValue("solve_prefix"));
    }
    Ok(())
}

fn validate_scratch_prefix(prefix: &str) -> Result<(), SettingsError> {
    if prefix.is_empty() || !is_valid_name(&format!("{}X", prefix)) {
        return Err(SettingsError::BadFieldValue("scratch_prefix"));
    }
    Ok(())
}

fn validate_script_extension(ext: &str) -> Result<(), SettingsError> {
    if ext.len() < 2 || !ext.starts_with('.') {
        return Err(SettingsError::BadFieldValue("script_extension"));
    }
    Ok(())
}

fn validate_capacity(capacity: usize, field: &'static str) -> Result<(), SettingsError> {
    if capacity == 0 {
        return Err(SettingsError::BadFieldValue(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_builder() {
        let built = SessionSettingsBuilder::default().build().unwrap();
        assert_eq!(built, SessionSettings::default());
        assert!(built.validate().is_ok());
        assert_eq!(built.solve_prefix, "LS");
        assert_eq!(built.prompt, ">> ");
    }

    #[test]
    fn test_builder_validation() {
        assert!(SessionSettingsBuilder::default()
            .solve_prefix("")
            .build()
            .is_err());
        assert!(SessionSettingsBuilder::default()
            .solve_prefix("1LS")
            .build()
            .is_err());
        assert!(SessionSettingsBuilder::default()
            .script_extension("m")
            .build()
            .is_err());
        assert!(SessionSettingsBuilder::default()
            .output_capacity(0)
            .build()
            .is_err());
        assert!(SessionSettingsBuilder::default()
            .scratch_prefix("tmp_")
            .script_extension(".M")
            .build()
            .is_ok());
    }

    #[test]
    fn test_validate_after_mutation() {
        let mut settings = SessionSettings::default();
        settings.size_query_capacity = 0;
        assert_eq!(
            settings.validate(),
            Err(SettingsError::BadFieldValue("size_query_capacity"))
        );
    }
}
