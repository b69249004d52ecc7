//! Partner configuration records.

use serde::{Deserialize, Serialize};

use crate::error::{BackofficeError, Result};

/// Maximum length of a partner name, in characters.
pub const MAX_NAME_LENGTH: usize = 23;

/// A stored partner configuration.
///
/// # Example
///
/// ```
/// use backoffice_core::PartnerConfig;
///
/// let partner = PartnerConfig::new(1, "acme", "Acme integration");
/// assert_eq!(partner.to_string(), "acme");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerConfig {
    pub id: u64,
    pub name: String,
    pub description: String,
}

impl PartnerConfig {
    pub fn new(id: u64, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
        }
    }

    /// Applies a partial update, validating only the fields present.
    pub fn apply(&mut self, patch: PartnerConfigPatch) -> Result<()> {
        let patch = patch.validated()?;
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        Ok(())
    }
}

impl std::fmt::Display for PartnerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Payload for creating or fully replacing a partner configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPartnerConfig {
    pub name: String,
    pub description: String,
}

impl NewPartnerConfig {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Trims both fields and checks them against the model constraints.
    pub fn validated(self) -> Result<Self> {
        Ok(Self {
            name: validate_name(&self.name)?,
            description: validate_description(&self.description)?,
        })
    }
}

/// Payload for a partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerConfigPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl PartnerConfigPatch {
    pub fn validated(self) -> Result<Self> {
        Ok(Self {
            name: self.name.as_deref().map(validate_name).transpose()?,
            description: self
                .description
                .as_deref()
                .map(validate_description)
                .transpose()?,
        })
    }
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(BackofficeError::validation("name", "may not be blank"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(BackofficeError::validation(
            "name",
            format!("must have at most {} characters", MAX_NAME_LENGTH),
        ));
    }
    Ok(name.to_string())
}

fn validate_description(description: &str) -> Result<String> {
    let description = description.trim();
    if description.is_empty() {
        return Err(BackofficeError::validation("description", "may not be blank"));
    }
    Ok(description.to_string())
}
