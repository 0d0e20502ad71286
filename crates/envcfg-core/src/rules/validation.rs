use crate::errors::{RecordError, Result};
use crate::model::{ConfigMap, NewRecord};

/// Reject an empty or whitespace-only project name
///
/// # Errors
/// * `EmptyProject` - if the name has no visible characters
pub fn validate_project(project: &str) -> Result<()> {
    if project.trim().is_empty() {
        return Err(RecordError::EmptyProject);
    }
    Ok(())
}

/// Parse configuration text entered by an operator
///
/// Blank text and the JSON literal `null` both mean "no configuration".
///
/// # Errors
/// Any shape other than a flat object of strings is rejected, see
/// [`ConfigMap::parse_json`].
pub fn parse_config_input(text: &str) -> Result<Option<ConfigMap>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    ConfigMap::parse_nullable_json(trimmed)
}

/// Trim a URL; blank input becomes absent
pub fn normalize_url(url: Option<&str>) -> Option<String> {
    url.map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string)
}

impl NewRecord {
    /// Build a payload from raw operator input
    ///
    /// Trims the project name, normalizes the URL and parses the config
    /// text. Nothing here touches the store.
    ///
    /// # Errors
    /// * `EmptyProject` - blank project name
    /// * `InvalidConfigJson` / `ConfigNotObject` / `NonStringValue` - bad config text
    pub fn from_input(project: &str, url: Option<&str>, config: Option<&str>) -> Result<Self> {
        validate_project(project)?;
        let config = match config {
            Some(text) => parse_config_input(text)?,
            None => None,
        };
        Ok(Self {
            project: project.trim().to_string(),
            url: normalize_url(url),
            config,
        })
    }

    /// Check the invariants a persisted record must hold
    ///
    /// # Errors
    /// * `EmptyProject` - blank project name
    pub fn validate(&self) -> Result<()> {
        validate_project(&self.project)
    }
}
