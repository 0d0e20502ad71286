use super::ConfigMap;
use serde::{Deserialize, Serialize};

/// Store-assigned record identity
pub type RecordId = i32;

/// One environment configuration entry
///
/// `id` is assigned by the store on insert and never changes afterwards.
/// `url` and `config` distinguish "absent" from empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationRecord {
    pub id: RecordId,
    pub project: String,
    pub url: Option<String>,
    pub config: Option<ConfigMap>,
}

impl ConfigurationRecord {
    /// Indented JSON rendering of the config map, or `{}` when absent
    pub fn config_display(&self) -> String {
        match &self.config {
            Some(config) => config
                .to_pretty_json()
                .unwrap_or_else(|_| "{}".to_string()),
            None => "{}".to_string(),
        }
    }
}

/// Mutable fields of a record, as supplied to add and update
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewRecord {
    pub project: String,
    pub url: Option<String>,
    pub config: Option<ConfigMap>,
}

impl NewRecord {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            url: None,
            config: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_config(mut self, config: ConfigMap) -> Self {
        self.config = Some(config);
        self
    }

    /// Attach the store-assigned id
    pub fn into_record(self, id: RecordId) -> ConfigurationRecord {
        ConfigurationRecord {
            id,
            project: self.project,
            url: self.url,
            config: self.config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_display_absent() {
        let record = NewRecord::new("api").into_record(1);
        assert_eq!(record.config_display(), "{}");
    }

    #[test]
    fn test_config_display_pretty_and_sorted() {
        let config: ConfigMap = [("B", "2"), ("A", "1")].into_iter().collect();
        let record = NewRecord::new("api").with_config(config).into_record(1);
        assert_eq!(record.config_display(), "{\n  \"A\": \"1\",\n  \"B\": \"2\"\n}");
    }

    #[test]
    fn test_config_display_present_but_empty() {
        let record = NewRecord::new("api")
            .with_config(ConfigMap::new())
            .into_record(1);
        assert_eq!(record.config_display(), "{}");
    }

    #[test]
    fn test_into_record_keeps_fields() {
        let record = NewRecord::new("web")
            .with_url("https://example.test")
            .into_record(9);
        assert_eq!(record.id, 9);
        assert_eq!(record.project, "web");
        assert_eq!(record.url.as_deref(), Some("https://example.test"));
        assert!(record.config.is_none());
    }
}
