use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiSettings,
    pub storage: StorageSettings,
    pub log: LogSettings,
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub page_size: u32,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:5000/api".to_string(),
            token: None,
            page_size: newsdesk_core::DEFAULT_PAGE_SIZE,
            timeout_secs: 30,
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            path: "newsdesk.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Front-end defaults shared with the web client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    pub default_route: String,
    pub default_timezone: String,
    pub short_date_format: String,
    pub archived_date_format: String,
    pub search: SearchFields,
    pub preview_formats: Vec<PreviewFormat>,
    pub list: ListSettings,
    pub workspace: WorkspacePanes,
    pub editor: EditorSettings,
    pub features: FeatureFlags,
    pub view: ViewFormats,
    /// locale -> (source text -> replacement). A configured table replaces
    /// the shipped ones as a whole.
    pub lang_override: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            default_route: "/workspace".to_string(),
            default_timezone: "Australia/Sydney".to_string(),
            short_date_format: "DD/MM".to_string(),
            archived_date_format: "D/MM/YYYY".to_string(),
            search: SearchFields::default(),
            preview_formats: vec![PreviewFormat {
                name: "AAPIpNewsFormatter".to_string(),
                output_type: "json".to_string(),
                output_field: "article_text".to_string(),
            }],
            list: ListSettings::default(),
            workspace: WorkspacePanes::default(),
            editor: EditorSettings::default(),
            features: FeatureFlags::default(),
            view: ViewFormats::default(),
            lang_override: default_lang_override(),
        }
    }
}

impl UiSettings {
    /// Apply the locale's override table to `text`, if it has an entry.
    pub fn translate<'a>(&'a self, locale: &str, text: &'a str) -> &'a str {
        self.lang_override
            .get(locale)
            .and_then(|table| table.get(text))
            .map(String::as_str)
            .unwrap_or(text)
    }
}

const EN_LOCALES: [&str; 4] = ["en", "en_GB", "en_US", "en_AU"];

const EN_OVERRIDES: [(&str, &str); 14] = [
    ("Advanced Search", "Advanced"),
    ("URGENCY", "NEWS VALUE"),
    ("Urgency", "News Value"),
    ("urgency", "news value"),
    ("Urgency stats", "News Value stats"),
    ("SERVICE", "CATEGORY"),
    ("SERVICES", "CATEGORIES"),
    ("Services", "Categories"),
    ("Service", "Category"),
    ("Mar", "March"),
    ("Apr", "April"),
    ("Jun", "June"),
    ("Jul", "July"),
    ("Sep", "Sept"),
];

fn default_lang_override() -> BTreeMap<String, BTreeMap<String, String>> {
    let table: BTreeMap<String, String> = EN_OVERRIDES
        .iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();
    EN_LOCALES
        .iter()
        .map(|locale| (locale.to_string(), table.clone()))
        .collect()
}

/// Fields the search panel offers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFields {
    pub slugline: bool,
    pub headline: bool,
    pub unique_name: bool,
    pub story_text: bool,
    pub byline: bool,
    pub keywords: bool,
    pub creator: bool,
    pub from_desk: bool,
    pub to_desk: bool,
    pub spike: bool,
    pub scheduled: bool,
    pub company_codes: bool,
    pub use_default_timezone: bool,
    pub ingest_provider: bool,
    pub raw_search: bool,
    pub featuremedia: bool,
}

impl Default for SearchFields {
    fn default() -> Self {
        Self {
            slugline: true,
            headline: true,
            unique_name: true,
            story_text: true,
            byline: true,
            keywords: true,
            creator: true,
            from_desk: true,
            to_desk: true,
            spike: true,
            scheduled: true,
            company_codes: true,
            use_default_timezone: true,
            ingest_provider: true,
            raw_search: true,
            featuremedia: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewFormat {
    pub name: String,
    pub output_type: String,
    pub output_field: String,
}

/// Columns shown in item lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListSettings {
    pub thin_rows: bool,
    pub priority: Vec<String>,
    pub first_line: Vec<String>,
    pub narrow_view: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            thin_rows: true,
            priority: strings(&["urgency", "priority"]),
            first_line: strings(&[
                "slugline",
                "highlights",
                "associations",
                "takekey",
                "state",
                "update",
                "takepackage",
                "embargo",
                "flags",
                "updated",
                "headline",
                "markedDesks",
                "wordcount",
                "provider",
                "versioncreator",
                "versioncreated",
            ]),
            narrow_view: strings(&["slugline", "takekey", "state", "provider", "versioncreated"]),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspacePanes {
    pub ingest: bool,
    pub content: bool,
    pub tasks: bool,
}

impl Default for WorkspacePanes {
    fn default() -> Self {
        Self {
            ingest: true,
            content: true,
            tasks: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub toolbar: bool,
    pub embeds: bool,
    pub paste_plain_text: bool,
    pub clean_pasted_html: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            toolbar: false,
            embeds: false,
            paste_plain_text: true,
            clean_pasted_html: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    pub elastic_highlight: bool,
    pub swimlane_columns_limit: Option<u32>,
    pub edit_featured_image: bool,
    pub confirm_media_on_update: bool,
    pub hide_live_suggestions: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            elastic_highlight: true,
            swimlane_columns_limit: Some(4),
            edit_featured_image: true,
            confirm_media_on_update: true,
            hide_live_suggestions: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewFormats {
    pub time_format: String,
    pub date_format: String,
}

impl Default for ViewFormats {
    fn default() -> Self {
        Self {
            time_format: "HH:mm".to_string(),
            date_format: "DD/MM/YYYY".to_string(),
        }
    }
}

impl Config {
    /// Load from `path`, falling back to defaults when the file does not
    /// exist, then apply `NEWSDESK_API_URL` / `NEWSDESK_API_TOKEN`.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = match std::fs::read_to_string(path) {
            Ok(raw) => {
                Self::from_toml(&raw).with_context(|| format!("Invalid config file {:?}", path))?
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read config from {:?}", path))
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("NEWSDESK_API_URL").filter(|v| !v.is_empty()) {
            self.api.url = url;
        }
        if let Some(token) = lookup("NEWSDESK_API_TOKEN").filter(|v| !v.is_empty()) {
            self.api.token = Some(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.api.page_size, 500);
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.ui.default_route, "/workspace");
        assert_eq!(config.ui.features.swimlane_columns_limit, Some(4));
        assert!(!config.ui.workspace.tasks);
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let config = Config::from_toml(
            r#"
            [api]
            url = "https://cms.example.com/api"
            page_size = 50

            [storage]
            backend = "memory"

            [ui.lang_override.en_AU]
            Urgency = "News Value"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.url, "https://cms.example.com/api");
        assert_eq!(config.api.page_size, 50);
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.path, "newsdesk.db");
        assert_eq!(config.ui.translate("en_AU", "Urgency"), "News Value");
        assert_eq!(config.ui.translate("en_AU", "Desks"), "Desks");
        assert_eq!(config.ui.translate("fr", "Urgency"), "Urgency");
    }

    #[test]
    fn rejects_unknown_backend() {
        assert!(Config::from_toml("[storage]\nbackend = \"redis\"").is_err());
    }

    #[test]
    fn env_overrides_api_settings() {
        let mut config = Config::default();
        config.apply_env(|key| match key {
            "NEWSDESK_API_URL" => Some("http://cms:8080/api".to_string()),
            "NEWSDESK_API_TOKEN" => Some("t0ken".to_string()),
            _ => None,
        });
        assert_eq!(config.api.url, "http://cms:8080/api");
        assert_eq!(config.api.token.as_deref(), Some("t0ken"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn unreadable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path()).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read config"));
    }

    #[test]
    fn reads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("newsdesk.toml");
        std::fs::write(&path, "[log]\nlevel = \"debug\"\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.storage.path, "newsdesk.db");
    }

    #[test]
    fn default_config_ships_locale_overrides() {
        let ui = Config::from_toml("").unwrap().ui;
        for locale in ["en", "en_GB", "en_US", "en_AU"] {
            assert_eq!(ui.translate(locale, "Urgency"), "News Value");
            assert_eq!(ui.translate(locale, "Services"), "Categories");
        }
        assert_eq!(ui.translate("de", "Urgency"), "Urgency");
        assert!(ui.search.raw_search && ui.search.use_default_timezone);
        assert_eq!(ui.preview_formats[0].output_field, "article_text");
        assert_eq!(ui.list.priority, vec!["urgency", "priority"]);
        assert_eq!(ui.list.narrow_view.len(), 5);
        assert!(ui.list.thin_rows);
    }

    #[test]
    fn renders_back_to_toml() {
        let rendered = Config::default().to_toml().unwrap();
        let parsed = Config::from_toml(&rendered).unwrap();
        assert_eq!(parsed.ui.view.date_format, "DD/MM/YYYY");
        assert_eq!(parsed.ui.translate("en_GB", "Sep"), "Sept");
        assert_eq!(parsed.ui.preview_formats, Config::default().ui.preview_formats);
        assert_eq!(parsed.ui.list.first_line.len(), 16);
    }
}
