use std::{fmt, path::Path};

use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parsing(serde_yaml::Error),
    UnknownField(String, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parsing(e) => write!(f, "YAML parse error: {}", e),
            ConfigError::UnknownField(group, key) => {
                write!(f, "Unknown config field: {}.{}", group, key)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(value: serde_yaml::Error) -> Self {
        ConfigError::Parsing(value)
    }
}

/// The merged site configuration. Every group and every field carries a
/// serde default, so a partial document on disk overlays the built-in
/// defaults instead of replacing them. Saving always writes the full
/// document, which keeps the persisted key set a superset of the defaults.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub contact: ContactConfig,
    pub assets: AssetsConfig,
}

impl Config {
    /// Defaults overlaid with whatever is persisted at `path`. A missing
    /// file is not an error; a malformed one is.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if !path.as_ref().exists() {
            return Ok(Config::default());
        }
        let data = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&data)?;

        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let data = serde_yaml::to_string(self)?;
        std::fs::write(path, data)?;

        Ok(())
    }

    /// Set one scalar addressed by group and key. Unrecognized paths are
    /// rejected so the admin UI can't grow the document arbitrarily.
    pub fn edit(&mut self, group: &str, key: &str, value: &str) -> Result<(), ConfigError> {
        let slot = match (group, key) {
            ("site", "name") => &mut self.site.name,
            ("site", "author") => &mut self.site.author,
            ("site", "description") => &mut self.site.description,
            ("site", "link") => &mut self.site.link,
            ("site", "script") => &mut self.site.script,
            ("site", "form") => &mut self.site.form,
            ("site", "color") => &mut self.site.color,
            ("contact", "name") => &mut self.contact.name,
            ("contact", "handle") => &mut self.contact.handle,
            ("assets", "favicon") => &mut self.assets.favicon,
            ("assets", "cover") => &mut self.assets.cover,
            ("assets", "manifest") => &mut self.assets.manifest,
            _ => {
                return Err(ConfigError::UnknownField(
                    group.to_string(),
                    key.to_string(),
                ));
            }
        };
        *slot = value.to_string();

        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
    pub author: String,
    pub description: String,
    /// Canonical URL of the deployed site, used for feed links.
    pub link: String,
    /// Snippet injected into every page head (analytics and the like).
    pub script: String,
    /// External form-handler endpoint for the contact form.
    pub form: String,
    /// Theme accent color as an RGB hex string.
    pub color: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "My blog".to_string(),
            author: "Anonymous".to_string(),
            description: "Yet another blog".to_string(),
            link: "https://example.com".to_string(),
            script: String::new(),
            form: String::new(),
            color: "#00bebe".to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ContactConfig {
    pub name: String,
    pub handle: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            name: "Anonymous".to_string(),
            handle: "@anonymous".to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AssetsConfig {
    pub favicon: String,
    pub cover: String,
    pub manifest: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            favicon: "favicon.png".to_string(),
            cover: "cover.png".to_string(),
            manifest: "manifest.webmanifest".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = Config::load("/nonexistent/quill.yml").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_document_overlays_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quill.yml");
        std::fs::write(&path, "site:\n  name: Machine and me\n").unwrap();

        let config = Config::load(&path).unwrap();
        // Persisted value wins.
        assert_eq!(config.site.name, "Machine and me");
        // Everything missing from the document falls back to defaults.
        assert_eq!(config.site.color, "#00bebe");
        assert_eq!(config.contact, ContactConfig::default());
        assert_eq!(config.assets.manifest, "manifest.webmanifest");
    }

    #[test]
    fn test_saved_document_contains_every_default_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quill.yml");
        std::fs::write(&path, "contact:\n  handle: '@quill'\n").unwrap();

        let config = Config::load(&path).unwrap();
        config.save(&path).unwrap();

        let data = std::fs::read_to_string(&path).unwrap();
        for key in [
            "name", "author", "description", "link", "script", "form", "color", "handle",
            "favicon", "cover", "manifest",
        ] {
            assert!(data.contains(key), "saved config is missing {}", key);
        }
        assert!(data.contains("@quill"));
    }

    #[test]
    fn test_edit_known_field() {
        let mut config = Config::default();
        config.edit("site", "color", "#ff0066").unwrap();
        assert_eq!(config.site.color, "#ff0066");
    }

    #[test]
    fn test_edit_unknown_field() {
        let mut config = Config::default();
        let err = config.edit("site", "password", "hunter2").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownField(_, _)));
    }
}
