use crate::error::{Result, TemplateError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = ".permtemplate";
const CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_DATABASE_FILE: &str = "permtemplate.db";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub logging: Option<LoggingSettings>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseSettings {
    /// SQLite 数据库文件路径，为空时使用配置目录下的默认文件
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct LoggingSettings {
    pub level: String,
    pub file_name: Option<String>,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseSettings {
                path: None,
                max_connections: default_max_connections(),
            },
            logging: Some(LoggingSettings {
                level: "info".to_string(),
                file_name: None,
            }),
        }
    }
}

impl AppConfig {
    /// 配置目录：~/.permtemplate
    pub fn config_dir() -> Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| TemplateError::ConfigError("Could not find home directory".to_string()))?
            .join(CONFIG_DIR_NAME))
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// 读取配置文件，不存在时写入默认配置
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .map_err(|e| TemplateError::ConfigError(format!("Failed to read config file: {}", e)))?;

            serde_json::from_str::<AppConfig>(&content).map_err(|e| {
                TemplateError::ConfigError(format!(
                    "Failed to parse AppConfig: {}. Please fix the config file or delete it to use defaults.",
                    e
                ))
            })
        } else {
            let default_config = AppConfig::default();
            default_config.save_to(config_path)?;
            tracing::info!("Created new default config file at {:?}", config_path);
            Ok(default_config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                TemplateError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| TemplateError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)
            .map_err(|e| TemplateError::ConfigError(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// SQLite 数据库路径，未配置时落在 `base_dir` 下
    pub fn database_path(&self, base_dir: &Path) -> PathBuf {
        self.database
            .path
            .clone()
            .unwrap_or_else(|| base_dir.join(DEFAULT_DATABASE_FILE))
    }
}

/// SeaORM 连接 URL，`mode=rwc` 在文件不存在时创建
pub fn database_url(path: &Path) -> String {
    format!("sqlite:{}?mode=rwc", path.display())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_creates_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("nested").join("config.json");

        let config = AppConfig::load_from(&config_path).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config_path.exists());

        // 第二次读取的是刚写入的文件
        let reloaded = AppConfig::load_from(&config_path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        std::fs::write(
            &config_path,
            r#"{"database": {"path": "/tmp/perm.db"}, "logging": null}"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&config_path).unwrap();
        assert_eq!(config.database.path, Some(PathBuf::from("/tmp/perm.db")));
        assert_eq!(config.database.max_connections, 5);
        assert!(config.logging.is_none());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, "{ not json").unwrap();

        let err = AppConfig::load_from(&config_path).unwrap_err();
        assert!(matches!(err, TemplateError::ConfigError(_)));
    }

    #[test]
    fn test_database_path_and_url() {
        let config = AppConfig::default();
        let base = PathBuf::from("/data/permtemplate");
        let path = config.database_path(&base);
        assert_eq!(path, base.join("permtemplate.db"));
        assert_eq!(
            database_url(&path),
            "sqlite:/data/permtemplate/permtemplate.db?mode=rwc"
        );
    }
}
