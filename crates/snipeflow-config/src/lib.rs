//! snipeflow の設定管理
//!
//! 接続先の Snipe-IT インスタンス、API キーの置き場所、集計対象の
//! カテゴリ、減価償却期間を [`Settings`] としてまとめます。

pub mod error;

pub use error::*;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "https://snipeit.app.eff.org/";
pub const DEFAULT_API_KEY_PATH: &str = "/secrets/api_key.txt";
pub const DEFAULT_CATEGORY_ID: u64 = 1;
pub const DEFAULT_CATEGORY_NAME: &str = "Laptop";
pub const DEFAULT_DEPRECIATION_YEARS: f64 = 4.0;

const CONFIG_CANDIDATES: [&str; 2] = ["snipeflow.local.yaml", "snipeflow.yaml"];

/// 実行時設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Snipe-IT の URL（末尾は `/`）
    pub base_url: String,

    /// Bearer トークンを格納したファイル
    pub api_key_path: PathBuf,

    /// 集計対象のハードウェアカテゴリ ID
    pub category_id: u64,

    /// 集計対象のモデルカテゴリ名
    pub category_name: String,

    /// 減価償却期間（年）
    pub depreciation_years: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_path: PathBuf::from(DEFAULT_API_KEY_PATH),
            category_id: DEFAULT_CATEGORY_ID,
            category_name: DEFAULT_CATEGORY_NAME.to_string(),
            depreciation_years: DEFAULT_DEPRECIATION_YEARS,
        }
    }
}

impl Settings {
    /// REST API のベース URL
    pub fn api_url(&self) -> String {
        format!("{}api/v1/", self.base_url)
    }

    /// YAML ファイルから読み込む（未指定の項目はデフォルト値）
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// 環境変数による上書きを適用
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("SNIPE_BASE_URL") {
            debug!(base_url = %url, "Overriding base_url from SNIPE_BASE_URL");
            self.base_url = url;
        }
        if let Ok(path) = std::env::var("SNIPE_API_KEY_PATH") {
            debug!(api_key_path = %path, "Overriding api_key_path from SNIPE_API_KEY_PATH");
            self.api_key_path = PathBuf::from(path);
        }
    }

    /// 値を検証し、base_url の末尾スラッシュを補う
    pub fn validate(mut self) -> Result<Self> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue("base_url が空です".to_string()));
        }
        if !self.base_url.ends_with('/') {
            self.base_url.push('/');
        }
        if !(self.depreciation_years > 0.0) {
            return Err(ConfigError::InvalidValue(format!(
                "depreciation_years は正の数である必要があります: {}",
                self.depreciation_years
            )));
        }
        Ok(self)
    }
}

/// snipeflow の設定ディレクトリ (~/.config/snipeflow)
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("snipeflow");
    Ok(config_dir)
}

/// 設定ファイルを探す
///
/// 以下の優先順位で検索:
/// 1. 環境変数 SNIPEFLOW_CONFIG_PATH (直接パス指定)
/// 2. カレントディレクトリ: snipeflow.local.yaml, snipeflow.yaml
/// 3. ~/.config/snipeflow/config.yaml (グローバル設定)
///
/// 見つからなければ `None`（デフォルト設定で動作する）
pub fn find_config_file() -> Result<Option<PathBuf>> {
    // 1. 環境変数で直接指定
    if let Ok(config_path) = std::env::var("SNIPEFLOW_CONFIG_PATH") {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(Some(path));
        }
    }

    // 2. カレントディレクトリで検索
    let current_dir = std::env::current_dir()?;
    for filename in &CONFIG_CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(Some(path));
        }
    }

    // 3. グローバル設定ファイル
    if let Ok(config_dir) = get_config_dir() {
        let global_config = config_dir.join("config.yaml");
        if global_config.exists() {
            return Ok(Some(global_config));
        }
    }

    Ok(None)
}

/// 設定ファイル・環境変数・デフォルト値から Settings を組み立てる
pub fn load_settings() -> Result<Settings> {
    let mut settings = match find_config_file()? {
        Some(path) => {
            info!(config = %path.display(), "Loading settings");
            Settings::from_file(&path)?
        }
        None => {
            debug!("No config file found, using defaults");
            Settings::default()
        }
    };
    settings.apply_env_overrides();
    settings.validate()
}

/// API キーを読み込む
///
/// 起動時に一度だけ呼ぶ。ファイルが無ければ致命的エラー。
pub fn load_api_key(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(ConfigError::MissingApiKey(path.to_path_buf()));
    }
    let key = std::fs::read_to_string(path)?.trim().to_string();
    if key.is_empty() {
        return Err(ConfigError::EmptyApiKey(path.to_path_buf()));
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.base_url, "https://snipeit.app.eff.org/");
        assert_eq!(settings.api_url(), "https://snipeit.app.eff.org/api/v1/");
        assert_eq!(settings.category_id, 1);
        assert_eq!(settings.depreciation_years, 4.0);
    }

    #[test]
    fn test_validate_appends_trailing_slash() {
        let settings = Settings {
            base_url: "https://assets.example.org".to_string(),
            ..Default::default()
        };
        let settings = settings.validate().unwrap();
        assert_eq!(settings.base_url, "https://assets.example.org/");
    }

    #[test]
    fn test_validate_rejects_zero_depreciation() {
        let settings = Settings {
            depreciation_years: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_from_file_partial() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("snipeflow.yaml");
        fs::write(&path, "category_id: 7\ndepreciation_years: 3.0\n").unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.category_id, 7);
        assert_eq!(settings.depreciation_years, 3.0);
        // 未指定の項目はデフォルト
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    #[serial]
    fn test_find_config_file_in_current_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        fs::write(temp_dir.path().join("snipeflow.yaml"), "category_id: 2\n").unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        let result = temp_env::with_var_unset("SNIPEFLOW_CONFIG_PATH", find_config_file);

        std::env::set_current_dir(original_dir).unwrap();

        let path = result.unwrap().unwrap();
        assert!(path.ends_with("snipeflow.yaml"));
    }

    #[test]
    #[serial]
    fn test_find_config_file_local_priority() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        fs::write(temp_dir.path().join("snipeflow.yaml"), "# shared").unwrap();
        fs::write(temp_dir.path().join("snipeflow.local.yaml"), "# local").unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        let result = temp_env::with_var_unset("SNIPEFLOW_CONFIG_PATH", find_config_file);

        std::env::set_current_dir(original_dir).unwrap();

        // snipeflow.local.yaml が優先される
        assert!(result.unwrap().unwrap().ends_with("snipeflow.local.yaml"));
    }

    #[test]
    #[serial]
    fn test_find_config_file_env_var() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("custom.yaml");
        fs::write(&config_path, "category_id: 3\n").unwrap();

        let result = temp_env::with_var(
            "SNIPEFLOW_CONFIG_PATH",
            Some(config_path.to_str().unwrap()),
            find_config_file,
        );
        assert_eq!(result.unwrap(), Some(config_path));
    }

    #[test]
    #[serial]
    fn test_load_settings_env_overrides() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("custom.yaml");
        fs::write(&config_path, "base_url: https://from-file.example/\n").unwrap();

        let settings = temp_env::with_vars(
            [
                ("SNIPEFLOW_CONFIG_PATH", Some(config_path.to_str().unwrap())),
                ("SNIPE_BASE_URL", Some("https://from-env.example")),
                ("SNIPE_API_KEY_PATH", Some("/tmp/key.txt")),
            ],
            load_settings,
        )
        .unwrap();

        assert_eq!(settings.base_url, "https://from-env.example/");
        assert_eq!(settings.api_key_path, PathBuf::from("/tmp/key.txt"));
    }

    #[test]
    fn test_load_api_key_trims_newline() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("api_key.txt");
        fs::write(&path, "secret-token\n").unwrap();

        assert_eq!(load_api_key(&path).unwrap(), "secret-token");
    }

    #[test]
    fn test_load_api_key_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nope.txt");

        match load_api_key(&path) {
            Err(ConfigError::MissingApiKey(p)) => assert_eq!(p, path),
            other => panic!("Expected MissingApiKey error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_api_key_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("api_key.txt");
        fs::write(&path, "  \n").unwrap();

        assert!(matches!(load_api_key(&path), Err(ConfigError::EmptyApiKey(_))));
    }
}
