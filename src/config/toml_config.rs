use crate::config::DEFAULT_DATABASE_PATH;
use crate::core::regex_builder::DEFAULT_TOO_MANY;
use crate::core::ConfigProvider;
use crate::domain::model::InvalidNamePolicy;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub job: JobConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub classify: ClassifyConfig,
    #[serde(default)]
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    pub database_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifyConfig {
    pub too_many: Option<usize>,
    pub on_invalid_name: Option<InvalidNamePolicy>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadConfig {
    /// 預設為 false：規則寫入交易後回滾 (dry run)
    pub commit: Option<bool>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DOMAINS_DB})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("job.name", &self.job.name)?;
        validation::validate_path("source.database_path", self.database_path())?;
        Ok(())
    }

    pub fn job_name(&self) -> &str {
        &self.job.name
    }
}

impl ConfigProvider for TomlConfig {
    fn database_path(&self) -> &str {
        self.source
            .database_path
            .as_deref()
            .unwrap_or(DEFAULT_DATABASE_PATH)
    }

    fn too_many(&self) -> usize {
        self.classify.too_many.unwrap_or(DEFAULT_TOO_MANY)
    }

    fn commit(&self) -> bool {
        self.load.commit.unwrap_or(false)
    }

    fn invalid_name_policy(&self) -> InvalidNamePolicy {
        self.classify.on_invalid_name.unwrap_or_default()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
