use crate::config::toml_config::TomlConfig;
use crate::config::DEFAULT_DATABASE_PATH;
use crate::core::regex_builder::DEFAULT_TOO_MANY;
use crate::core::ConfigProvider;
use crate::domain::model::InvalidNamePolicy;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "domain-sieve")]
#[command(about = "Generate per-project regexes matching auto-generated garbage domains")]
pub struct CliConfig {
    /// Path to a TOML configuration file; flags below override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// SQLite database holding the `domains` and `rules` tables [default: domains.db]
    #[arg(long)]
    pub database: Option<String>,

    /// Postfix count above which names are treated as garbage [default: 50]
    #[arg(long)]
    pub too_many: Option<usize>,

    /// Persist the generated rules; without it the run is a dry run
    #[arg(long)]
    pub commit: bool,

    /// How to handle domain names without a '.' [default: abort]
    #[arg(long, value_enum)]
    pub on_invalid_name: Option<InvalidNamePolicy>,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 將命令列參數覆蓋到 TOML 配置
    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(database) = &self.database {
            config.source.database_path = Some(database.clone());
            tracing::info!("🔧 Database overridden to: {}", database);
        }
        if let Some(too_many) = self.too_many {
            config.classify.too_many = Some(too_many);
            tracing::info!("🔧 Threshold overridden to: {}", too_many);
        }
        if self.commit {
            config.load.commit = Some(true);
            tracing::info!("🔧 Commit enabled from command line");
        }
        if let Some(policy) = self.on_invalid_name {
            config.classify.on_invalid_name = Some(policy);
            tracing::info!("🔧 Invalid name policy overridden to: {}", policy);
        }
    }
}

impl ConfigProvider for CliConfig {
    fn database_path(&self) -> &str {
        self.database.as_deref().unwrap_or(DEFAULT_DATABASE_PATH)
    }

    fn too_many(&self) -> usize {
        self.too_many.unwrap_or(DEFAULT_TOO_MANY)
    }

    fn commit(&self) -> bool {
        self.commit
    }

    fn invalid_name_policy(&self) -> InvalidNamePolicy {
        self.on_invalid_name.unwrap_or_default()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("--database", self.database_path())
    }
}
