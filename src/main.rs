use clap::Parser;
use domain_sieve::core::ConfigProvider;
use domain_sieve::utils::error::{ErrorSeverity, EtlError};
use domain_sieve::utils::{logger, validation::Validate};
use domain_sieve::{CliConfig, EtlEngine, RulePipeline, RunReport, SqliteStore, TomlConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = CliConfig::parse();

    // 初始化日誌
    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting domain-sieve");
    if args.verbose {
        tracing::debug!("CLI config: {:?}", args);
    }

    let result = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            match TomlConfig::from_file(path) {
                Ok(mut config) => {
                    args.apply_overrides(&mut config);
                    let job_name = config.job_name().to_string();
                    run_job(config, &job_name, args.json).await
                }
                Err(e) => Err(e),
            }
        }
        None => run_job(args.clone(), "domain-sieve", args.json).await,
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ Rule generation failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run_job<C>(config: C, job_name: &str, json: bool) -> Result<(), EtlError>
where
    C: ConfigProvider + Validate,
{
    // 驗證配置
    config.validate()?;
    tracing::info!("✅ Configuration validated");

    if !json {
        display_config_summary(&config, job_name);
    }

    let store = SqliteStore::open(config.database_path())?;
    let engine = EtlEngine::new(RulePipeline::new(store, config));

    let report = engine.run().await?;
    tracing::info!(
        "✅ Processed {} projects in {} ms",
        report.projects,
        (report.finished_at - report.started_at).num_milliseconds()
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        display_report(&report);
    }
    Ok(())
}

fn display_config_summary<C: ConfigProvider>(config: &C, job_name: &str) {
    println!("📋 Configuration Summary:");
    println!("  Job: {}", job_name);
    println!("  Database: {}", config.database_path());
    println!("  Threshold (too many): {}", config.too_many());
    println!("  Invalid names: {}", config.invalid_name_policy());
    if config.commit() {
        println!("  💾 COMMIT ENABLED");
    } else {
        println!("  🔍 DRY RUN (rules are rolled back; pass --commit to persist)");
    }
    println!();
}

fn display_report(report: &RunReport) {
    println!("📊 Run Summary:");
    println!("  Projects: {}", report.projects);
    println!("  Rules staged: {}", report.rules_staged);
    println!("  Garbage postfixes: {}", report.garbage_postfixes);
    println!("  Exceptions: {}", report.exceptions);
    if !report.skipped_names.is_empty() {
        println!("  Skipped names: {}", report.skipped_names.join(", "));
    }
    if report.committed {
        println!("✅ Rules committed");
    } else {
        println!("🔍 Dry run complete, nothing persisted");
    }
}
