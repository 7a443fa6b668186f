use anyhow::Result;
use domain_sieve::core::DomainStore;
use domain_sieve::{EtlEngine, EtlError, RulePipeline, SqliteStore, TomlConfig};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn toml_config(db_path: &Path, extra: &str) -> Result<TomlConfig> {
    let normalized_path = db_path.to_str().unwrap().replace('\\', "/");
    let content = format!(
        r#"
[job]
name = "integration"

[source]
database_path = "{}"
{}
"#,
        normalized_path, extra
    );
    Ok(TomlConfig::from_toml_str(&content)?)
}

async fn seed(temp_dir: &TempDir, projects: &[(i64, Vec<String>)]) -> Result<PathBuf> {
    let db_path = temp_dir.path().join("domains.db");
    let store = SqliteStore::create(&db_path)?;
    for (project_id, names) in projects {
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        store.add_domains(*project_id, &refs).await?;
    }
    Ok(db_path)
}

fn garbage_project() -> Vec<String> {
    let mut names = vec!["a.com".to_string()];
    names.extend((0..51).map(|i| format!("r{}x.a.com", i)));
    names.extend((0..10).map(|i| format!("m{}.b.com", i)));
    names
}

#[tokio::test]
async fn test_end_to_end_commit_persists_rules() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = seed(
        &temp_dir,
        &[
            (1, garbage_project()),
            (2, vec!["x.org".to_string(), "y.org".to_string()]),
        ],
    )
    .await?;

    let config = toml_config(&db_path, "[load]\ncommit = true")?;
    let engine = EtlEngine::new(RulePipeline::new(SqliteStore::open(&db_path)?, config));
    let report = engine.run().await?;

    assert_eq!(report.projects, 2);
    assert_eq!(report.rules_staged, 2);
    assert!(report.committed);
    assert_eq!(report.exceptions, 1);
    assert_eq!(report.garbage_postfixes, 1);
    drop(engine);

    let rules = SqliteStore::open(&db_path)?.rules().await?;
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].project_id, 1);
    assert_eq!(rules[0].regexp, r"(?!^a\.com$)[a-zA-Z0-9\-]+\.a\.com");
    assert_eq!(rules[1].project_id, 2);
    assert_eq!(rules[1].regexp, "");
    Ok(())
}

#[tokio::test]
async fn test_dry_run_persists_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = seed(&temp_dir, &[(1, garbage_project())]).await?;

    let config = toml_config(&db_path, "")?;
    let engine = EtlEngine::new(RulePipeline::new(SqliteStore::open(&db_path)?, config));
    let report = engine.run().await?;

    assert_eq!(report.rules_staged, 1);
    assert!(!report.committed);
    assert!(!engine.pipeline().store().in_transaction().await);
    drop(engine);

    assert!(SqliteStore::open(&db_path)?.rules().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_invalid_name_aborts_whole_run() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = seed(
        &temp_dir,
        &[
            (1, garbage_project()),
            (2, vec!["fine.net".to_string(), "localhost".to_string()]),
        ],
    )
    .await?;

    let config = toml_config(&db_path, "[load]\ncommit = true")?;
    let engine = EtlEngine::new(RulePipeline::new(SqliteStore::open(&db_path)?, config));
    let err = engine.run().await.unwrap_err();

    assert!(matches!(err, EtlError::InvalidName { ref name } if name == "localhost"));
    drop(engine);

    // 第一個專案已處理但未提交
    assert!(SqliteStore::open(&db_path)?.rules().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_skip_policy_keeps_processing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = seed(
        &temp_dir,
        &[
            (1, garbage_project()),
            (2, vec!["fine.net".to_string(), "localhost".to_string()]),
        ],
    )
    .await?;

    let config = toml_config(
        &db_path,
        "[classify]\non_invalid_name = \"skip\"\n[load]\ncommit = true",
    )?;
    let engine = EtlEngine::new(RulePipeline::new(SqliteStore::open(&db_path)?, config));
    let report = engine.run().await?;

    assert_eq!(report.skipped_names, vec!["localhost".to_string()]);
    assert_eq!(engine.pipeline().store().rules().await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_one_rule_per_project_and_rerun_is_idempotent() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = seed(
        &temp_dir,
        &[
            (10, garbage_project()),
            (20, vec!["only.io".to_string()]),
            (30, vec!["p.q.dev".to_string(), "q.dev".to_string()]),
        ],
    )
    .await?;

    let mut runs = Vec::new();
    for _ in 0..2 {
        let config = toml_config(&db_path, "[load]\ncommit = true")?;
        let engine = EtlEngine::new(RulePipeline::new(SqliteStore::open(&db_path)?, config));
        engine.run().await?;
        runs.push(engine.pipeline().store().rules().await?);
    }

    assert_eq!(runs[0], runs[1]);
    let ids: Vec<i64> = runs[0].iter().map(|r| r.project_id).collect();
    assert_eq!(ids, vec![10, 20, 30]);
    assert_eq!(runs[0][2].regexp, r"(?!^q\.dev$)");
    Ok(())
}

#[tokio::test]
async fn test_threshold_from_config() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let names: Vec<String> = (0..4).map(|i| format!("h{}.cdn.net", i)).collect();
    let db_path = seed(&temp_dir, &[(1, names)]).await?;

    let config = toml_config(&db_path, "[classify]\ntoo_many = 3\n[load]\ncommit = true")?;
    let engine = EtlEngine::new(RulePipeline::new(SqliteStore::open(&db_path)?, config));
    let report = engine.run().await?;

    let store = engine.pipeline().store();
    assert_eq!(store.domain_names(1).await?.len(), 4);
    assert_eq!(report.garbage_postfixes, 1);
    assert_eq!(store.rules().await?[0].regexp, r"[a-zA-Z0-9\-]+\.cdn\.net");

    // 恰好等於門檻不算
    let config = toml_config(&db_path, "[classify]\ntoo_many = 4\n[load]\ncommit = true")?;
    let engine = EtlEngine::new(RulePipeline::new(SqliteStore::open(&db_path)?, config));
    engine.run().await?;
    assert_eq!(engine.pipeline().store().rules().await?[0].regexp, "");
    Ok(())
}

#[tokio::test]
async fn test_empty_database_produces_no_rules() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = seed(&temp_dir, &[]).await?;

    let config = toml_config(&db_path, "[load]\ncommit = true")?;
    let engine = EtlEngine::new(RulePipeline::new(SqliteStore::open(&db_path)?, config));
    let report = engine.run().await?;

    assert_eq!(report.projects, 0);
    assert_eq!(report.rules_staged, 0);
    assert!(engine.pipeline().store().rules().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_missing_database_is_storage_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = SqliteStore::open(temp_dir.path().join("nope.db")).err().unwrap();
    assert!(matches!(err, EtlError::StorageError(_)));
}
