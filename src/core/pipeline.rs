use crate::core::classifier::classify;
use crate::core::regex_builder::assemble_regex;
use crate::core::{ConfigProvider, DomainStore, Pipeline, TransformResult};
use crate::domain::model::{LoadOutcome, ProjectId, Rule};
use crate::utils::error::Result;

/// Builds one garbage rule per project from the domains in `store`.
pub struct RulePipeline<S: DomainStore, C: ConfigProvider> {
    store: S,
    config: C,
}

impl<S: DomainStore, C: ConfigProvider> RulePipeline<S, C> {
    pub fn new(store: S, config: C) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[async_trait::async_trait]
impl<S: DomainStore, C: ConfigProvider> Pipeline for RulePipeline<S, C> {
    async fn projects(&self) -> Result<Vec<ProjectId>> {
        self.store.project_ids().await
    }

    async fn extract(&self, project_id: ProjectId) -> Result<Vec<String>> {
        let names = self.store.domain_names(project_id).await?;
        tracing::debug!("Project {}: loaded {} domain names", project_id, names.len());
        Ok(names)
    }

    async fn transform(&self, project_id: ProjectId, names: Vec<String>) -> Result<TransformResult> {
        let too_many = self.config.too_many();
        let classification = classify(&names, self.config.invalid_name_policy())?;

        let garbage_postfixes = classification
            .postfix_counts
            .iter()
            .filter(|(_, count)| *count > too_many)
            .count();
        let regexp = assemble_regex(&classification.postfix_counts, &classification.exceptions, too_many);

        tracing::debug!(
            "Project {}: {} postfixes, {} garbage, {} exceptions",
            project_id,
            classification.postfix_counts.len(),
            garbage_postfixes,
            classification.exceptions.len()
        );

        Ok(TransformResult {
            rule: Rule { project_id, regexp },
            exceptions: classification.exceptions.len(),
            garbage_postfixes,
            skipped: classification.skipped,
        })
    }

    async fn load(&self, rules: Vec<Rule>) -> Result<LoadOutcome> {
        let rules_staged = match self.store.stage_rules(&rules).await {
            Ok(staged) => staged,
            Err(e) => {
                if let Err(rollback_err) = self.store.rollback().await {
                    tracing::error!("Rollback after failed insert also failed: {}", rollback_err);
                }
                return Err(e);
            }
        };

        let committed = if self.config.commit() {
            self.store.commit().await?;
            tracing::info!("💾 Committed {} rules", rules_staged);
            true
        } else {
            self.store.rollback().await?;
            tracing::warn!(
                "🔍 Dry run: {} rules staged and rolled back (enable commit to persist)",
                rules_staged
            );
            false
        };

        Ok(LoadOutcome {
            rules_staged,
            committed,
        })
    }
}
