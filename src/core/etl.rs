use crate::core::Pipeline;
use crate::domain::model::RunReport;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Runs every project through extract and transform, then loads all rules
    /// in one batch. Any error aborts the run before the load step.
    pub async fn run(&self) -> Result<RunReport> {
        let started_at = chrono::Utc::now();
        tracing::info!("🚀 Starting rule generation");

        let project_ids = self.pipeline.projects().await?;
        tracing::info!("📋 Found {} projects", project_ids.len());

        let mut rules = Vec::with_capacity(project_ids.len());
        let mut exceptions = 0;
        let mut garbage_postfixes = 0;
        let mut skipped_names = Vec::new();

        for project_id in &project_ids {
            let names = self.pipeline.extract(*project_id).await?;
            let result = self.pipeline.transform(*project_id, names).await?;

            exceptions += result.exceptions;
            garbage_postfixes += result.garbage_postfixes;
            skipped_names.extend(result.skipped);
            rules.push(result.rule);
        }

        tracing::info!("📝 Generated {} rules, loading", rules.len());
        let outcome = self.pipeline.load(rules).await?;

        Ok(RunReport {
            projects: project_ids.len(),
            rules_staged: outcome.rules_staged,
            committed: outcome.committed,
            exceptions,
            garbage_postfixes,
            skipped_names,
            started_at,
            finished_at: chrono::Utc::now(),
        })
    }
}
