use crate::domain::model::{InvalidNamePolicy, LoadOutcome, ProjectId, Rule, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Relational store holding `domains` (input) and `rules` (output).
///
/// Rules passed to `stage_rules` stay invisible to other connections until
/// `commit`; `rollback` discards them.
pub trait DomainStore: Send + Sync {
    fn project_ids(&self) -> impl std::future::Future<Output = Result<Vec<ProjectId>>> + Send;
    fn domain_names(
        &self,
        project_id: ProjectId,
    ) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
    fn stage_rules(&self, rules: &[Rule]) -> impl std::future::Future<Output = Result<usize>> + Send;
    fn commit(&self) -> impl std::future::Future<Output = Result<()>> + Send;
    fn rollback(&self) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn database_path(&self) -> &str;
    fn too_many(&self) -> usize;
    fn commit(&self) -> bool;
    fn invalid_name_policy(&self) -> InvalidNamePolicy;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn projects(&self) -> Result<Vec<ProjectId>>;
    async fn extract(&self, project_id: ProjectId) -> Result<Vec<String>>;
    async fn transform(&self, project_id: ProjectId, names: Vec<String>) -> Result<TransformResult>;
    async fn load(&self, rules: Vec<Rule>) -> Result<LoadOutcome>;
}
