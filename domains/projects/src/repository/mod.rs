//! Collaborator interface for project storage
//!
//! Persistence is external. Workflows load a project, mutate it, `save` it and
//! only then dispatch notifications about it.

pub mod memory;

use uuid::Uuid;

use reelflow_common::RepositoryError;

use crate::domain::entities::Project;

#[async_trait::async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Project>, RepositoryError>;

    /// Insert or replace
    async fn save(&self, project: &Project) -> Result<(), RepositoryError>;

    /// Returns whether a project was removed
    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError>;

    /// Editor currently assigned to a project
    async fn find_assigned_editor(&self, id: Uuid) -> Result<Option<Uuid>, RepositoryError> {
        Ok(self.get(id).await?.and_then(|p| p.editor_id))
    }
}
