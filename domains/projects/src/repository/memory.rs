//! In-memory project store

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use reelflow_common::RepositoryError;

use crate::domain::entities::Project;
use crate::domain::status::StatusFilter;
use crate::repository::ProjectRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectRepository {
    projects: Arc<Mutex<HashMap<Uuid, Project>>>,
    failing: Arc<AtomicBool>,
}

impl InMemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.projects.lock().unwrap().len()
    }

    /// A client's projects, oldest first, optionally filtered by status
    pub fn list_for_client(&self, client_id: Uuid, filter: Option<StatusFilter>) -> Vec<Project> {
        let mut projects: Vec<Project> = self
            .projects
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.client_id == client_id)
            .filter(|p| filter.map(|f| f.matches(p.status)).unwrap_or(true))
            .cloned()
            .collect();
        projects.sort_by_key(|p| p.created_at);
        projects
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable(
                "project store offline".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Project>, RepositoryError> {
        self.check()?;
        Ok(self.projects.lock().unwrap().get(&id).cloned())
    }

    async fn save(&self, project: &Project) -> Result<(), RepositoryError> {
        self.check()?;
        self.projects
            .lock()
            .unwrap()
            .insert(project.id, project.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        self.check()?;
        Ok(self.projects.lock().unwrap().remove(&id).is_some())
    }
}
