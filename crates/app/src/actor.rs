//! The authenticated caller of a workflow

use uuid::Uuid;

use reelflow_common::{Error, Result, Role};
use reelflow_projects::Project;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    pub fn admin(id: Uuid) -> Self {
        Self::new(id, Role::Admin)
    }

    pub fn editor(id: Uuid) -> Self {
        Self::new(id, Role::Editor)
    }

    pub fn client(id: Uuid) -> Self {
        Self::new(id, Role::Client)
    }

    pub fn require_admin(&self) -> Result<()> {
        if self.role != Role::Admin {
            return Err(Error::Authorization(
                "Access denied: admin role required".to_string(),
            ));
        }
        Ok(())
    }

    /// Editors never touch a project's fields or billing
    pub fn require_client_or_admin(&self) -> Result<()> {
        if self.role == Role::Editor {
            return Err(Error::Authorization(
                "Access denied: editors may only change status and output links".to_string(),
            ));
        }
        Ok(())
    }

    /// Admins see everything, clients their own projects, editors their assignments
    pub fn require_access(&self, project: &Project) -> Result<()> {
        let allowed = match self.role {
            Role::Admin => true,
            Role::Client => project.is_owned_by(self.id),
            Role::Editor => project.is_assigned_to(self.id),
        };
        if !allowed {
            return Err(Error::Authorization(format!(
                "Access denied: project {} is not yours",
                project.id
            )));
        }
        Ok(())
    }

    /// Staff with access to the project
    pub fn require_staff_access(&self, project: &Project) -> Result<()> {
        if self.role == Role::Client {
            return Err(Error::Authorization(
                "Access denied: clients cannot perform this action".to_string(),
            ));
        }
        self.require_access(project)
    }
}
