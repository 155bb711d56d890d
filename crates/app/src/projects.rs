//! Project workflow
//!
//! Every mutation follows the same order: load, authorize, change, save, then
//! dispatch what the policy decided. Dispatch never fails the call; by the time
//! it runs the write is already committed.

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use reelflow_common::{Error, Result, Role};
use reelflow_notifications::{DispatchPlan, NotificationDispatcher};
use reelflow_projects::{
    AdminProjectUpdate, OutputLink, PriceCalculator, Project, ProjectDraft, ProjectRepository,
    ProjectStatus, StatusTransitionPolicy, TransitionContext,
};

use crate::actor::Actor;

#[derive(Clone)]
pub struct ProjectService {
    repo: Arc<dyn ProjectRepository>,
    dispatcher: NotificationDispatcher,
    policy: StatusTransitionPolicy,
    calculator: PriceCalculator,
    detached: bool,
}

impl ProjectService {
    pub fn new(
        repo: Arc<dyn ProjectRepository>,
        dispatcher: NotificationDispatcher,
        detached: bool,
    ) -> Self {
        Self {
            repo,
            dispatcher,
            policy: StatusTransitionPolicy::new(),
            calculator: PriceCalculator::editor(),
            detached,
        }
    }

    pub async fn get(&self, actor: Actor, id: Uuid) -> Result<Project> {
        let project = self.load(id).await?;
        actor.require_access(&project)?;
        Ok(project)
    }

    /// Place an order
    ///
    /// Clients order for themselves; admins must name the client.
    pub async fn create(
        &self,
        actor: Actor,
        draft: ProjectDraft,
        client_id: Option<Uuid>,
    ) -> Result<Project> {
        let client_id = match actor.role {
            Role::Client => actor.id,
            Role::Admin => client_id
                .ok_or_else(|| Error::Validation("client_id is required".to_string()))?,
            Role::Editor => {
                return Err(Error::Authorization(
                    "Access denied: editors cannot create projects".to_string(),
                ))
            }
        };

        let project = Project::new(client_id, draft, &self.calculator)?;
        self.repo.save(&project).await?;

        tracing::info!(
            project_id = %project.id,
            client_id = %client_id,
            editor_price = %project.editor_price,
            actor = %actor.role,
            "Project created"
        );

        let plan = self.policy.on_created(&TransitionContext::from(&project), actor.role);
        self.dispatch(plan).await;
        Ok(project)
    }

    /// Replace the editable fields and reprice
    ///
    /// Owning clients and admins only. Status and editor are untouched, so
    /// nothing is announced.
    pub async fn update(&self, actor: Actor, id: Uuid, draft: ProjectDraft) -> Result<Project> {
        actor.require_client_or_admin()?;
        let mut project = self.load(id).await?;
        actor.require_access(&project)?;

        project.apply_update(draft, &self.calculator)?;
        self.repo.save(&project).await?;

        tracing::info!(
            project_id = %project.id,
            editor_price = %project.editor_price,
            actor = %actor.role,
            "Project updated"
        );
        Ok(project)
    }

    /// Fields, status and editor in one call, announced as one change
    pub async fn admin_update(
        &self,
        actor: Actor,
        id: Uuid,
        update: AdminProjectUpdate,
    ) -> Result<Project> {
        actor.require_admin()?;
        let mut project = self.load(id).await?;
        let before = project.clone();

        project.apply_admin_update(update, &self.calculator)?;
        self.repo.save(&project).await?;

        tracing::info!(
            project_id = %project.id,
            editor_price = %project.editor_price,
            from = %before.status,
            to = %project.status,
            editor_id = ?project.editor_id,
            "Project updated by admin"
        );

        let plan = self.policy.evaluate_update(&before, &project, actor.role);
        self.dispatch(plan).await;
        Ok(project)
    }

    /// Status-only change; prices are not recomputed
    pub async fn update_status(&self, actor: Actor, id: Uuid, status: &str) -> Result<Project> {
        let new_status: ProjectStatus = status.parse()?;
        let mut project = self.load(id).await?;
        actor.require_access(&project)?;

        let old_status = project.status;
        project.set_status(new_status);
        self.repo.save(&project).await?;

        tracing::info!(
            project_id = %project.id,
            from = %old_status,
            to = %new_status,
            actor = %actor.role,
            "Project status updated"
        );

        let plan = self.policy.evaluate(
            &TransitionContext::from(&project),
            old_status,
            new_status,
            actor.role,
        );
        self.dispatch(plan).await;
        Ok(project)
    }

    pub async fn assign_editor(
        &self,
        actor: Actor,
        id: Uuid,
        editor_id: Option<Uuid>,
    ) -> Result<Project> {
        actor.require_admin()?;
        let mut project = self.load(id).await?;

        let previous = project.assign_editor(editor_id);
        self.repo.save(&project).await?;

        tracing::info!(
            project_id = %project.id,
            previous = ?previous,
            editor_id = ?editor_id,
            "Project editor assigned"
        );

        let plan = self.policy.on_assignment(
            &TransitionContext::from(&project),
            previous,
            actor.role,
        );
        self.dispatch(plan).await;
        Ok(project)
    }

    pub async fn set_output_links(
        &self,
        actor: Actor,
        id: Uuid,
        links: Vec<OutputLink>,
    ) -> Result<Project> {
        let mut project = self.load(id).await?;
        actor.require_staff_access(&project)?;

        project.set_output_links(links);
        self.repo.save(&project).await?;
        Ok(project)
    }

    /// Admin adjustment of the client-facing price
    pub async fn update_price(
        &self,
        actor: Actor,
        id: Uuid,
        total_price: Decimal,
    ) -> Result<Project> {
        actor.require_admin()?;
        let mut project = self.load(id).await?;

        project.set_total_price(total_price)?;
        self.repo.save(&project).await?;

        tracing::info!(project_id = %project.id, total_price = %total_price, "Project price updated");
        Ok(project)
    }

    /// Announce a comment; storing the comment itself is the caller's concern
    pub async fn comment(&self, actor: Actor, id: Uuid, body: &str) -> Result<()> {
        if body.trim().is_empty() {
            return Err(Error::Validation("Comment must not be empty".to_string()));
        }
        let project = self.load(id).await?;
        actor.require_access(&project)?;

        let plan = self
            .policy
            .on_comment(&TransitionContext::from(&project), actor.role);
        self.dispatch(plan).await;
        Ok(())
    }

    pub async fn destroy(&self, actor: Actor, id: Uuid) -> Result<()> {
        actor.require_admin()?;
        if !self.repo.delete(id).await? {
            return Err(Error::NotFound(format!("Project {} not found", id)));
        }
        tracing::info!(project_id = %id, "Project deleted");
        Ok(())
    }

    async fn load(&self, id: Uuid) -> Result<Project> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Project {} not found", id)))
    }

    async fn dispatch(&self, plan: DispatchPlan) {
        if plan.is_empty() {
            return;
        }
        if self.detached {
            // Fire and forget
            drop(self.dispatcher.spawn(plan));
        } else {
            self.dispatcher.dispatch(plan).await;
        }
    }
}
