//! Status transition policy
//!
//! Pure decisions only: given what changed and who changed it, produce the
//! notifications and mail that should follow. Nothing is forbidden here; side
//! effects hang off the status that was reached. Duplicate suppression and
//! delivery are the dispatcher's job.

use uuid::Uuid;

use reelflow_common::Role;
use reelflow_notifications::{DispatchPlan, MailDirective, NotificationIntent, Recipient};

use crate::domain::entities::Project;
use crate::domain::status::ProjectStatus;

/// The project facts notifications are routed by
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionContext {
    pub project_id: Uuid,
    pub project_name: String,
    pub client_id: Uuid,
    pub editor_id: Option<Uuid>,
    pub output_links: Vec<String>,
}

impl From<&Project> for TransitionContext {
    fn from(project: &Project) -> Self {
        Self {
            project_id: project.id,
            project_name: project.project_name.clone(),
            client_id: project.client_id,
            editor_id: project.editor_id,
            output_links: project.link_urls(),
        }
    }
}

/// Statuses a client reaching triggers a notice to admins and the editor
const CLIENT_NOTIFYING: [ProjectStatus; 5] = [
    ProjectStatus::Revision,
    ProjectStatus::ForQa,
    ProjectStatus::DoneQa,
    ProjectStatus::RevisionCompleted,
    ProjectStatus::SentToClient,
];

#[derive(Debug, Clone, Copy, Default)]
pub struct StatusTransitionPolicy;

impl StatusTransitionPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Decide what a status change by `actor` should trigger
    pub fn evaluate(
        &self,
        ctx: &TransitionContext,
        old: ProjectStatus,
        new: ProjectStatus,
        actor: Role,
    ) -> DispatchPlan {
        let mut plan = DispatchPlan::default();
        if old == new {
            return plan;
        }

        let status = new.as_str();

        if actor == Role::Client && CLIENT_NOTIFYING.contains(&new) {
            plan.push(NotificationIntent::status_update(
                Recipient::Role(Role::Admin),
                ctx.project_id,
                &ctx.project_name,
                status,
                actor,
            ));
            if let Some(editor_id) = ctx.editor_id {
                plan.push(NotificationIntent::status_update(
                    Recipient::User(editor_id),
                    ctx.project_id,
                    &ctx.project_name,
                    status,
                    actor,
                ));
            }
        }

        if actor == Role::Admin && matches!(new, ProjectStatus::Revision | ProjectStatus::DoneQa) {
            if let Some(editor_id) = ctx.editor_id {
                plan.push(NotificationIntent::status_update(
                    Recipient::User(editor_id),
                    ctx.project_id,
                    &ctx.project_name,
                    status,
                    actor,
                ));
            }
        }

        if matches!(actor, Role::Admin | Role::Editor) && new == ProjectStatus::SentToClient {
            plan.push_mail(MailDirective::ProjectDelivered {
                project_id: ctx.project_id,
                client_id: ctx.client_id,
                project_name: ctx.project_name.clone(),
                output_links: ctx.output_links.clone(),
            });
            plan.push(NotificationIntent::sent_to_client(
                ctx.client_id,
                ctx.project_id,
                &ctx.project_name,
                status,
                actor,
            ));
        }

        tracing::debug!(
            project_id = %ctx.project_id,
            from = %old,
            to = %new,
            actor = %actor,
            notifications = plan.notifications.len(),
            mail = plan.mail.len(),
            "Evaluated status transition"
        );

        plan
    }

    /// Notify a newly assigned editor
    ///
    /// `ctx.editor_id` is the editor after the change.
    pub fn on_assignment(
        &self,
        ctx: &TransitionContext,
        previous_editor: Option<Uuid>,
        actor: Role,
    ) -> DispatchPlan {
        let mut plan = DispatchPlan::default();
        match ctx.editor_id {
            Some(editor_id) if previous_editor != Some(editor_id) => {
                plan.push(NotificationIntent::assigned(
                    editor_id,
                    ctx.project_id,
                    &ctx.project_name,
                    actor,
                ));
            }
            _ => {}
        }
        plan
    }

    /// New order placed; only client orders are announced to admins
    pub fn on_created(&self, ctx: &TransitionContext, actor: Role) -> DispatchPlan {
        let mut plan = DispatchPlan::default();
        if actor == Role::Client {
            plan.push(NotificationIntent::created(
                Recipient::Role(Role::Admin),
                ctx.project_id,
                &ctx.project_name,
                actor,
            ));
        }
        plan
    }

    /// Comment posted on a project
    pub fn on_comment(&self, ctx: &TransitionContext, actor: Role) -> DispatchPlan {
        let mut plan = DispatchPlan::default();
        match actor {
            Role::Client => {
                plan.push(NotificationIntent::comment(
                    Recipient::Role(Role::Admin),
                    ctx.project_id,
                    &ctx.project_name,
                    actor,
                ));
                if let Some(editor_id) = ctx.editor_id {
                    plan.push(NotificationIntent::comment(
                        Recipient::User(editor_id),
                        ctx.project_id,
                        &ctx.project_name,
                        actor,
                    ));
                }
            }
            Role::Admin => {
                if let Some(editor_id) = ctx.editor_id {
                    plan.push(NotificationIntent::comment(
                        Recipient::User(editor_id),
                        ctx.project_id,
                        &ctx.project_name,
                        actor,
                    ));
                }
            }
            Role::Editor => {}
        }
        plan
    }

    /// Everything a full update between two snapshots triggers
    pub fn evaluate_update(&self, before: &Project, after: &Project, actor: Role) -> DispatchPlan {
        let ctx = TransitionContext::from(after);
        self.on_assignment(&ctx, before.editor_id, actor)
            .merge(self.evaluate(&ctx, before.status, after.status, actor))
    }
}
