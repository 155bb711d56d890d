//! Dispatch of decided notifications and mail
//!
//! The dispatcher is the boundary where policy decisions meet the outside
//! world. It resolves role recipients through the directory, filters every
//! resolved notification through the deduplicator, records the survivors in
//! one batch and sends mail. Nothing here returns an error: failures are
//! logged and counted in the report so the enclosing write is never undone.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use uuid::Uuid;

use reelflow_email::EmailService;

use crate::domain::dedup::NotificationDeduplicator;
use crate::domain::entities::{
    DispatchPlan, MailDirective, NewNotification, NotificationIntent, Recipient,
};
use crate::repository::{NotificationStore, UserDirectory};

/// Outcome counters for one dispatch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub recorded: usize,
    pub suppressed: usize,
    pub emails_sent: usize,
    pub failures: usize,
}

#[derive(Clone)]
pub struct NotificationDispatcher {
    store: Arc<dyn NotificationStore>,
    directory: Arc<dyn UserDirectory>,
    mail: Arc<dyn EmailService>,
    dedup: NotificationDeduplicator,
}

impl NotificationDispatcher {
    pub fn new(
        store: Arc<dyn NotificationStore>,
        directory: Arc<dyn UserDirectory>,
        mail: Arc<dyn EmailService>,
        dedup: NotificationDeduplicator,
    ) -> Self {
        Self {
            store,
            directory,
            mail,
            dedup,
        }
    }

    /// Dispatch a plan now
    pub async fn dispatch(&self, plan: DispatchPlan) -> DispatchReport {
        self.dispatch_at(plan, Utc::now()).await
    }

    /// Dispatch a plan on a background task
    ///
    /// Only call this after the write the plan describes has been committed.
    pub fn spawn(&self, plan: DispatchPlan) -> JoinHandle<DispatchReport> {
        let dispatcher = self.clone();
        tokio::spawn(async move { dispatcher.dispatch(plan).await })
    }

    /// Dispatch a plan as of `now`
    pub async fn dispatch_at(&self, plan: DispatchPlan, now: DateTime<Utc>) -> DispatchReport {
        let mut report = DispatchReport::default();

        if plan.is_empty() {
            return report;
        }

        let batch = self
            .collect_notifications(&plan.notifications, now, &mut report)
            .await;

        if !batch.is_empty() {
            let count = batch.len();
            match self.store.record_batch(batch).await {
                Ok(records) => report.recorded += records.len(),
                Err(e) => {
                    tracing::error!(error = %e, count, "Failed to record notifications");
                    report.failures += 1;
                }
            }
        }

        for directive in &plan.mail {
            self.send_mail(directive, &mut report).await;
        }

        tracing::info!(
            recorded = report.recorded,
            suppressed = report.suppressed,
            emails_sent = report.emails_sent,
            failures = report.failures,
            "Notification dispatch finished"
        );

        report
    }

    async fn collect_notifications(
        &self,
        intents: &[NotificationIntent],
        now: DateTime<Utc>,
        report: &mut DispatchReport,
    ) -> Vec<NewNotification> {
        let mut batch = Vec::new();
        let mut seen = HashSet::new();

        for intent in intents {
            let recipients = match self.resolve(intent.recipient).await {
                Some(recipients) => recipients,
                None => {
                    report.failures += 1;
                    continue;
                }
            };

            for recipient_id in recipients {
                let key = intent.key_for(recipient_id);
                // Same tuple twice in one plan, e.g. an editor who is also an admin
                if !seen.insert(key.clone()) {
                    report.suppressed += 1;
                    continue;
                }

                if !intent.kind.is_deduplicated() || self.dedup.should_send(&key, now).await {
                    batch.push(NewNotification::from_intent(intent, recipient_id, now));
                } else {
                    report.suppressed += 1;
                }
            }
        }

        batch
    }

    async fn resolve(&self, recipient: Recipient) -> Option<Vec<Uuid>> {
        match recipient {
            Recipient::User(id) => Some(vec![id]),
            Recipient::Role(role) => match self.directory.ids_with_role(role).await {
                Ok(ids) => Some(ids),
                Err(e) => {
                    tracing::error!(error = %e, role = %role, "Failed to resolve role recipients");
                    None
                }
            },
        }
    }

    async fn send_mail(&self, directive: &MailDirective, report: &mut DispatchReport) {
        match directive {
            MailDirective::ProjectDelivered {
                project_id,
                client_id,
                project_name,
                output_links,
            } => {
                let contact = match self.directory.contact(*client_id).await {
                    Ok(Some(contact)) => contact,
                    Ok(None) => {
                        tracing::warn!(%client_id, %project_id, "Client not found, delivery mail skipped");
                        return;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, %client_id, "Failed to load client contact");
                        report.failures += 1;
                        return;
                    }
                };

                let recipients = contact.all_emails();
                if recipients.is_empty() {
                    tracing::warn!(%client_id, %project_id, "Client has no valid email, delivery mail skipped");
                    return;
                }

                match self
                    .mail
                    .send_project_delivered(
                        recipients,
                        &contact.name,
                        *project_id,
                        project_name,
                        output_links,
                    )
                    .await
                {
                    Ok(receipt) => {
                        tracing::info!(
                            %project_id,
                            %client_id,
                            message_id = %receipt.message_id,
                            "Delivery mail sent to client"
                        );
                        report.emails_sent += 1;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, %project_id, "Failed to send delivery mail");
                        report.failures += 1;
                    }
                }
            }
        }
    }
}
