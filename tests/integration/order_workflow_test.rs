//! Order workflow integration tests
//!
//! Drives the project workflow end to end over the in-memory backend: pricing
//! on create and update, status-driven notifications with duplicate
//! suppression, delivery mail and ownership checks.

use std::time::Duration;

use rust_decimal::Decimal;
use serde_json::json;

use reelflow_common::{Config, Error};
use reelflow_email::TEMPLATE_PROJECT_DELIVERED;
use reelflow_notifications::NotificationType;
use reelflow_projects::{AdminProjectUpdate, OutputLink, ProjectDraft, ProjectStatus};

use crate::common::{draft, TestApp, CLIENT_EMAIL, CLIENT_OFFICE_EMAIL};

#[tokio::test]
async fn test_luxury_order_is_priced_server_side() {
    let t = TestApp::new();

    let luxury: ProjectDraft = serde_json::from_value(json!({
        "project_name": "Hillside Estate",
        "style": "Luxury Video",
        "format": "horizontal",
        "with_agent": true,
        "rush": true,
        "per_property": true,
        "per_property_count": 2,
        "editor_price": 1,
        "total_price": 170,
        "extra_fields": {
            "captions": ["3D Text tracked on the ground etc."],
            "effects": [{ "id": "Virtual Staging AI", "quantity": 2 }]
        }
    }))
    .unwrap();

    let project = t
        .app
        .projects
        .create(t.client(), luxury, None)
        .await
        .unwrap();

    assert_eq!(project.editor_price, Decimal::from(3600));
    assert_eq!(project.total_price, Decimal::from(170));
    assert_eq!(project.status, ProjectStatus::Todo);

    // Both admins hear about the new order
    for admin in &t.admins {
        assert_eq!(t.inbox(*admin), 1);
    }
    assert_eq!(t.backend.notifications.count_of(NotificationType::ProjectCreated), 2);
}

#[tokio::test]
async fn test_full_update_reprices_but_status_patch_does_not() {
    let t = TestApp::new();
    let project = t
        .assigned_order(draft("Maple St", "premium video", "vertical", 50))
        .await;
    assert_eq!(project.editor_price, Decimal::from(1200));

    let updated = t
        .app
        .projects
        .update(
            t.admin(),
            project.id,
            draft("Maple St", "premium video", "horizontal_and_vertical_package", 130),
        )
        .await
        .unwrap();
    assert_eq!(updated.editor_price, Decimal::from(2700));

    let patched = t
        .app
        .projects
        .update_status(t.editor(), project.id, "in_progress")
        .await
        .unwrap();
    assert_eq!(patched.editor_price, Decimal::from(2700));
    assert_eq!(patched.status, ProjectStatus::InProgress);
}

#[tokio::test]
async fn test_editor_cannot_rewrite_order_or_billing() {
    let t = TestApp::new();
    let project = t
        .assigned_order(draft("Maple St", "basic video", "horizontal", 40))
        .await;

    let err = t
        .app
        .projects
        .update(
            t.editor(),
            project.id,
            draft("Maple St", "luxury video", "horizontal_and_vertical_package", 9999),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Authorization(_)));

    let stored = t.app.projects.get(t.admin(), project.id).await.unwrap();
    assert_eq!(stored.editor_price, Decimal::from(500));
    assert_eq!(stored.total_price, Decimal::from(40));

    // The owning client may still edit their order
    let updated = t
        .app
        .projects
        .update(t.client(), project.id, draft("Maple St", "basic video", "vertical", 25))
        .await
        .unwrap();
    assert_eq!(updated.editor_price, Decimal::from(350));
}

#[tokio::test]
async fn test_admin_update_sets_status_and_editor_in_one_call() {
    let t = TestApp::new();
    let project = t
        .app
        .projects
        .create(t.client(), draft("Maple St", "deluxe video", "horizontal", 60), None)
        .await
        .unwrap();

    let update: AdminProjectUpdate = serde_json::from_value(json!({
        "project_name": "Maple St",
        "style": "deluxe video",
        "format": "vertical",
        "total_price": 35,
        "status": "done_qa",
        "editor_id": t.editor,
    }))
    .unwrap();
    let updated = t
        .app
        .projects
        .admin_update(t.admin(), project.id, update.clone())
        .await
        .unwrap();

    assert_eq!(updated.status, ProjectStatus::DoneQa);
    assert!(updated.is_assigned_to(t.editor));
    assert_eq!(updated.editor_price, Decimal::from(700));

    // Assignment and the done_qa notice both reach the editor
    let kinds: Vec<NotificationType> = t
        .backend
        .notifications
        .for_recipient(t.editor)
        .iter()
        .map(|n| n.kind)
        .collect();
    assert!(kinds.contains(&NotificationType::ProjectAssigned));
    assert!(kinds.contains(&NotificationType::ProjectStatusUpdate));

    let err = t
        .app
        .projects
        .admin_update(t.client(), project.id, update)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Authorization(_)));
}

#[tokio::test]
async fn test_client_revision_notifies_admins_and_editor_once_per_window() {
    let t = TestApp::new();
    let project = t
        .assigned_order(draft("Maple St", "deluxe video", "horizontal", 60))
        .await;
    let before: Vec<usize> = t.admins.iter().map(|a| t.inbox(*a)).collect();
    let editor_before = t.inbox(t.editor);

    t.app
        .projects
        .update_status(t.client(), project.id, "revision")
        .await
        .unwrap();

    for (admin, count) in t.admins.iter().zip(&before) {
        assert_eq!(t.inbox(*admin), count + 1);
    }
    assert_eq!(t.inbox(t.editor), editor_before + 1);
    let after_first = t.backend.notifications.count();

    // Literal repeat is a no-op transition
    t.app
        .projects
        .update_status(t.client(), project.id, "revision")
        .await
        .unwrap();
    assert_eq!(t.backend.notifications.count(), after_first);

    // Leaving and coming back inside the window is suppressed
    t.app
        .projects
        .update_status(t.client(), project.id, "in_progress")
        .await
        .unwrap();
    t.app
        .projects
        .update_status(t.client(), project.id, "REVISION")
        .await
        .unwrap();
    assert_eq!(t.backend.notifications.count(), after_first);
}

#[tokio::test]
async fn test_assignment_notifies_new_editor_only() {
    let t = TestApp::new();
    let project = t
        .app
        .projects
        .create(t.client(), draft("Oak Ave", "basic video", "vertical", 25), None)
        .await
        .unwrap();

    t.app
        .projects
        .assign_editor(t.admin(), project.id, Some(t.editor))
        .await
        .unwrap();
    assert_eq!(t.backend.notifications.count_of(NotificationType::ProjectAssigned), 1);

    // Reassigning the same editor changes nothing
    t.app
        .projects
        .assign_editor(t.admin(), project.id, Some(t.editor))
        .await
        .unwrap();
    assert_eq!(t.backend.notifications.count_of(NotificationType::ProjectAssigned), 1);

    let err = t
        .app
        .projects
        .assign_editor(t.editor(), project.id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Authorization(_)));
}

#[tokio::test]
async fn test_delivery_mails_client_and_notifies_in_app() {
    let t = TestApp::new();
    let project = t
        .assigned_order(draft("Maple St", "premium drone only", "horizontal", 45))
        .await;

    t.app
        .projects
        .set_output_links(
            t.editor(),
            project.id,
            vec![OutputLink::new("Final", "drive.example.com/maple.mp4")],
        )
        .await
        .unwrap();
    t.app
        .projects
        .update_status(t.editor(), project.id, "sent_to_client")
        .await
        .unwrap();

    let mails = t.backend.mail.get_emails_with_template(TEMPLATE_PROJECT_DELIVERED);
    assert_eq!(mails.len(), 1);
    assert_eq!(
        mails[0].message.to,
        vec![CLIENT_EMAIL.to_string(), CLIENT_OFFICE_EMAIL.to_string()]
    );
    assert_eq!(mails[0].project_id(), Some(project.id));
    assert!(mails[0]
        .message
        .body_text
        .contains("https://drive.example.com/maple.mp4"));

    let client_inbox = t.backend.notifications.for_recipient(t.client);
    assert_eq!(client_inbox.len(), 1);
    assert_eq!(client_inbox[0].kind, NotificationType::SentToClient);
}

#[test_log::test(tokio::test)]
async fn test_mail_failure_does_not_fail_status_update() {
    let t = TestApp::new();
    let project = t
        .assigned_order(draft("Maple St", "luxury video", "vertical", 70))
        .await;
    t.backend.mail.set_failing(true);

    let updated = t
        .app
        .projects
        .update_status(t.admin(), project.id, "sent_to_client")
        .await
        .unwrap();

    assert_eq!(updated.status, ProjectStatus::SentToClient);
    assert_eq!(t.backend.mail.email_count(), 0);
    assert_eq!(t.inbox(t.client), 1);

    let stored = t.app.projects.get(t.admin(), project.id).await.unwrap();
    assert_eq!(stored.status, ProjectStatus::SentToClient);
}

#[test_log::test(tokio::test)]
async fn test_dedup_store_failure_still_notifies() {
    let t = TestApp::new();
    let project = t
        .assigned_order(draft("Maple St", "basic video", "horizontal", 40))
        .await;
    let before = t.inbox(t.editor);
    t.backend.notifications.set_query_failing(true);

    t.app
        .projects
        .update_status(t.admin(), project.id, "done_qa")
        .await
        .unwrap();
    assert_eq!(t.inbox(t.editor), before + 1);
}

#[tokio::test]
async fn test_ownership_is_enforced() {
    let t = TestApp::new();
    let project = t
        .app
        .projects
        .create(t.client(), draft("Maple St", "basic video", "horizontal", 40), None)
        .await
        .unwrap();

    let stranger = reelflow_app::Actor::client(uuid::Uuid::new_v4());
    let err = t
        .app
        .projects
        .update_status(stranger, project.id, "revision")
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "AUTHORIZATION_ERROR");

    // Unassigned editor
    let err = t
        .app
        .projects
        .update_status(t.editor(), project.id, "for_qa")
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "AUTHORIZATION_ERROR");

    let stored = t.app.projects.get(t.client(), project.id).await.unwrap();
    assert_eq!(stored.status, ProjectStatus::Todo);
}

#[tokio::test]
async fn test_comments_route_by_author() {
    let t = TestApp::new();
    let project = t
        .assigned_order(draft("Maple St", "basic video", "horizontal", 40))
        .await;

    t.app
        .projects
        .comment(t.client(), project.id, "Can we brighten the kitchen?")
        .await
        .unwrap();
    assert_eq!(t.backend.notifications.count_of(NotificationType::ClientComment), 3);

    // A second comment inside the window is new content, not a repeat
    t.app
        .projects
        .comment(t.client(), project.id, "Also trim the intro by two seconds")
        .await
        .unwrap();
    assert_eq!(t.backend.notifications.count_of(NotificationType::ClientComment), 6);

    assert!(t
        .app
        .projects
        .comment(t.client(), project.id, "   ")
        .await
        .is_err());
}

#[tokio::test]
async fn test_admin_price_update_and_destroy() {
    let t = TestApp::new();
    let project = t
        .app
        .projects
        .create(t.client(), draft("Maple St", "basic video", "horizontal", 40), None)
        .await
        .unwrap();

    let err = t
        .app
        .projects
        .update_price(t.client(), project.id, Decimal::from(1))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Authorization(_)));

    let repriced = t
        .app
        .projects
        .update_price(t.admin(), project.id, Decimal::from(55))
        .await
        .unwrap();
    assert_eq!(repriced.total_price, Decimal::from(55));
    assert_eq!(repriced.editor_price, Decimal::from(500));

    t.app.projects.destroy(t.admin(), project.id).await.unwrap();
    let err = t.app.projects.destroy(t.admin(), project.id).await.unwrap_err();
    assert_eq!(err.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_admin_creates_for_named_client() {
    let t = TestApp::new();
    let d = draft("Maple St", "basic video", "horizontal", 40);

    let err = t
        .app
        .projects
        .create(t.admin(), d.clone(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let project = t
        .app
        .projects
        .create(t.admin(), d, Some(t.client))
        .await
        .unwrap();
    assert!(project.is_owned_by(t.client));
    // Orders placed by staff are not announced
    assert_eq!(t.backend.notifications.count(), 0);
}

#[tokio::test]
async fn test_detached_dispatch_records_after_commit() {
    let config = Config {
        notifications_detached: true,
        ..Config::default()
    };
    let t = TestApp::with_config(config);
    let project = t
        .app
        .projects
        .create(t.client(), draft("Maple St", "basic video", "horizontal", 40), None)
        .await
        .unwrap();

    let mut recorded = 0;
    for _ in 0..50 {
        recorded = t.backend.notifications.count();
        if recorded == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(recorded, 2);
    assert!(t.backend.projects.count() == 1);
    assert_eq!(
        t.backend.notifications.all()[0].project_id,
        project.id
    );
}

mod common;
