//! Environment-driven startup
//!
//! `bootstrap` installs the global tracing subscriber, so it runs at most once
//! per process; everything that needs it lives in a single test.

use std::env;

use serial_test::serial;

use reelflow_app::{bootstrap, Actor};
use reelflow_common::Role;
use reelflow_email::{EmailConfig, EmailServiceFactory};

use crate::common::draft;

fn clear_env() {
    for key in [
        "NOTIFICATION_DEDUP_WINDOW_SECS",
        "NOTIFICATIONS_DETACHED",
        "INVOICE_NUMBER_PREFIX",
        "LOG_FORMAT",
        "EMAIL_PROVIDER",
        "EMAIL_ENABLED",
        "FROM_EMAIL",
    ] {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_bootstrap_from_environment() {
    clear_env();

    env::set_var("NOTIFICATION_DEDUP_WINDOW_SECS", "-5");
    assert!(bootstrap().is_err());

    env::set_var("NOTIFICATION_DEDUP_WINDOW_SECS", "120");
    env::set_var("INVOICE_NUMBER_PREFIX", "RF-");
    env::set_var("LOG_FORMAT", "json");
    env::set_var("EMAIL_ENABLED", "false");

    let (app, backend) = bootstrap().unwrap();
    let client = backend
        .directory
        .add_user("Dana", Role::Client, "dana@example.com");
    let admin = backend
        .directory
        .add_user("Ana", Role::Admin, "ana@reelflow.app");

    tokio_test::block_on(async {
        let project = app
            .projects
            .create(
                Actor::client(client),
                draft("Maple St", "deluxe video", "vertical", 35),
                None,
            )
            .await
            .unwrap();
        let invoice = app
            .invoices
            .compose(Actor::admin(admin), client, &[project.id], Default::default())
            .await
            .unwrap();
        assert!(invoice.invoice_number.starts_with("RF-"));

        // Disabled mail still accepts the send
        let sent = app.invoices.send(Actor::admin(admin), invoice.id).await.unwrap();
        assert!(sent.sent_at.is_some());
    });

    // Mail went through the configured service, not the backend's mock
    assert_eq!(backend.mail.email_count(), 0);
    assert_eq!(backend.notifications.for_recipient(admin).len(), 1);
    clear_env();
}

#[test]
#[serial]
fn test_unknown_email_provider_is_rejected() {
    clear_env();
    env::set_var("EMAIL_PROVIDER", "carrier-pigeon");

    let config = EmailConfig::from_env().unwrap();
    assert!(EmailServiceFactory::create(config).is_err());
    clear_env();
}

mod common;
