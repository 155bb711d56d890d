//! Invoice workflow integration tests
//!
//! Composes invoices from real orders, sends them through the mock mail sink
//! and walks the pending → sent → paid lifecycle.

use rust_decimal::Decimal;
use uuid::Uuid;

use reelflow_common::{Error, Role};
use reelflow_email::TEMPLATE_INVOICE;
use reelflow_invoices::{InvoiceDraft, InvoiceStatus};
use reelflow_notifications::Contact;

use crate::common::{draft, TestApp, CLIENT_EMAIL, CLIENT_OFFICE_EMAIL};

async fn two_orders(t: &TestApp) -> Vec<Uuid> {
    let first = t
        .assigned_order(draft("Maple St", "basic video", "horizontal", 40))
        .await;
    let second = t
        .assigned_order(draft("Oak Avenue Penthouse", "luxury video", "vertical", 55))
        .await;
    vec![first.id, second.id]
}

fn paypal() -> InvoiceDraft {
    InvoiceDraft {
        paypal_link: Some("https://paypal.me/reelflow/95".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_compose_totals_client_prices() {
    let t = TestApp::new();
    let ids = two_orders(&t).await;

    let invoice = t
        .app
        .invoices
        .compose(t.admin(), t.client, &ids, paypal())
        .await
        .unwrap();

    assert_eq!(invoice.status, InvoiceStatus::Pending);
    assert_eq!(invoice.total_amount, Decimal::from(95));
    assert_eq!(invoice.project_ids, ids);
    assert!(invoice.invoice_number.starts_with("INV-"));

    let summary = t.app.invoices.summary(t.admin(), invoice.id).await.unwrap();
    assert_eq!(summary.line_items.len(), 2);
    assert_eq!(summary.total, Decimal::from(95));
    assert_eq!(summary.formatted_total(), "95.00");
}

#[tokio::test]
async fn test_compose_rejects_foreign_or_missing_projects() {
    let t = TestApp::new();
    let ids = two_orders(&t).await;

    let err = t
        .app
        .invoices
        .compose(t.admin(), Uuid::new_v4(), &ids, InvoiceDraft::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let err = t
        .app
        .invoices
        .compose(t.admin(), t.client, &[Uuid::new_v4()], InvoiceDraft::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let err = t
        .app
        .invoices
        .compose(t.admin(), t.client, &[], InvoiceDraft::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let err = t
        .app
        .invoices
        .compose(t.client(), t.client, &ids, InvoiceDraft::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Authorization(_)));
    assert_eq!(t.backend.invoices.count(), 0);
}

#[tokio::test]
async fn test_send_mails_primary_address_and_marks_sent() {
    let t = TestApp::new();
    let ids = two_orders(&t).await;
    let invoice = t
        .app
        .invoices
        .compose(t.admin(), t.client, &ids, paypal())
        .await
        .unwrap();

    let sent = t.app.invoices.send(t.admin(), invoice.id).await.unwrap();
    assert_eq!(sent.status, InvoiceStatus::Sent);
    assert!(sent.sent_at.is_some());

    let mails = t.backend.mail.get_emails_with_template(TEMPLATE_INVOICE);
    assert_eq!(mails.len(), 1);
    let mail = &mails[0];
    assert_eq!(mail.message.to, vec![CLIENT_EMAIL.to_string()]);
    assert_eq!(
        mail.message.subject,
        format!("Invoice #{}", invoice.invoice_number)
    );
    assert_eq!(mail.invoice_id(), Some(invoice.id));
    assert!(mail.message.body_text.contains("Total: $95.00"));
    assert!(mail.message.body_text.contains("https://paypal.me/reelflow/95"));
    assert!(t
        .backend
        .mail
        .get_emails_for_recipient(CLIENT_OFFICE_EMAIL)
        .is_empty());
}

#[tokio::test]
async fn test_lifecycle_ends_at_paid() {
    let t = TestApp::new();
    let ids = two_orders(&t).await;
    let invoice = t
        .app
        .invoices
        .compose(t.admin(), t.client, &ids, InvoiceDraft::default())
        .await
        .unwrap();

    // Payment before sending is out of order
    let err = t
        .app
        .invoices
        .mark_paid(t.admin(), invoice.id)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    t.app.invoices.send(t.admin(), invoice.id).await.unwrap();
    let paid = t.app.invoices.mark_paid(t.admin(), invoice.id).await.unwrap();
    assert_eq!(paid.status, InvoiceStatus::Paid);
    assert!(paid.paid_at.is_some());

    assert!(t.app.invoices.cancel(t.admin(), invoice.id).await.is_err());
    assert!(t.app.invoices.send(t.admin(), invoice.id).await.is_err());
    assert_eq!(t.backend.mail.email_count(), 1);
}

#[tokio::test]
async fn test_cancel_releases_projects() {
    let t = TestApp::new();
    let ids = two_orders(&t).await;
    let invoice = t
        .app
        .invoices
        .compose(t.admin(), t.client, &ids, InvoiceDraft::default())
        .await
        .unwrap();

    let cancelled = t.app.invoices.cancel(t.admin(), invoice.id).await.unwrap();
    assert_eq!(cancelled.status, InvoiceStatus::Cancelled);
    assert!(cancelled.project_ids.is_empty());

    let summary = t.app.invoices.summary(t.admin(), invoice.id).await.unwrap();
    assert!(summary.line_items.is_empty());

    // The projects can be billed again
    let again = t
        .app
        .invoices
        .compose(t.admin(), t.client, &ids, InvoiceDraft::default())
        .await
        .unwrap();
    assert_eq!(again.total_amount, Decimal::from(95));
}

#[tokio::test]
async fn test_update_recomputes_total() {
    let t = TestApp::new();
    let ids = two_orders(&t).await;
    let invoice = t
        .app
        .invoices
        .compose(t.admin(), t.client, &ids, InvoiceDraft::default())
        .await
        .unwrap();

    let updated = t
        .app
        .invoices
        .update(t.admin(), invoice.id, &ids[..1], InvoiceDraft::default())
        .await
        .unwrap();
    assert_eq!(updated.total_amount, Decimal::from(40));
    assert_eq!(updated.project_ids, vec![ids[0]]);
    assert_eq!(updated.invoice_number, invoice.invoice_number);
}

#[tokio::test]
async fn test_send_requires_client_email() {
    let t = TestApp::new();
    let silent = Uuid::new_v4();
    t.backend.directory.insert(Contact {
        id: silent,
        name: "Quiet Realty".to_string(),
        role: Role::Client,
        email: None,
        additional_emails: vec![],
    });
    let project = t
        .app
        .projects
        .create(
            reelflow_app::Actor::client(silent),
            draft("Pine Ct", "basic video", "horizontal", 30),
            None,
        )
        .await
        .unwrap();
    let invoice = t
        .app
        .invoices
        .compose(t.admin(), silent, &[project.id], InvoiceDraft::default())
        .await
        .unwrap();

    let err = t.app.invoices.send(t.admin(), invoice.id).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(t.backend.mail.email_count(), 0);
}

#[test_log::test(tokio::test)]
async fn test_mail_failure_keeps_invoice_pending() {
    let t = TestApp::new();
    let ids = two_orders(&t).await;
    let invoice = t
        .app
        .invoices
        .compose(t.admin(), t.client, &ids, InvoiceDraft::default())
        .await
        .unwrap();
    t.backend.mail.set_failing(true);

    let err = t.app.invoices.send(t.admin(), invoice.id).await.unwrap_err();
    assert_eq!(err.error_code(), "INTERNAL_ERROR");

    t.backend.mail.set_failing(false);
    let retried = t.app.invoices.send(t.admin(), invoice.id).await.unwrap();
    assert_eq!(retried.status, InvoiceStatus::Sent);
}

mod common;
