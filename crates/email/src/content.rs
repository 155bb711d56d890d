//! Shared email content templates
//!
//! Canonical content generators for delivery and invoice emails, used by every
//! `EmailService` implementation through the trait's default methods.

use serde::{Deserialize, Serialize};

/// One project row in an invoice email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceEmailLine {
    pub project_name: String,
    pub service: String,
    pub description: Vec<String>,
    pub amount: String,
}

fn output_label(index: usize, count: usize) -> String {
    if count > 1 {
        format!("Output {}", index + 1)
    } else {
        "Output".to_string()
    }
}

/// Generate plain-text body for a project delivery email.
pub fn project_delivered_text(
    client_name: &str,
    project_name: &str,
    output_links: &[String],
    project_url: &str,
) -> String {
    let mut body = format!(
        "Hi {},\n\n\
        Your project '{}' is ready!\n\n\
        We're excited to inform you that your project is now complete.\n",
        client_name, project_name
    );

    if !output_links.is_empty() {
        body.push_str("\nYou can access the finished output links below:\n");
        for (index, link) in output_links.iter().enumerate() {
            body.push_str(&format!(
                "{}: {}\n",
                output_label(index, output_links.len()),
                link
            ));
        }
    }

    body.push_str(&format!(
        "\nYou can also view your project details and comments on our website:\n\
        {}\n\n\
        Thank you for choosing us!",
        project_url
    ));
    body
}

/// Generate styled HTML body for a project delivery email.
pub fn project_delivered_html(
    client_name: &str,
    project_name: &str,
    output_links: &[String],
    project_url: &str,
) -> String {
    let links: String = output_links
        .iter()
        .enumerate()
        .map(|(index, link)| {
            format!(
                r#"<li>{label}: <a href="{link}">{link}</a></li>"#,
                label = output_label(index, output_links.len()),
                link = link
            )
        })
        .collect();

    let links_block = if links.is_empty() {
        String::new()
    } else {
        format!(
            "<p>You can access the finished output links below:</p><ul>{}</ul>",
            links
        )
    };

    format!(
        r#"
            <html>
            <body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
                <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
                    <h2 style="color: #1a73e8;">Your project {project_name} is ready!</h2>
                    <p>Hi {client_name},</p>
                    <p>We're excited to inform you that your project is now complete.</p>
                    {links_block}
                    <p>
                        <a href="{project_url}" style="color: #1a73e8; font-weight: bold;">View Project on Website</a>
                    </p>
                    <p><small>Thank you for choosing us!</small></p>
                </div>
            </body>
            </html>
            "#,
        project_name = project_name,
        client_name = client_name,
        links_block = links_block,
        project_url = project_url
    )
}

/// Generate plain-text body for an invoice email.
pub fn invoice_text(
    invoice_number: &str,
    lines: &[InvoiceEmailLine],
    total: &str,
    paypal_link: Option<&str>,
) -> String {
    let mut body = format!(
        "Good day!\n\n\
        Your invoice #{} has been prepared and is ready for your review.\n\n",
        invoice_number
    );

    for line in lines {
        body.push_str(&format!(
            "- {} [{}]: ${}\n",
            line.project_name, line.service, line.amount
        ));
        for detail in &line.description {
            body.push_str(&format!("    {}\n", detail));
        }
    }

    body.push_str(&format!("\nTotal: ${}\n", total));

    if let Some(link) = paypal_link {
        body.push_str(&format!(
            "\nPlease pay the exact amount stated above via PayPal:\n{}\n",
            link
        ));
    }

    body.push_str("\nThank you for your continued trust and partnership!");
    body
}

/// Generate styled HTML body for an invoice email.
pub fn invoice_html(
    invoice_number: &str,
    lines: &[InvoiceEmailLine],
    total: &str,
    paypal_link: Option<&str>,
) -> String {
    let rows: String = lines
        .iter()
        .map(|line| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>${}</td></tr>",
                line.project_name,
                line.service,
                line.description.join("<br>"),
                line.amount
            )
        })
        .collect();

    let pay_block = paypal_link
        .map(|link| {
            format!(
                r#"<p style="text-align: center;"><a href="{}" style="background: #0070ba; color: white; padding: 10px 20px; text-decoration: none; border-radius: 5px;">Pay with PayPal</a></p>"#,
                link
            )
        })
        .unwrap_or_default();

    format!(
        r#"
            <html>
            <body style="font-family: Arial, sans-serif; font-size: 12px; color: #333;">
                <h2>Invoice #{invoice_number}</h2>
                <table style="width: 100%; border-collapse: collapse;">
                    <thead><tr><th>Project</th><th>Service</th><th>Description</th><th>Amount</th></tr></thead>
                    <tbody>{rows}</tbody>
                </table>
                <h3 style="text-align: right;">Total: ${total}</h3>
                {pay_block}
            </body>
            </html>
            "#,
        invoice_number = invoice_number,
        rows = rows,
        total = total,
        pay_block = pay_block
    )
}
