//! Human-readable notification messages

use reelflow_common::Role;

pub fn status_update_message(project_name: &str, status: &str, triggered_by: Role) -> String {
    match status {
        "revision" => format!(
            "Project '{}' has been marked for revision by {}.",
            project_name, triggered_by
        ),
        "for_qa" => format!(
            "Project '{}' has been submitted for QA by {}.",
            project_name, triggered_by
        ),
        "done_qa" => format!(
            "Project '{}' has been marked Done QA by {}.",
            project_name, triggered_by
        ),
        "revision_completed" => format!(
            "Project '{}' revision has been completed by {}.",
            project_name, triggered_by
        ),
        "sent_to_client" => format!(
            "Project '{}' has been sent to the client by {}.",
            project_name, triggered_by
        ),
        other => format!("Project '{}' status updated to {}.", project_name, other),
    }
}

pub fn client_status_message(project_name: &str, status: &str) -> String {
    match status {
        "sent_to_client" => format!(
            "Great news! Your project '{}' is ready for review.",
            project_name
        ),
        "revision" => format!(
            "Your project '{}' has been marked for revision.",
            project_name
        ),
        "revision_completed" => format!(
            "The revision for your project '{}' has been completed.",
            project_name
        ),
        other => format!(
            "Your project '{}' status has been updated to {}.",
            project_name, other
        ),
    }
}

pub fn assigned_message(project_name: &str) -> String {
    format!("You have been assigned to project '{}'.", project_name)
}

pub fn created_message(project_name: &str) -> String {
    format!("New project '{}' has been created.", project_name)
}

pub fn comment_message(project_name: &str, triggered_by: Role) -> String {
    format!("New comment on project '{}' from {}.", project_name, triggered_by)
}
