//! Project status set and its client-facing grouping

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use reelflow_common::Error;

/// Stored project status
///
/// Every status may follow every other; the workflow only reacts to the
/// status that was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Todo,
    Backlog,
    InProgress,
    ForQa,
    DoneQa,
    SentToClient,
    Revision,
    RevisionCompleted,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 8] = [
        ProjectStatus::Todo,
        ProjectStatus::Backlog,
        ProjectStatus::InProgress,
        ProjectStatus::ForQa,
        ProjectStatus::DoneQa,
        ProjectStatus::SentToClient,
        ProjectStatus::Revision,
        ProjectStatus::RevisionCompleted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Todo => "todo",
            ProjectStatus::Backlog => "backlog",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::ForQa => "for_qa",
            ProjectStatus::DoneQa => "done_qa",
            ProjectStatus::SentToClient => "sent_to_client",
            ProjectStatus::Revision => "revision",
            ProjectStatus::RevisionCompleted => "revision_completed",
        }
    }

    pub fn client_status(&self) -> ClientStatus {
        ClientStatus::from(*self)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = Error;

    /// Accepts stored names and the legacy `pending`/`completed` aliases
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "pending" => return Ok(ProjectStatus::Todo),
            "completed" => return Ok(ProjectStatus::RevisionCompleted),
            _ => {}
        }
        ProjectStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| Error::Validation(format!("Unknown project status: {}", s.trim())))
    }
}

/// Simplified status shown to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    Pending,
    InProgress,
    Completed,
}

impl ClientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Pending => "pending",
            ClientStatus::InProgress => "in_progress",
            ClientStatus::Completed => "completed",
        }
    }

    /// Stored statuses grouped under this one
    pub fn members(&self) -> &'static [ProjectStatus] {
        match self {
            ClientStatus::Pending => &[ProjectStatus::Todo, ProjectStatus::Backlog],
            ClientStatus::InProgress => &[
                ProjectStatus::InProgress,
                ProjectStatus::ForQa,
                ProjectStatus::DoneQa,
                ProjectStatus::Revision,
            ],
            ClientStatus::Completed => &[
                ProjectStatus::RevisionCompleted,
                ProjectStatus::SentToClient,
            ],
        }
    }
}

impl From<ProjectStatus> for ClientStatus {
    fn from(status: ProjectStatus) -> Self {
        match status {
            ProjectStatus::Todo | ProjectStatus::Backlog => ClientStatus::Pending,
            ProjectStatus::InProgress
            | ProjectStatus::ForQa
            | ProjectStatus::DoneQa
            | ProjectStatus::Revision => ClientStatus::InProgress,
            ProjectStatus::RevisionCompleted | ProjectStatus::SentToClient => {
                ClientStatus::Completed
            }
        }
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Listing filter: a client group or one exact status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Group(ClientStatus),
    Exact(ProjectStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: ProjectStatus) -> bool {
        match self {
            StatusFilter::Group(group) => group.members().contains(&status),
            StatusFilter::Exact(exact) => *exact == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = Error;

    /// Group names win over the stored status of the same name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(StatusFilter::Group(ClientStatus::Pending)),
            "in_progress" => Ok(StatusFilter::Group(ClientStatus::InProgress)),
            "completed" => Ok(StatusFilter::Group(ClientStatus::Completed)),
            _ => s.parse().map(StatusFilter::Exact),
        }
    }
}

/// Derived priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
}

impl Priority {
    /// Rush orders are urgent; everything else has no priority
    pub fn for_rush(rush: bool) -> Option<Priority> {
        rush.then_some(Priority::Urgent)
    }
}
