//! Common fixtures for integration tests
//!
//! Every test gets its own in-memory backend with two admins, one editor and
//! one client already registered in the user directory.

use rust_decimal::Decimal;
use uuid::Uuid;

use reelflow_app::{create_app, Actor, App, InMemoryBackend};
use reelflow_common::{Config, Role};
use reelflow_notifications::Contact;
use reelflow_projects::{Project, ProjectDraft};

#[allow(dead_code)]
pub const CLIENT_EMAIL: &str = "dana@example.com";
#[allow(dead_code)]
pub const CLIENT_OFFICE_EMAIL: &str = "office@example.com";

#[allow(dead_code)]
pub struct TestApp {
    pub app: App,
    pub backend: InMemoryBackend,
    pub admins: Vec<Uuid>,
    pub editor: Uuid,
    pub client: Uuid,
}

#[allow(dead_code)]
impl TestApp {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let backend = InMemoryBackend::default();
        let app = create_app(&config, backend.collaborators());

        let directory = &backend.directory;
        let admins = vec![
            directory.add_user("Ana", Role::Admin, "ana@reelflow.app"),
            directory.add_user("Ben", Role::Admin, "ben@reelflow.app"),
        ];
        let editor = directory.add_user("Eli", Role::Editor, "eli@reelflow.app");

        let client = Uuid::new_v4();
        directory.insert(Contact {
            id: client,
            name: "Dana".to_string(),
            role: Role::Client,
            email: Some(CLIENT_EMAIL.to_string()),
            additional_emails: vec![CLIENT_OFFICE_EMAIL.to_string()],
        });

        Self {
            app,
            backend,
            admins,
            editor,
            client,
        }
    }

    pub fn admin(&self) -> Actor {
        Actor::admin(self.admins[0])
    }

    pub fn editor(&self) -> Actor {
        Actor::editor(self.editor)
    }

    pub fn client(&self) -> Actor {
        Actor::client(self.client)
    }

    /// Client order, assigned to the editor by an admin
    pub async fn assigned_order(&self, draft: ProjectDraft) -> Project {
        let project = self
            .app
            .projects
            .create(self.client(), draft, None)
            .await
            .unwrap();
        self.app
            .projects
            .assign_editor(self.admin(), project.id, Some(self.editor))
            .await
            .unwrap()
    }

    /// Notification records held for one user
    pub fn inbox(&self, user_id: Uuid) -> usize {
        self.backend.notifications.for_recipient(user_id).len()
    }
}

#[allow(dead_code)]
pub fn draft(name: &str, style: &str, format: &str, total_price: i64) -> ProjectDraft {
    serde_json::from_value(serde_json::json!({
        "project_name": name,
        "style": style,
        "format": format,
        "total_price": Decimal::from(total_price),
    }))
    .unwrap()
}
