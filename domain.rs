use crate::*;

/// A borg repository hosted under `repos_dir/<owner>/<name>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    #[serde(default = "Uuid::now_v7")]
    pub id: Uuid,
    pub name: String,
    pub owner: String,
    pub created: DateTime<Utc>,
    pub last_update: Option<DateTime<Utc>>,
    /// Set while a `lock.roster` is present in the repository
    #[serde(default)]
    pub open: bool,
    /// Set once a staleness alert went out, cleared on the next update
    #[serde(default)]
    pub alerted: bool,
}

impl Repository {
    pub fn new(name: &str, owner: &str) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.to_owned(),
            owner: owner.to_owned(),
            created: Utc::now(),
            last_update: None,
            open: false,
            alerted: false,
        }
    }

    /// `<owner>/<name>`, the path of the repository relative to the hosting root
    pub fn location(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    pub fn is_stale(&self, threshold_hours: u64, now: DateTime<Utc>) -> bool {
        let Some(last_update) = self.last_update else {
            return false;
        };
        now - last_update > chrono::Duration::hours(threshold_hours as i64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Watcher,
    Alert,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Watcher => write!(f, "watcher"),
            EventKind::Alert => write!(f, "alert"),
        }
    }
}

/// Something that happened to a repository, shown in its detail view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryEvent {
    pub repo_id: Uuid,
    pub kind: EventKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl RepositoryEvent {
    pub fn watcher(repo_id: Uuid, message: &str) -> Self {
        Self {
            repo_id,
            kind: EventKind::Watcher,
            message: message.to_owned(),
            timestamp: Utc::now(),
        }
    }

    pub fn alert(repo_id: Uuid, message: &str) -> Self {
        Self {
            repo_id,
            kind: EventKind::Alert,
            message: message.to_owned(),
            timestamp: Utc::now(),
        }
    }
}

/// Email target for staleness alerts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailNotification {
    #[serde(default = "Uuid::now_v7")]
    pub id: Uuid,
    pub email: String,
}

/// Pushover target for staleness alerts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushoverNotification {
    #[serde(default = "Uuid::now_v7")]
    pub id: Uuid,
    pub name: String,
    pub user: String,
    pub token: String,
}

/// When and whether staleness alerts go out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertPreference {
    #[serde(default)]
    pub enabled: bool,
    pub interval_hours: u64,
}

impl Default for AlertPreference {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_hours: 24,
        }
    }
}

impl Render for Repository {
    fn render(&self) -> Markup {
        html! {
            tr {
                td { (modal_trigger(&format!("/repositories/{}", self.id), &self.location())) }
                td { @if self.open { "open" } @else { "closed" } }
                td {
                    @if let Some(last_update) = self.last_update {
                        (last_update.format("%Y-%m-%d %H:%M UTC").to_string())
                    } @else {
                        "never"
                    }
                }
            }
        }
    }
}

impl Render for RepositoryEvent {
    fn render(&self) -> Markup {
        html! {
            tr {
                td { (self.timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()) }
                td { (self.kind.to_string()) }
                td { (self.message) }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staleness_is_relative_to_last_update() {
        let mut repo = Repository::new("backup", "alice");
        let now = Utc::now();
        // never updated repos are not stale, there is nothing to alert about yet
        assert!(!repo.is_stale(1, now));

        repo.last_update = Some(now - chrono::Duration::hours(3));
        assert!(repo.is_stale(2, now));
        assert!(!repo.is_stale(4, now));
    }

    #[test]
    fn repository_row_links_its_detail_fragment() {
        let repo = Repository::new("backup", "alice");
        let markup = repo.render().into_string();
        assert!(markup.contains(&format!("data-url=\"/repositories/{}\"", repo.id)));
        assert!(markup.contains("alice/backup"));
    }
}
