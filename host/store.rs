use crate::*;
use std::path::Path;

const ALERT_PREFERENCE_KEY: &[u8] = b"alert_preference";

/// sled-backed persistence: one tree per entity, bincode-encoded values,
/// uuid bytes as keys (events use `repo id + timestamp` for range scans)
pub struct Store {
    db: sled::Db,
    repositories: sled::Tree,
    events: sled::Tree,
    emails: sled::Tree,
    pushovers: sled::Tree,
    meta: sled::Tree,
}

impl Store {
    pub fn open(dir: &Path) -> Result<Self> {
        let db = sled::open(dir.join("store"))?;
        Ok(Self {
            repositories: db.open_tree("repositories")?,
            events: db.open_tree("events")?,
            emails: db.open_tree("email_notifications")?,
            pushovers: db.open_tree("pushover_notifications")?,
            meta: db.open_tree("meta")?,
            db,
        })
    }

    pub fn flush(&self) -> Result {
        self.db.flush()?;
        OK
    }

    // --- repositories ---

    pub fn save_repository(&self, repo: &Repository) -> Result {
        self.repositories
            .insert(repo.id.as_bytes(), bincode::serialize(repo)?)?;
        OK
    }

    pub fn repository(&self, id: Uuid) -> Result<Option<Repository>> {
        match self.repositories.get(id.as_bytes())? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn repository_by_location(&self, owner: &str, name: &str) -> Result<Option<Repository>> {
        Ok(self
            .repositories()?
            .into_iter()
            .find(|r| r.owner == owner && r.name == name))
    }

    pub fn repositories(&self) -> Result<Vec<Repository>> {
        let mut repos = vec![];
        for entry in self.repositories.iter() {
            let (_, bytes) = entry?;
            repos.push(bincode::deserialize(&bytes)?);
        }
        repos.sort_by_key(|r: &Repository| r.location());
        Ok(repos)
    }

    pub fn remove_repository(&self, id: Uuid) -> Result {
        self.repositories.remove(id.as_bytes())?;
        OK
    }

    // --- events ---

    pub fn record_event(&self, event: &RepositoryEvent) -> Result {
        let mut key = event.repo_id.as_bytes().to_vec();
        key.extend_from_slice(&event.timestamp.timestamp_micros().to_be_bytes());
        // tiebreaker for events landing on the same microsecond
        key.extend_from_slice(&self.db.generate_id()?.to_be_bytes());
        self.events.insert(key, bincode::serialize(event)?)?;
        OK
    }

    /// Most recent events of a repository, newest first
    pub fn events_for(&self, repo_id: Uuid, limit: usize) -> Result<Vec<RepositoryEvent>> {
        let mut events = vec![];
        for entry in self.events.scan_prefix(repo_id.as_bytes()).rev().take(limit) {
            let (_, bytes) = entry?;
            events.push(bincode::deserialize(&bytes)?);
        }
        Ok(events)
    }

    // --- notification targets ---

    pub fn save_email(&self, target: &EmailNotification) -> Result {
        self.emails
            .insert(target.id.as_bytes(), bincode::serialize(target)?)?;
        OK
    }

    pub fn email(&self, id: Uuid) -> Result<Option<EmailNotification>> {
        match self.emails.get(id.as_bytes())? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn emails(&self) -> Result<Vec<EmailNotification>> {
        let mut targets: Vec<EmailNotification> = vec![];
        for entry in self.emails.iter() {
            let (_, bytes) = entry?;
            targets.push(bincode::deserialize(&bytes)?);
        }
        targets.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(targets)
    }

    pub fn remove_email(&self, id: Uuid) -> Result {
        self.emails.remove(id.as_bytes())?;
        OK
    }

    pub fn save_pushover(&self, target: &PushoverNotification) -> Result {
        self.pushovers
            .insert(target.id.as_bytes(), bincode::serialize(target)?)?;
        OK
    }

    pub fn pushover(&self, id: Uuid) -> Result<Option<PushoverNotification>> {
        match self.pushovers.get(id.as_bytes())? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn pushovers(&self) -> Result<Vec<PushoverNotification>> {
        let mut targets: Vec<PushoverNotification> = vec![];
        for entry in self.pushovers.iter() {
            let (_, bytes) = entry?;
            targets.push(bincode::deserialize(&bytes)?);
        }
        targets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(targets)
    }

    pub fn remove_pushover(&self, id: Uuid) -> Result {
        self.pushovers.remove(id.as_bytes())?;
        OK
    }

    // --- alert preference ---

    pub fn alert_preference(&self) -> Result<AlertPreference> {
        match self.meta.get(ALERT_PREFERENCE_KEY)? {
            Some(bytes) => Ok(bincode::deserialize(&bytes)?),
            None => Ok(AlertPreference::default()),
        }
    }

    pub fn save_alert_preference(&self, pref: &AlertPreference) -> Result {
        self.meta
            .insert(ALERT_PREFERENCE_KEY, bincode::serialize(pref)?)?;
        OK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn repository_roundtrip_and_removal() {
        let (_dir, store) = temp_store();
        let repo = Repository::new("backup", "alice");
        store.save_repository(&repo).unwrap();

        assert_eq!(store.repository(repo.id).unwrap(), Some(repo.clone()));
        assert_eq!(
            store.repository_by_location("alice", "backup").unwrap(),
            Some(repo.clone())
        );
        assert_eq!(store.repository_by_location("bob", "backup").unwrap(), None);

        store.remove_repository(repo.id).unwrap();
        assert_eq!(store.repository(repo.id).unwrap(), None);
    }

    #[test]
    fn events_come_back_newest_first_per_repository() {
        let (_dir, store) = temp_store();
        let repo = Repository::new("backup", "alice");
        let other = Repository::new("backup", "bob");

        for i in 0..3 {
            let mut event = RepositoryEvent::watcher(repo.id, &format!("event {i}"));
            event.timestamp = Utc::now() + chrono::Duration::seconds(i);
            store.record_event(&event).unwrap();
        }
        store
            .record_event(&RepositoryEvent::watcher(other.id, "unrelated"))
            .unwrap();

        let events = store.events_for(repo.id, 10).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].message, "event 2");
        assert_eq!(events[2].message, "event 0");

        let limited = store.events_for(repo.id, 2).unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].message, "event 2");
    }

    #[test]
    fn notification_targets_roundtrip() {
        let (_dir, store) = temp_store();
        let email = EmailNotification {
            id: Uuid::now_v7(),
            email: "ops@example.com".into(),
        };
        store.save_email(&email).unwrap();
        assert_eq!(store.emails().unwrap(), vec![email.clone()]);
        store.remove_email(email.id).unwrap();
        assert!(store.emails().unwrap().is_empty());

        let pushover = PushoverNotification {
            id: Uuid::now_v7(),
            name: "oncall".into(),
            user: "u123".into(),
            token: "t456".into(),
        };
        store.save_pushover(&pushover).unwrap();
        assert_eq!(store.pushover(pushover.id).unwrap(), Some(pushover));
    }

    #[test]
    fn alert_preference_defaults_until_saved() {
        let (_dir, store) = temp_store();
        assert_eq!(store.alert_preference().unwrap(), AlertPreference::default());

        let pref = AlertPreference {
            enabled: true,
            interval_hours: 6,
        };
        store.save_alert_preference(&pref).unwrap();
        assert_eq!(store.alert_preference().unwrap(), pref);
    }
}
