use crate::*;
use std::path::{Path, PathBuf};

/// Observes the repository hosting directory (layout `<owner>/<repo>/`) and
/// turns filesystem deltas into [`RepositoryEvent`]s. Borg leaves well-known
/// marker files around: `README` exists from `borg init` on, `index.*` files
/// move on every archive change and `lock.roster` is present while a client
/// holds the repository open.
#[derive(Clone)]
pub struct RepoWatcher {
    store: Arc<Store>,
    repos_dir: PathBuf,
}

impl RepoWatcher {
    pub fn new(store: Arc<Store>, repos_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            repos_dir: repos_dir.into(),
        }
    }

    /// Scans on the configured interval until shutdown
    pub fn spawn(store: Arc<Store>) {
        let watcher = Self::new(store, APP_CONFIG.repos_dir.clone());
        every(APP_CONFIG.watch_interval).seconds().spawn(move || {
            let watcher = watcher.clone();
            async move {
                match watcher.scan() {
                    Ok(events) if !events.is_empty() => {
                        info!(target: "watcher", "recorded {} repository event(s)", events.len())
                    }
                    Ok(_) => {}
                    Err(e) => error!(target: "watcher", "repository scan failed: {e}"),
                }
            }
        });
    }

    /// One pass over the hosting directory: registers new repositories,
    /// refreshes update/lock state and drops rows of deleted repositories.
    /// Returns the events recorded by this pass.
    pub fn scan(&self) -> Result<Vec<RepositoryEvent>> {
        if !self.repos_dir.is_dir() {
            return Err(Error::Config(format!(
                "repos dir {} not found",
                self.repos_dir.display()
            )));
        }

        let mut recorded = vec![];
        let mut seen = vec![];

        for owner_dir in subdirectories(&self.repos_dir)? {
            let owner = dir_name(&owner_dir);
            for repo_dir in subdirectories(&owner_dir)? {
                let name = dir_name(&repo_dir);
                match self.scan_repository(&repo_dir, &owner, &name, &mut recorded) {
                    Ok(Some(id)) => seen.push(id),
                    Ok(None) => {}
                    Err(e) => {
                        // one broken repository must not starve the rest of the scan
                        error!(target: "watcher", "skipping {owner}/{name}: {e}");
                    }
                }
            }
        }

        for repo in self.store.repositories()? {
            if !seen.contains(&repo.id) {
                info!(target: "watcher", "repo deleted: {}", repo.location());
                let event = RepositoryEvent::watcher(repo.id, "Repository deleted");
                self.store.record_event(&event)?;
                recorded.push(event);
                self.store.remove_repository(repo.id)?;
            }
        }

        Ok(recorded)
    }

    fn scan_repository(
        &self,
        dir: &Path,
        owner: &str,
        name: &str,
        recorded: &mut Vec<RepositoryEvent>,
    ) -> Result<Option<Uuid>> {
        let has_readme = dir.join("README").is_file();
        let locked = dir.join("lock.roster").exists();
        let latest_index = latest_index_mtime(dir)?;

        let (mut repo, just_registered) =
            match self.store.repository_by_location(owner, name)? {
                Some(repo) => (repo, false),
                None => {
                    // borg writes the README during init, a directory without
                    // one is not a repository yet
                    if !has_readme {
                        return Ok(None);
                    }
                    info!(target: "watcher", "repo created: {owner}/{name}");
                    let repo = Repository::new(name, owner);
                    let event = RepositoryEvent::watcher(repo.id, "Repository created");
                    self.store.record_event(&event)?;
                    recorded.push(event);
                    (repo, true)
                }
            };

        let mut dirty = just_registered;

        if let Some(mtime) = latest_index {
            if repo.last_update.map_or(true, |prev| mtime > prev) {
                if !just_registered {
                    info!(target: "watcher", "repo updated: {}", repo.location());
                    let event = RepositoryEvent::watcher(repo.id, "Repository updated");
                    self.store.record_event(&event)?;
                    recorded.push(event);
                }
                repo.last_update = Some(mtime);
                repo.alerted = false;
                dirty = true;
            }
        }

        if locked != repo.open {
            let message = if locked {
                "Repository open"
            } else {
                "Repository closed"
            };
            info!(target: "watcher", "{message}: {}", repo.location());
            let event = RepositoryEvent::watcher(repo.id, message);
            self.store.record_event(&event)?;
            recorded.push(event);
            repo.open = locked;
            dirty = true;
        }

        if dirty {
            self.store.save_repository(&repo)?;
        }

        Ok(Some(repo.id))
    }
}

fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = vec![];
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Newest modification time among the repository's `index.*` files
fn latest_index_mtime(dir: &Path) -> Result<Option<DateTime<Utc>>> {
    let mut latest = None;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with("index.") || !entry.path().is_file() {
            continue;
        }
        let mtime = DateTime::<Utc>::from(entry.metadata()?.modified()?);
        if latest.map_or(true, |prev| mtime > prev) {
            latest = Some(mtime);
        }
    }
    Ok(latest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture() -> (tempfile::TempDir, tempfile::TempDir, RepoWatcher, Arc<Store>) {
        let store_dir = tempfile::tempdir().unwrap();
        let repos_dir = tempfile::tempdir().unwrap();
        let store = Arc::new(Store::open(store_dir.path()).unwrap());
        let watcher = RepoWatcher::new(store.clone(), repos_dir.path());
        (store_dir, repos_dir, watcher, store)
    }

    fn init_repo(repos_dir: &Path, owner: &str, name: &str) -> PathBuf {
        let dir = repos_dir.join(owner).join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("README"), "this is a borg repository").unwrap();
        dir
    }

    #[test]
    fn registers_repositories_with_a_readme() {
        let (_s, repos, watcher, store) = fixture();
        init_repo(repos.path(), "alice", "backup");
        // a directory without the README marker is not a repository
        fs::create_dir_all(repos.path().join("alice").join("scratch")).unwrap();

        let events = watcher.scan().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "Repository created");

        let repo = store.repository_by_location("alice", "backup").unwrap().unwrap();
        assert_eq!(repo.owner, "alice");
        assert!(store.repository_by_location("alice", "scratch").unwrap().is_none());

        // nothing changed, nothing to record
        assert!(watcher.scan().unwrap().is_empty());
    }

    #[test]
    fn index_changes_refresh_last_update() {
        let (_s, repos, watcher, store) = fixture();
        let dir = init_repo(repos.path(), "alice", "backup");
        watcher.scan().unwrap();

        fs::write(dir.join("index.1"), "segments").unwrap();
        let events = watcher.scan().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "Repository updated");

        let repo = store.repository_by_location("alice", "backup").unwrap().unwrap();
        assert!(repo.last_update.is_some());
        assert!(!repo.alerted);
    }

    #[test]
    fn existing_index_at_registration_sets_last_update_silently() {
        let (_s, repos, watcher, store) = fixture();
        let dir = init_repo(repos.path(), "alice", "backup");
        fs::write(dir.join("index.7"), "segments").unwrap();

        let events = watcher.scan().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "Repository created");
        let repo = store.repository_by_location("alice", "backup").unwrap().unwrap();
        assert!(repo.last_update.is_some());
    }

    #[test]
    fn lock_roster_toggles_open_state() {
        let (_s, repos, watcher, store) = fixture();
        let dir = init_repo(repos.path(), "alice", "backup");
        watcher.scan().unwrap();

        fs::write(dir.join("lock.roster"), "{}").unwrap();
        let events = watcher.scan().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "Repository open");
        assert!(store.repository_by_location("alice", "backup").unwrap().unwrap().open);

        fs::remove_file(dir.join("lock.roster")).unwrap();
        let events = watcher.scan().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "Repository closed");
        assert!(!store.repository_by_location("alice", "backup").unwrap().unwrap().open);
    }

    #[test]
    fn removed_directories_drop_the_repository_row() {
        let (_s, repos, watcher, store) = fixture();
        let dir = init_repo(repos.path(), "alice", "backup");
        watcher.scan().unwrap();
        let repo = store.repository_by_location("alice", "backup").unwrap().unwrap();

        fs::remove_dir_all(&dir).unwrap();
        let events = watcher.scan().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "Repository deleted");
        assert!(store.repository(repo.id).unwrap().is_none());
        // events outlive the repository for the record
        assert!(!store.events_for(repo.id, 10).unwrap().is_empty());
    }

    #[test]
    fn missing_repos_dir_is_an_error() {
        let store_dir = tempfile::tempdir().unwrap();
        let store = Arc::new(Store::open(store_dir.path()).unwrap());
        let watcher = RepoWatcher::new(store, "/definitely/not/here");
        assert!(watcher.scan().is_err());
    }
}
