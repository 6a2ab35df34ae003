use crate::*;

/// Pushover sender, <https://pushover.net/api>
pub struct Pushover<'a> {
    user: &'a str,
    token: &'a str,
    base_uri: &'a str,
}

impl<'a> Pushover<'a> {
    pub fn new(target: &'a PushoverNotification, base_uri: &'a str) -> Self {
        Self {
            user: &target.user,
            token: &target.token,
            base_uri,
        }
    }

    pub async fn push(&self, client: &reqwest::Client, message: &str) -> Result {
        debug!(target: "alerts", "send pushover notification: user={}", self.user);
        let url = format!("{}/1/messages.json", self.base_uri);
        let params = [
            ("user", self.user),
            ("token", self.token),
            ("message", message),
        ];
        client
            .post(&url)
            .form(&params)
            .send()
            .await?
            .error_for_status()?;
        OK
    }
}

/// PagerDuty Events v2 sender, <https://developer.pagerduty.com/docs/events-api-v2/overview/>
pub struct PagerDuty {
    routing_key: String,
    base_uri: String,
}

impl PagerDuty {
    pub fn new(routing_key: String, base_uri: String) -> Self {
        Self {
            routing_key,
            base_uri,
        }
    }

    pub async fn trigger(&self, client: &reqwest::Client, summary: &str) -> Result {
        debug!(target: "alerts", "send PagerDuty notification: summary={summary}");
        let url = format!("{}/v2/enqueue", self.base_uri);
        let payload = json!({
            "routing_key": self.routing_key,
            "event_action": "trigger",
            "payload": {
                "summary": summary,
                "source": "borgden",
                "severity": "info",
            }
        });
        client
            .post(&url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;
        OK
    }
}

/// Periodic staleness check: repositories without updates beyond the
/// configured interval trigger one alert per target, then stay quiet until
/// they update again.
pub struct AlertSweep {
    store: Arc<Store>,
    client: reqwest::Client,
    pushover_api_url: String,
    pagerduty: Option<PagerDuty>,
}

impl AlertSweep {
    pub fn new(store: Arc<Store>, pushover_api_url: String, pagerduty: Option<PagerDuty>) -> Self {
        Self {
            store,
            client: reqwest::Client::new(),
            pushover_api_url,
            pagerduty,
        }
    }

    /// Sweeps on the configured interval until shutdown
    pub fn spawn(store: Arc<Store>) {
        let pagerduty = APP_CONFIG.pagerduty_routing_key.clone().map(|key| {
            PagerDuty::new(key, APP_CONFIG.pagerduty_api_url.clone())
        });
        let sweep = Arc::new(Self::new(
            store,
            APP_CONFIG.pushover_api_url.clone(),
            pagerduty,
        ));
        every(APP_CONFIG.alert_sweep_interval).seconds().spawn(move || {
            let sweep = sweep.clone();
            async move {
                match sweep.sweep().await {
                    Ok(count) if count > 0 => {
                        info!(target: "alerts", "alerted about {count} stale repository(-ies)")
                    }
                    Ok(_) => {}
                    Err(e) => error!(target: "alerts", "alert sweep failed: {e}"),
                }
            }
        });
    }

    /// Returns how many repositories were alerted about
    pub async fn sweep(&self) -> Result<usize> {
        let pref = self.store.alert_preference()?;
        if !pref.enabled {
            return Ok(0);
        }
        let stale = stale_repositories(self.store.repositories()?, &pref, Utc::now());
        if stale.is_empty() {
            return Ok(0);
        }

        let pushovers = self.store.pushovers()?;
        let emails = self.store.emails()?;
        let mut alerted = 0;

        for mut repo in stale {
            let message = format!(
                "Repository {} had no update for over {} hours",
                repo.location(),
                pref.interval_hours
            );
            for target in &pushovers {
                if let Err(e) = Pushover::new(target, &self.pushover_api_url)
                    .push(&self.client, &message)
                    .await
                {
                    error!(target: "alerts", "pushover {} failed: {e}", target.name);
                }
            }
            for target in &emails {
                // SMTP transport is out of scope, targets are surfaced in logs
                info!(target: "alerts", "email alert for {}: {message}", target.email);
            }
            if let Some(pagerduty) = &self.pagerduty {
                if let Err(e) = pagerduty.trigger(&self.client, &message).await {
                    error!(target: "alerts", "PagerDuty trigger failed: {e}");
                }
            }

            self.store
                .record_event(&RepositoryEvent::alert(repo.id, &message))?;
            repo.alerted = true;
            self.store.save_repository(&repo)?;
            alerted += 1;
        }

        Ok(alerted)
    }
}

/// Repositories past the update interval that were not alerted about yet
pub fn stale_repositories(
    repos: Vec<Repository>,
    pref: &AlertPreference,
    now: DateTime<Utc>,
) -> Vec<Repository> {
    repos
        .into_iter()
        .filter(|repo| !repo.alerted && repo.is_stale(pref.interval_hours, now))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stale_repo(hours_ago: i64) -> Repository {
        let mut repo = Repository::new("backup", "alice");
        repo.last_update = Some(Utc::now() - chrono::Duration::hours(hours_ago));
        repo
    }

    #[test]
    fn stale_selection_skips_fresh_alerted_and_never_updated() {
        let pref = AlertPreference {
            enabled: true,
            interval_hours: 24,
        };
        let fresh = stale_repo(1);
        let stale = stale_repo(48);
        let mut already_alerted = stale_repo(48);
        already_alerted.alerted = true;
        let never_updated = Repository::new("empty", "bob");

        let selected = stale_repositories(
            vec![fresh, stale.clone(), already_alerted, never_updated],
            &pref,
            Utc::now(),
        );
        assert_eq!(selected, vec![stale]);
    }

    #[tokio::test]
    async fn sweep_does_nothing_while_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(Store::open(dir.path()).unwrap());
        store.save_repository(&stale_repo(999)).unwrap();

        let sweep = AlertSweep::new(store, "http://localhost:1".into(), None);
        assert_eq!(sweep.sweep().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn sweep_records_the_alert_and_marks_the_repository() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(Store::open(dir.path()).unwrap());
        let repo = stale_repo(48);
        store.save_repository(&repo).unwrap();
        store
            .save_alert_preference(&AlertPreference {
                enabled: true,
                interval_hours: 24,
            })
            .unwrap();
        // only an email target: the sweep stays offline
        store
            .save_email(&EmailNotification {
                id: Uuid::now_v7(),
                email: "ops@example.com".into(),
            })
            .unwrap();

        let sweep = AlertSweep::new(store.clone(), "http://localhost:1".into(), None);
        assert_eq!(sweep.sweep().await.unwrap(), 1);

        let alerted = store.repository(repo.id).unwrap().unwrap();
        assert!(alerted.alerted);
        let events = store.events_for(repo.id, 10).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Alert);

        // no repeated alert on the next sweep
        assert_eq!(sweep.sweep().await.unwrap(), 0);
    }
}
