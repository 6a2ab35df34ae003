use crate::*;
use std::path::PathBuf;

pub static ENV_PORT: &str = "PORT";
pub static ENV_REPOS_DIR: &str = "REPOS_DIR";
pub static ENV_DATA_DIR: &str = "DATA_DIR";
pub static ENV_WATCH_INTERVAL: &str = "WATCH_INTERVAL";
pub static ENV_ALERT_SWEEP_INTERVAL: &str = "ALERT_SWEEP_INTERVAL";
pub static ENV_PUSHOVER_API_URL: &str = "PUSHOVER_API_URL";
pub static ENV_PAGERDUTY_API_URL: &str = "PAGERDUTY_API_URL";
pub static ENV_PAGERDUTY_ROUTING_KEY: &str = "PAGERDUTY_ROUTING_KEY";

pub static CONFIG_FILE: &str = "borgden.toml";

static DEFAULT_REPOS_DIR: &str = "/repos";
static DEFAULT_WATCH_INTERVAL: u32 = 30;
static DEFAULT_ALERT_SWEEP_INTERVAL: u32 = 300;
static DEFAULT_PUSHOVER_API_URL: &str = "https://api.pushover.net";
static DEFAULT_PAGERDUTY_API_URL: &str = "https://events.pagerduty.com";

state!(APP_CONFIG: AppConfig = { AppConfig::load()? });

/// Application configuration: `borgden.toml` values layered under env vars
#[derive(Debug)]
pub struct AppConfig {
    pub name: &'static str,
    pub port: u16,
    pub repos_dir: PathBuf,
    pub data_dir: PathBuf,
    pub watch_interval: u32,
    pub alert_sweep_interval: u32,
    pub pushover_api_url: String,
    pub pagerduty_api_url: String,
    pub pagerduty_routing_key: Option<String>,
}

/// Optional values read from [`CONFIG_FILE`]
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    port: Option<u16>,
    repos_dir: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    watch_interval: Option<u32>,
    alert_sweep_interval: Option<u32>,
    pushover_api_url: Option<String>,
    pagerduty_api_url: Option<String>,
    pagerduty_routing_key: Option<String>,
}

impl FileConfig {
    fn read() -> Result<Self> {
        if !std::path::Path::new(CONFIG_FILE).exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(CONFIG_FILE)?;
        Ok(toml::from_str(&raw)?)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            info!(".env not used: {e}");
        }
        let file = FileConfig::read()?;

        let port = match env::var(ENV_PORT) {
            Ok(v) => v
                .parse()
                .map_err(|_| Error::Config(format!("invalid {ENV_PORT}: {v}")))?,
            Err(_) => file.port.unwrap_or(80),
        };

        let repos_dir = env::var(ENV_REPOS_DIR)
            .map(PathBuf::from)
            .ok()
            .or(file.repos_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPOS_DIR));

        let data_dir = match env::var(ENV_DATA_DIR).map(PathBuf::from).ok().or(file.data_dir) {
            Some(dir) => dir,
            None => {
                let dirs = directories::ProjectDirs::from("", "", "borgden")
                    .ok_or_else(|| Error::Config("no home directory for data dir".into()))?;
                dirs.data_dir().to_path_buf()
            }
        };
        std::fs::create_dir_all(&data_dir)?;

        let watch_interval = parse_interval(ENV_WATCH_INTERVAL)?
            .or(file.watch_interval)
            .unwrap_or(DEFAULT_WATCH_INTERVAL);
        let alert_sweep_interval = parse_interval(ENV_ALERT_SWEEP_INTERVAL)?
            .or(file.alert_sweep_interval)
            .unwrap_or(DEFAULT_ALERT_SWEEP_INTERVAL);

        Ok(Self {
            name: "borgden",
            port,
            repos_dir,
            data_dir,
            watch_interval,
            alert_sweep_interval,
            pushover_api_url: env::var(ENV_PUSHOVER_API_URL)
                .ok()
                .or(file.pushover_api_url)
                .unwrap_or_else(|| DEFAULT_PUSHOVER_API_URL.to_owned()),
            pagerduty_api_url: env::var(ENV_PAGERDUTY_API_URL)
                .ok()
                .or(file.pagerduty_api_url)
                .unwrap_or_else(|| DEFAULT_PAGERDUTY_API_URL.to_owned()),
            pagerduty_routing_key: env::var(ENV_PAGERDUTY_ROUTING_KEY)
                .ok()
                .or(file.pagerduty_routing_key),
        })
    }
}

fn parse_interval(var: &'static str) -> Result<Option<u32>> {
    match env::var(var) {
        Ok(v) => v
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("invalid {var}: {v}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_config_parses_partial_tables() {
        let parsed: FileConfig =
            toml::from_str("port = 8080\nrepos_dir = \"/srv/repos\"").unwrap();
        assert_eq!(parsed.port, Some(8080));
        assert_eq!(parsed.repos_dir, Some(PathBuf::from("/srv/repos")));
        assert_eq!(parsed.watch_interval, None);
    }
}
