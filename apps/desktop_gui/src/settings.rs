use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::Deserialize;
use shared::domain::{BallotConfig, Candidate, CandidateId};

const SETTINGS_FILE_NAME: &str = "ballot.toml";
const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone)]
pub struct Settings {
    pub ballot: BallotConfig,
    pub assistant_base_url: String,
    pub assistant_model: String,
    pub assistant_timeout_seconds: u64,
    pub assistant_api_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ballot: BallotConfig::default(),
            assistant_base_url: assistant_client::DEFAULT_BASE_URL.to_string(),
            assistant_model: assistant_client::DEFAULT_MODEL.to_string(),
            assistant_timeout_seconds: assistant_client::DEFAULT_TIMEOUT.as_secs(),
            assistant_api_key: None,
        }
    }
}

/// Every key is optional; anything missing keeps its built-in default.
#[derive(Debug, Default, Deserialize)]
struct SettingsOverrides {
    candidates: Option<Vec<Candidate>>,
    required_candidate: Option<i64>,
    vote_limit: Option<usize>,
    assistant_base_url: Option<String>,
    assistant_model: Option<String>,
    assistant_timeout_seconds: Option<u64>,
}

impl Settings {
    fn apply(&mut self, overrides: SettingsOverrides) {
        if let Some(v) = overrides.candidates {
            self.ballot.candidates = v;
        }
        if let Some(v) = overrides.required_candidate {
            self.ballot.required_candidate = CandidateId(v);
        }
        if let Some(v) = overrides.vote_limit {
            self.ballot.vote_limit = v;
        }
        if let Some(v) = overrides.assistant_base_url {
            self.assistant_base_url = v;
        }
        if let Some(v) = overrides.assistant_model {
            self.assistant_model = v;
        }
        if let Some(v) = overrides.assistant_timeout_seconds {
            self.assistant_timeout_seconds = v.max(1);
        }
    }
}

/// Loads defaults, then the settings file, then `APP__*` environment overrides.
///
/// An explicitly named file must exist. Without one, `./ballot.toml` is used
/// when present, then `<user config dir>/ballot_booth/ballot.toml`.
pub fn load_settings(explicit_path: Option<&Path>) -> anyhow::Result<Settings> {
    let file = match explicit_path {
        Some(path) => {
            if !path.is_file() {
                bail!("settings file '{}' does not exist", path.display());
            }
            Some(path.to_path_buf())
        }
        None => default_settings_path(),
    };

    let env = config::Environment::with_prefix("APP")
        .separator("__")
        .try_parsing(true);
    let mut settings = build_settings(file.as_deref(), env)?;
    settings.assistant_api_key = resolve_api_key();
    Ok(settings)
}

fn build_settings(file: Option<&Path>, env: config::Environment) -> anyhow::Result<Settings> {
    let mut builder = config::Config::builder();
    if let Some(path) = file {
        tracing::info!(path = %path.display(), "loading ballot settings");
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let overrides: SettingsOverrides = builder
        .add_source(env)
        .build()
        .context("failed to read ballot settings")?
        .try_deserialize()
        .context("failed to parse ballot settings")?;

    let mut settings = Settings::default();
    settings.apply(overrides);
    settings
        .ballot
        .validate()
        .context("invalid ballot configuration")?;
    Ok(settings)
}

fn default_settings_path() -> Option<PathBuf> {
    let local = PathBuf::from(SETTINGS_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("ballot_booth").join(SETTINGS_FILE_NAME))
        .filter(|path| path.is_file())
}

fn resolve_api_key() -> Option<String> {
    resolve_api_key_with(|name| std::env::var(name).ok())
}

/// First non-blank credential in `API_KEY_VARS` order, trimmed.
fn resolve_api_key_with(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    let mut attempts = Vec::new();
    for name in API_KEY_VARS {
        if let Some(value) = read_non_empty_var(name, lookup(name), &mut attempts) {
            return Some(value);
        }
    }
    tracing::warn!(
        "no assistant credential found ({}); the assistant panel will report the service as unavailable",
        attempts.join(", ")
    );
    None
}

fn read_non_empty_var(
    name: &str,
    value: Option<String>,
    attempts: &mut Vec<String>,
) -> Option<String> {
    match value {
        Some(value) if value.trim().is_empty() => {
            attempts.push(format!("{name} was set but empty"));
            None
        }
        Some(value) => Some(value.trim().to_string()),
        None => {
            attempts.push(format!("{name} not set"));
            None
        }
    }
}
