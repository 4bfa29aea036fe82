//! Suite configuration loaded from environment variables.
//!
//! Precedence, lowest to highest: environment profile defaults, fixture
//! `configuration` section, explicit environment variables.

use crate::fixtures::FixtureSettings;
use crate::model::Credentials;
use crate::poller::PollConfig;
use anyhow::{bail, Context, Result};
use std::env;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Deployment the suite runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Test,
    Staging,
    Production,
}

impl Environment {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "test" => Some(Environment::Test),
            "staging" => Some(Environment::Staging),
            "production" | "prod" => Some(Environment::Production),
            _ => None,
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Environment::Test => "http://localhost:3000/api",
            Environment::Staging => "https://staging-api.example.com",
            Environment::Production => "https://api.example.com",
        }
    }

    pub fn default_request_timeout(&self) -> Duration {
        match self {
            Environment::Test => Duration::from_millis(10_000),
            Environment::Staging => Duration::from_millis(15_000),
            Environment::Production => Duration::from_millis(20_000),
        }
    }

    /// How often the HTTP client retries an idempotent request on a transport error
    pub fn default_transport_retries(&self) -> u32 {
        match self {
            Environment::Test => 3,
            Environment::Staging => 2,
            Environment::Production => 1,
        }
    }
}

/// Which values were set explicitly and must survive fixture defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Overrides {
    request_timeout: bool,
    poll_delay: bool,
    poll_max_attempts: bool,
    poll_deadline: bool,
}

#[derive(Debug, Clone)]
pub struct SuiteConfig {
    pub environment: Environment,
    pub base_url: String,
    pub credentials: Credentials,
    /// None means the built-in fixture set
    pub fixtures_path: Option<PathBuf>,
    pub request_timeout: Duration,
    pub transport_retries: u32,
    pub poll: PollConfig,
    /// Upper bound on one scenario, polls included
    pub scenario_timeout: Duration,
    overrides: Overrides,
}

impl SuiteConfig {
    pub fn new(base_url: &str) -> Self {
        let environment = Environment::Test;
        SuiteConfig {
            environment,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials: Credentials {
                username: "test@example.com".to_string(),
                password: "testPassword123".to_string(),
            },
            fixtures_path: None,
            request_timeout: environment.default_request_timeout(),
            transport_retries: environment.default_transport_retries(),
            poll: PollConfig::default(),
            scenario_timeout: Duration::from_secs(120),
            overrides: Overrides::default(),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let environment = match lookup("WALLET_ENV") {
            Some(value) => match Environment::parse(&value) {
                Some(environment) => environment,
                None => bail!("Invalid WALLET_ENV: {}", value),
            },
            None => Environment::Test,
        };

        let base_url = lookup("WALLET_API_BASE_URL")
            .unwrap_or_else(|| environment.default_base_url().to_string());
        let mut config = SuiteConfig::new(&base_url);
        config.environment = environment;
        config.request_timeout = environment.default_request_timeout();
        config.transport_retries = environment.default_transport_retries();

        if let Some(username) = lookup("WALLET_TEST_USERNAME") {
            config.credentials.username = username;
        }
        if let Some(password) = lookup("WALLET_TEST_PASSWORD") {
            config.credentials.password = password;
        }
        config.fixtures_path = lookup("WALLET_FIXTURES").map(PathBuf::from);

        if let Some(ms) = parse_int::<u64>(&lookup, "WALLET_API_TIMEOUT_MS")? {
            config.request_timeout = Duration::from_millis(ms);
            config.overrides.request_timeout = true;
        }
        if let Some(retries) = parse_int::<u32>(&lookup, "WALLET_TRANSPORT_RETRIES")? {
            config.transport_retries = retries;
        }
        if let Some(ms) = parse_int::<u64>(&lookup, "WALLET_POLL_DELAY_MS")? {
            config.poll.delay = Duration::from_millis(ms);
            config.overrides.poll_delay = true;
        }
        if let Some(attempts) = parse_int::<u32>(&lookup, "WALLET_POLL_MAX_ATTEMPTS")? {
            config.poll.max_attempts = attempts;
            config.overrides.poll_max_attempts = true;
        }
        if let Some(ms) = parse_int::<u64>(&lookup, "WALLET_POLL_DEADLINE_MS")? {
            config.poll.deadline = Duration::from_millis(ms);
            config.overrides.poll_deadline = true;
        }
        if let Some(ms) = parse_int::<u64>(&lookup, "WALLET_SCENARIO_TIMEOUT_MS")? {
            config.scenario_timeout = Duration::from_millis(ms);
        }

        config.validate()?;
        Ok(config)
    }

    /// Fill every value the environment did not set from the fixture settings
    pub fn with_fixture_settings(mut self, settings: &FixtureSettings) -> Self {
        if !self.overrides.request_timeout {
            self.request_timeout = Duration::from_millis(settings.timeouts.api_response_ms);
        }
        if !self.overrides.poll_delay {
            self.poll.delay = Duration::from_millis(settings.retry_config.retry_delay_ms);
        }
        if !self.overrides.poll_max_attempts {
            self.poll.max_attempts = settings.retry_config.max_attempts;
        }
        if !self.overrides.poll_deadline {
            self.poll.deadline = Duration::from_millis(settings.timeouts.transaction_completion_ms);
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            bail!("Base URL must be http(s): {}", self.base_url);
        }
        if self.poll.max_attempts == 0 {
            bail!("WALLET_POLL_MAX_ATTEMPTS must be at least 1");
        }
        if self.poll.deadline.is_zero() {
            bail!("WALLET_POLL_DEADLINE_MS must be positive");
        }
        Ok(())
    }
}

fn parse_int<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr<Err = ParseIntError>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("{} must be a non-negative integer, got '{}'", key, raw)),
        None => Ok(None),
    }
}
