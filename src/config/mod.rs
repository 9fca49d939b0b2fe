use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub openai: OpenAiConfig,
    pub slack: SlackConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Comma separated list of allowed browser origins
    #[serde(default = "default_cors_origins")]
    pub cors_origins: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_expiry_hours")]
    pub expiry_hours: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlackConfig {
    #[serde(default)]
    pub bot_token: String,
    #[serde(default)]
    pub signing_secret: String,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default = "default_slack_api_base_url")]
    pub api_base_url: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> String {
    "http://localhost:3000".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_expiry_hours() -> u64 {
    24
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_slack_api_base_url() -> String {
    "https://slack.com/api".to_string()
}

const DEFAULT_JWT_SECRET: &str = "development-secret-change-in-production";

/// Flat variable names used by existing deployments, mapped onto nested keys.
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("DATABASE_URL", "database.url"),
    ("OPENAI_API_KEY", "openai.api_key"),
    ("SLACK_BOT_TOKEN", "slack.bot_token"),
    ("SLACK_SIGNING_SECRET", "slack.signing_secret"),
    ("SLACK_CHANNEL_ID", "slack.channel_id"),
    ("JWT_SECRET", "jwt.secret"),
    ("PORT", "server.port"),
];

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder()
            .add_source(config::Environment::default().separator("__"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("server.cors_origins", "http://localhost:3000")?
            .set_default("database.url", "")?
            .set_default("database.max_connections", 10)?
            .set_default("jwt.secret", DEFAULT_JWT_SECRET)?
            .set_default("jwt.expiry_hours", 24)?
            .set_default("openai.api_key", "")?
            .set_default("slack.bot_token", "")?
            .set_default("slack.signing_secret", "")?
            .set_default("slack.channel_id", "")?;

        for (var, key) in LEGACY_ENV_KEYS {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Settings the API server cannot run without.
    pub fn ensure_api_requirements(&self) -> anyhow::Result<()> {
        let missing: Vec<&str> = [
            ("DATABASE_URL", self.database.url.as_str()),
            ("OPENAI_API_KEY", self.openai.api_key.as_str()),
            ("SLACK_BOT_TOKEN", self.slack.bot_token.as_str()),
            ("SLACK_CHANNEL_ID", self.slack.channel_id.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if self.uses_default_jwt_secret() {
            tracing::warn!("JWT_SECRET not set; signing tokens with the built-in development secret");
        }

        if !missing.is_empty() {
            anyhow::bail!(
                "Missing required environment variables: {}",
                missing.join(", ")
            );
        }
        Ok(())
    }

    pub fn uses_default_jwt_secret(&self) -> bool {
        self.jwt.secret == DEFAULT_JWT_SECRET
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.server
            .cors_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect()
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: 0,
                cors_origins: default_cors_origins(),
            },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 1,
            },
            jwt: JwtConfig {
                secret: "test-secret".to_string(),
                expiry_hours: 1,
            },
            openai: OpenAiConfig {
                api_key: "sk-test".to_string(),
                base_url: default_openai_base_url(),
                model: default_model(),
                temperature: default_temperature(),
                max_tokens: default_max_tokens(),
            },
            slack: SlackConfig {
                bot_token: String::new(),
                signing_secret: "8f742231b10e8888abcd99yyyzzz85a5".to_string(),
                channel_id: String::new(),
                api_base_url: default_slack_api_base_url(),
            },
        }
    }
}
