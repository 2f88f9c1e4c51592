use actix_web::cookie::Key;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_APP_NAME: &str = "Health Check";
const MIN_SESSION_KEY_LEN: usize = 64;

/// Runtime configuration, read from the environment (and `.env` if present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub app_name: String,
    pub session_key: Option<String>,
    pub seed_demo: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                log::warn!("Failed to load .env file: {e}");
            }
        }

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set".to_string())?;
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let app_name = std::env::var("APP_NAME").unwrap_or_else(|_| DEFAULT_APP_NAME.to_string());
        let session_key = std::env::var("SESSION_KEY").ok();
        let seed_demo = std::env::var("SEED_DEMO")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        Ok(Self { database_url, bind_addr, app_name, session_key, seed_demo })
    }

    /// Cookie signing key. Falls back to a random key, which logs everyone
    /// out on restart.
    pub fn cookie_key(&self) -> Key {
        match &self.session_key {
            Some(val) if val.len() >= MIN_SESSION_KEY_LEN => {
                log::info!("Using SESSION_KEY from environment");
                Key::from(val.as_bytes())
            }
            Some(val) => {
                log::warn!(
                    "SESSION_KEY too short ({} bytes, need {}+), generating random key",
                    val.len(),
                    MIN_SESSION_KEY_LEN
                );
                Key::generate()
            }
            None => {
                log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
                Key::generate()
            }
        }
    }
}

/// Application-wide values handlers need at render time.
#[derive(Debug, Clone)]
pub struct SiteInfo {
    pub app_name: String,
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
