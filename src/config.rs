use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub backend_url: String,
    pub request_timeout: Duration,
    pub submit_delay: Duration,
    pub redirect_delay: Duration,
    pub booking_idle_ttl: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            backend_url: env::var("BACKEND_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|| "http://localhost:8000".to_string()),
            request_timeout: Duration::from_secs(env_u64("REQUEST_TIMEOUT_SECS", 10)),
            submit_delay: Duration::from_millis(env_u64("BOOKING_SUBMIT_DELAY_MS", 1500)),
            redirect_delay: Duration::from_millis(env_u64("BOOKING_REDIRECT_DELAY_MS", 3000)),
            booking_idle_ttl: Duration::from_secs(env_u64("BOOKING_IDLE_TTL_SECS", 1800)),
        }
    }

    /// Config pointing at a fixed backend, with the default workflow timings.
    pub fn with_backend(backend_url: impl Into<String>) -> Self {
        Self {
            port: 3000,
            backend_url: backend_url.into().trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(10),
            submit_delay: Duration::from_millis(1500),
            redirect_delay: Duration::from_millis(3000),
            booking_idle_ttl: Duration::from_secs(1800),
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
