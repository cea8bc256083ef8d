//! Server configuration from the environment.

use std::net::SocketAddr;

pub const DEFAULT_ADDR: &str = "0.0.0.0:3030";
pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:5174";
/// Submissions accepted per client and form within an hour.
pub const DEFAULT_SUBMISSION_RATE_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Base URL of the frontend that renders published forms.
    pub public_url: String,
    pub submission_rate_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3030)),
            public_url: DEFAULT_PUBLIC_URL.to_string(),
            submission_rate_limit: DEFAULT_SUBMISSION_RATE_LIMIT,
        }
    }
}

impl ServerConfig {
    /// Read `FORMCRAFT_ADDR`, `FORMCRAFT_PUBLIC_URL` and
    /// `FORMCRAFT_SUBMISSION_RATE_LIMIT`.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let addr = lookup("FORMCRAFT_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr
            .parse()
            .map_err(|e| format!("Invalid FORMCRAFT_ADDR '{}': {}", addr, e))?;
        let public_url = lookup("FORMCRAFT_PUBLIC_URL")
            .unwrap_or_else(|| DEFAULT_PUBLIC_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let submission_rate_limit = match lookup("FORMCRAFT_SUBMISSION_RATE_LIMIT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| format!("Invalid FORMCRAFT_SUBMISSION_RATE_LIMIT '{}': {}", raw, e))?,
            None => DEFAULT_SUBMISSION_RATE_LIMIT,
        };
        Ok(Self {
            addr,
            public_url,
            submission_rate_limit,
        })
    }

    /// Where a published form with `slug` is viewed.
    pub fn public_form_url(&self, slug: &str) -> String {
        format!("{}/forms/{}", self.public_url, slug)
    }
}
