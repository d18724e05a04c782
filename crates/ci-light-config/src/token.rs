//! Bearer token resolution

use anyhow::{anyhow, Result};
use log::debug;

/// Environment variables checked for a token, in order
pub const TOKEN_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Resolves the GitHub token from the environment
///
/// Tries `GITHUB_TOKEN`, then `GH_TOKEN`. Blank values are ignored.
#[derive(Debug, Clone)]
pub struct TokenResolver {
    token: Option<String>,
}

impl Default for TokenResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenResolver {
    /// Create a resolver reading the process environment
    pub fn new() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create a resolver using a custom variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let token = TOKEN_VARS.iter().find_map(|key| {
            let value = lookup(key)?;
            let value = value.trim();
            if value.is_empty() {
                return None;
            }
            debug!("Using token from {}", key);
            Some(value.to_string())
        });

        Self { token }
    }

    /// Get the token, or an error naming the variables to set
    pub fn get_token(&self) -> Result<String> {
        self.token.clone().ok_or_else(|| {
            anyhow!(
                "No GitHub token found. Set {} (or put it in a .env file)",
                TOKEN_VARS.join(" or ")
            )
        })
    }
}
