use std::{env, path::PathBuf};

const CONFIG_FILE: &str = ".ci-light.toml";

/// Load config file content
///
/// Searches for the config file in:
/// 1. Current working directory as .ci-light.toml
/// 2. Home directory as .ci-light.toml
/// 3. The platform config directory as ci-light/config.toml
///
/// Returns the file content if found, None otherwise.
pub fn load_config_file() -> Option<String> {
    // Try current directory first
    if let Ok(content) = std::fs::read_to_string(CONFIG_FILE) {
        log::debug!("Loaded config from {}", CONFIG_FILE);
        return Some(content);
    }

    let candidates = [get_home_config_path(), crate::paths::app_config_path()];
    for path in candidates.into_iter().flatten() {
        if let Ok(content) = std::fs::read_to_string(&path) {
            log::debug!("Loaded config from {}", path.display());
            return Some(content);
        }
    }

    None
}

/// Get the path to the config file in the home directory
///
/// Returns ~/.ci-light.toml if HOME environment variable is set.
fn get_home_config_path() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| PathBuf::from(home).join(CONFIG_FILE))
}
