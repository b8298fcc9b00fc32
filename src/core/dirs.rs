use std::path::PathBuf;

const APP_DIR: &str = "git-taskflow";

/// Environment variable overriding where the daily operation logs are written
pub const LOGS_DIR_ENV: &str = "GIT_TASKFLOW_LOGS_DIR";

pub fn get_config_directory() -> PathBuf {
    let base = match std::env::consts::OS {
        "linux" | "freebsd" | "netbsd" | "openbsd" => std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dirs::home_dir().unwrap_or_default().join(".config")),
        "macos" => dirs::home_dir()
            .unwrap_or_default()
            .join("Library/Application Support"),
        _ => dirs::config_dir().unwrap_or_default(),
    };

    base.join(APP_DIR)
}

pub fn get_default_config_file() -> PathBuf {
    get_config_directory().join("config.json")
}

pub fn get_logs_directory() -> PathBuf {
    if let Ok(dir) = std::env::var(LOGS_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }

    let base = match std::env::consts::OS {
        "linux" | "freebsd" | "netbsd" | "openbsd" => std::env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dirs::home_dir().unwrap_or_default().join(".local/share")),
        "macos" => dirs::home_dir()
            .unwrap_or_default()
            .join("Library/Application Support"),
        _ => dirs::data_local_dir().unwrap_or_default(),
    };

    base.join(APP_DIR).join("logs")
}
