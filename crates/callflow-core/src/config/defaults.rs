//! Default configuration values.

/// Project-local configuration file name.
pub const PROJECT_CONFIG_FILE: &str = "callflow.toml";

/// Directory under the user config root holding the user-level
/// configuration.
pub const USER_CONFIG_DIR: &str = "callflow";

/// User-level configuration file name.
pub const USER_CONFIG_FILE: &str = "config.toml";

/// Env var overriding the provisioning API base URL.
pub const ENV_API_URL: &str = "CALLFLOW_API_URL";

/// Env var overriding the PBX domain.
pub const ENV_DOMAIN: &str = "CALLFLOW_DOMAIN";

/// Env var holding extra allowed API host patterns, comma separated.
pub const ENV_ALLOWED_HOSTS: &str = "CALLFLOW_ALLOWED_HOSTS";
