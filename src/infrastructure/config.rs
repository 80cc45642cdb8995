use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct NavigationConfig {
    #[serde(default)]
    pub navigation: NavigationSettings,
    #[serde(default)]
    pub access: AccessSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NavigationSettings {
    /// Delay before focusing the new container and finalizing its content
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    #[serde(default = "default_true")]
    pub loading_overlay: bool,
    #[serde(default = "default_true")]
    pub keyboard_shortcuts: bool,
}

impl NavigationSettings {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            loading_overlay: true,
            keyboard_shortcuts: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AccessSettings {
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub policies: HashMap<String, RolePolicy>,
}

impl Default for AccessSettings {
    fn default() -> Self {
        Self {
            role: default_role(),
            policies: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RolePolicy {
    #[serde(default)]
    pub denied_views: Vec<String>,
    #[serde(default)]
    pub denied_pages: Vec<String>,
}

fn default_settle_delay_ms() -> u64 {
    100
}

fn default_true() -> bool {
    true
}

fn default_role() -> String {
    "admin".to_string()
}

/// Load `config/navigation.{toml,...}` (optional) with `NAV__`-prefixed
/// environment overrides, e.g. `NAV__NAVIGATION__SETTLE_DELAY_MS=50`.
pub fn load_navigation_config() -> anyhow::Result<NavigationConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/navigation").required(false))
        .add_source(
            config::Environment::with_prefix("NAV")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn parse_navigation_config(toml: &str) -> anyhow::Result<NavigationConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    Ok(settings.try_deserialize()?)
}
