use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) offline: bool,
    #[serde(default)]
    pub(crate) no_color: bool,
    #[serde(default)]
    pub(crate) debug: bool,
    #[serde(default)]
    pub(crate) order: Option<String>,
    #[serde(default)]
    pub(crate) color: Option<String>,
    #[serde(default)]
    pub(crate) gate_in_url: Option<String>,
    #[serde(default)]
    pub(crate) gate_out_url: Option<String>,
    #[serde(default)]
    pub(crate) gate_in_file: Option<PathBuf>,
    #[serde(default)]
    pub(crate) gate_out_file: Option<PathBuf>,
    #[serde(default)]
    pub(crate) capacity_teu: Option<f64>,
    #[serde(default)]
    pub(crate) trials: Option<usize>,
}

impl Config {
    pub(crate) fn load() -> Self {
        Self::load_internal(false)
    }

    pub(crate) fn load_quiet() -> Self {
        Self::load_internal(true)
    }

    fn load_internal(quiet: bool) -> Self {
        // Try config locations in order of priority
        let config_paths = Self::get_config_paths();

        for path in config_paths {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match toml::from_str::<Config>(&content) {
                    Ok(config) => {
                        if !quiet {
                            eprintln!("Loaded config from {}", path.display());
                        }
                        return config;
                    }
                    Err(e) => {
                        if !quiet {
                            eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                        }
                    }
                }
            }
        }

        Self::default()
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/yorcast/config.toml (Linux/cross-platform)
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("yorcast").join("config.toml"));
        }

        // 2. Platform config dir (macOS Application Support)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("yorcast").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.yorcast.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".yorcast.toml"));
        }

        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_paths_not_empty() {
        let paths = Config::get_config_paths();
        assert!(!paths.is_empty());
    }

    #[test]
    fn parses_full_config() {
        let config: Config = toml::from_str(
            r#"
offline = true
order = "desc"
gate_in_url = "http://example.com/in.csv"
capacity_teu = 12000.0
trials = 500
"#,
        )
        .unwrap();
        assert!(config.offline);
        assert_eq!(config.order.as_deref(), Some("desc"));
        assert_eq!(config.capacity_teu, Some(12000.0));
        assert_eq!(config.trials, Some(500));
        assert!(config.gate_out_url.is_none());
    }

    #[test]
    fn empty_config_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert!(!config.offline);
        assert!(config.order.is_none());
    }
}
