//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Project-level config file names, checked in order
const PROJECT_FILES: [&str; 2] = ["localmind.toml", ".localmind.toml"];

/// Prefix for environment overrides (`LOCALMIND_SERVER__PORT=9000`)
pub const ENV_PREFIX: &str = "LOCALMIND_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `LOCALMIND_*` environment variables (`__` separates sections)
    /// 2. Legacy `OLLAMA_HOST` / `BRAVE_API_KEY` environment variables
    /// 3. Explicit config path (if provided)
    /// 4. Project root: `./localmind.toml` or `./.localmind.toml`
    /// 5. Global: `$XDG_CONFIG_HOME/localmind/config.toml`
    /// 6. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(project_path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&project_path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        Self::with_env(figment).extract().map_err(Box::new)
    }

    /// Defaults plus environment overrides, no files (for --no-config)
    pub fn load_without_files() -> Result<FileConfig, Box<figment::Error>> {
        let figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));
        Self::with_env(figment).extract().map_err(Box::new)
    }

    /// Only default configuration
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    fn with_env(figment: Figment) -> Figment {
        figment
            .merge(
                Env::raw()
                    .only(&["OLLAMA_HOST"])
                    .map(|_| "inference.host".into()),
            )
            .merge(
                Env::raw()
                    .only(&["BRAVE_API_KEY"])
                    .map(|_| "search.api_key".into()),
            )
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the global config file path
    ///
    /// Returns `$XDG_CONFIG_HOME/localmind/config.toml` if set,
    /// otherwise the platform config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("localmind").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(explicit: Option<&Path>) {
        println!("Configuration sources (in priority order):");

        println!("  [ENV  ] {ENV_PREFIX}* (e.g. {ENV_PREFIX}SERVER__PORT), OLLAMA_HOST, BRAVE_API_KEY");

        if let Some(path) = explicit {
            let marker = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{marker:<5}] Explicit: {}", path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./localmind.toml or ./.localmind.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use std::io::Write;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.inference.host, "http://localhost:11434");
        assert!(config.orchestrator.model_analysis);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("localmind"));
    }

    #[test]
    fn test_project_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            let xdg_dir = jail.directory().display().to_string();
            jail.set_env("XDG_CONFIG_HOME", xdg_dir);
            jail.create_file(
                "localmind.toml",
                r#"
[server]
port = 9100

[agents.specialist]
model = "llama3.2:3b"
"#,
            )?;

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.server.port, 9100);
            assert_eq!(config.server.host, "0.0.0.0");
            assert_eq!(config.agents.specialist.model.as_deref(), Some("llama3.2:3b"));
            Ok(())
        });
    }

    #[test]
    fn test_hidden_project_file_is_found() {
        Jail::expect_with(|jail| {
            let xdg_dir = jail.directory().display().to_string();
            jail.set_env("XDG_CONFIG_HOME", xdg_dir);
            jail.create_file(".localmind.toml", "[search]\ncount = 3\n")?;

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.search.count, 3);
            Ok(())
        });
    }

    #[test]
    fn test_global_then_project_then_explicit() {
        Jail::expect_with(|jail| {
            let xdg_dir = jail.directory().display().to_string();
            jail.set_env("XDG_CONFIG_HOME", xdg_dir);
            std::fs::create_dir_all(jail.directory().join("localmind"))
                .map_err(|e| e.to_string())?;
            jail.create_file(
                "localmind/config.toml",
                "[server]\nport = 7000\nhost = \"10.0.0.1\"\n[search]\ncount = 9\n",
            )?;
            jail.create_file("localmind.toml", "[server]\nport = 7100\n")?;
            jail.create_file("custom.toml", "[search]\ncount = 2\n")?;

            let config = ConfigLoader::load(Some(Path::new("custom.toml"))).map_err(|e| *e)?;
            assert_eq!(config.server.host, "10.0.0.1");
            assert_eq!(config.server.port, 7100);
            assert_eq!(config.search.count, 2);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_files() {
        Jail::expect_with(|jail| {
            let xdg_dir = jail.directory().display().to_string();
            jail.set_env("XDG_CONFIG_HOME", xdg_dir);
            jail.create_file("localmind.toml", "[server]\nport = 9100\n")?;
            jail.set_env("LOCALMIND_SERVER__PORT", "9200");
            jail.set_env("LOCALMIND_ORCHESTRATOR__MODEL_ANALYSIS", "false");

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.server.port, 9200);
            assert!(!config.orchestrator.model_analysis);
            Ok(())
        });
    }

    #[test]
    fn test_legacy_env_variables() {
        Jail::expect_with(|jail| {
            let xdg_dir = jail.directory().display().to_string();
            jail.set_env("XDG_CONFIG_HOME", xdg_dir);
            jail.set_env("OLLAMA_HOST", "http://gpu-box:11434");
            jail.set_env("BRAVE_API_KEY", "brave-test-key");

            let config = ConfigLoader::load_without_files().map_err(|e| *e)?;
            assert_eq!(config.inference.host, "http://gpu-box:11434");
            assert_eq!(config.search.api_key(), Some("brave-test-key"));
            Ok(())
        });
    }

    #[test]
    fn test_prefixed_env_beats_legacy_env() {
        Jail::expect_with(|jail| {
            let xdg_dir = jail.directory().display().to_string();
            jail.set_env("XDG_CONFIG_HOME", xdg_dir);
            jail.set_env("OLLAMA_HOST", "http://legacy:11434");
            jail.set_env("LOCALMIND_INFERENCE__HOST", "http://preferred:11434");

            let config = ConfigLoader::load_without_files().map_err(|e| *e)?;
            assert_eq!(config.inference.host, "http://preferred:11434");
            Ok(())
        });
    }

    #[test]
    fn test_explicit_path_from_tempfile() {
        Jail::expect_with(|jail| {
            let xdg_dir = jail.directory().display().to_string();
            jail.set_env("XDG_CONFIG_HOME", xdg_dir);
            let mut file = tempfile::NamedTempFile::new().map_err(|e| e.to_string())?;
            writeln!(file, "[logging]\njson = true\nlevel = \"debug\"")
                .map_err(|e| e.to_string())?;

            let config = ConfigLoader::load(Some(file.path())).map_err(|e| *e)?;
            assert!(config.logging.json);
            assert_eq!(config.logging.level.as_deref(), Some("debug"));
            Ok(())
        });
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        Jail::expect_with(|jail| {
            let xdg_dir = jail.directory().display().to_string();
            jail.set_env("XDG_CONFIG_HOME", xdg_dir);
            jail.create_file("localmind.toml", "[server]\nport = \"not a number\"\n")?;

            assert!(ConfigLoader::load(None).is_err());
            Ok(())
        });
    }
}
