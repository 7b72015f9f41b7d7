//! Locating and loading `archgram.toml`.
//!
//! Lookup order: the `--config` flag, `archgram.toml` then `.archgram.toml`
//! in the project, `config.toml` in the global directory
//! (`$ARCHGRAM_CONFIG_DIR`, else `~/.archgram`), and finally built-in
//! defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use archgram::Config;

/// Project-level config file names, checked in order.
const PROJECT_CONFIG_NAMES: &[&str] = &["archgram.toml", ".archgram.toml"];

/// Config file name within the global config directory.
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Environment variable overriding the global config directory.
const CONFIG_DIR_ENV: &str = "ARCHGRAM_CONFIG_DIR";

/// Where the configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given on the command line; not checked for existence.
    Explicit(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
    /// Found in the global config directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Reads the configuration this source points at.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(&self) -> Result<Config> {
        let Some(path) = self.path() else {
            return Ok(Config::default());
        };
        if matches!(self, Self::Global(_)) {
            tracing::info!("Using global config: {}", path.display());
        }
        Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
    }
}

/// Resolves the configuration source for `project_dir`.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    let global_dir = std::env::var_os(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|h| h.join(".archgram")));
    resolve_with(project_dir, explicit, global_dir.as_deref())
}

/// Resolution with the global directory passed in, so tests need no
/// environment changes.
fn resolve_with(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<&Path>,
) -> ConfigSource {
    if let Some(path) = explicit {
        return ConfigSource::Explicit(path.to_path_buf());
    }

    if let Some(found) = PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|candidate| candidate.is_file())
    {
        tracing::debug!("Found project config: {}", found.display());
        return ConfigSource::Project(found);
    }

    global_dir
        .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
        .filter(|candidate| candidate.is_file())
        .map_or(ConfigSource::Default, |found| {
            tracing::debug!("Found global config: {}", found.display());
            ConfigSource::Global(found)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Dirs {
        project: TempDir,
        global: TempDir,
    }

    impl Dirs {
        fn new(project_files: &[&str], global_files: &[&str]) -> Self {
            let dirs = Self {
                project: TempDir::new().unwrap(),
                global: TempDir::new().unwrap(),
            };
            for name in project_files {
                fs::write(dirs.project.path().join(name), "").unwrap();
            }
            for name in global_files {
                fs::write(dirs.global.path().join(name), "").unwrap();
            }
            dirs
        }

        fn resolve(&self, explicit: Option<&Path>) -> ConfigSource {
            resolve_with(self.project.path(), explicit, Some(self.global.path()))
        }
    }

    #[test]
    fn explicit_wins_without_existence_check() {
        let dirs = Dirs::new(&["archgram.toml"], &["config.toml"]);
        let explicit = Path::new("/nonexistent.toml");
        assert_eq!(
            dirs.resolve(Some(explicit)),
            ConfigSource::Explicit(explicit.to_path_buf())
        );
    }

    #[test]
    fn project_names_are_tried_in_order() {
        let both = Dirs::new(&["archgram.toml", ".archgram.toml"], &[]);
        assert_eq!(
            both.resolve(None),
            ConfigSource::Project(both.project.path().join("archgram.toml"))
        );

        let dotted = Dirs::new(&[".archgram.toml"], &[]);
        assert_eq!(
            dotted.resolve(None),
            ConfigSource::Project(dotted.project.path().join(".archgram.toml"))
        );
    }

    #[test]
    fn project_config_shadows_global() {
        let dirs = Dirs::new(&["archgram.toml"], &["config.toml"]);
        assert!(matches!(dirs.resolve(None), ConfigSource::Project(_)));
    }

    #[test]
    fn global_config_is_the_fallback() {
        let dirs = Dirs::new(&[], &["config.toml"]);
        assert_eq!(
            dirs.resolve(None),
            ConfigSource::Global(dirs.global.path().join("config.toml"))
        );
    }

    #[test]
    fn nothing_found_means_defaults() {
        let dirs = Dirs::new(&[], &[]);
        let source = dirs.resolve(None);
        assert_eq!(source, ConfigSource::Default);
        let config = source.load().unwrap();
        assert!(config.analyzer.preload_content);
    }

    #[test]
    fn load_reports_parse_errors_with_path() {
        let dirs = Dirs::new(&[], &[]);
        let path = dirs.project.path().join("archgram.toml");
        fs::write(&path, "[analyzer\n").unwrap();
        let err = ConfigSource::Project(path.clone()).load().unwrap_err();
        assert!(err.to_string().contains(&path.display().to_string()));
    }
}
