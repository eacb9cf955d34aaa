use crate::env::Environment;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "modcli.toml";
pub const ENV_CHANGELOG: &str = "MODCLI_CHANGELOG";
pub const ENV_GIT: &str = "MODCLI_GIT";

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub project: ProjectConfig,
    pub git: GitConfig,
    pub modules: ModulesConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: Option<String>,
    /// Changelog record, relative to the working directory.
    pub changelog: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: None,
            changelog: PathBuf::from("CHANGELOG.yml"),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GitConfig {
    pub program: String,
    pub tag_prefix: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
            tag_prefix: "v".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ModulesConfig {
    pub disabled: Vec<String>,
}

impl ModulesConfig {
    pub fn is_enabled(&self, name: &str) -> bool {
        !self.disabled.iter().any(|d| d == name)
    }
}

impl AppConfig {
    pub fn parse(data: &str) -> Result<Self> {
        toml::from_str(data).with_context(|| "parsing config")
    }

    /// Load from `explicit` if given (must exist), else `./modcli.toml`, else the
    /// user config dir, else defaults. Environment overrides apply last.
    pub fn load(explicit: Option<&Path>, env: &dyn Environment) -> Result<Self> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => discover(Path::new("."), dirs::config_dir()),
        };
        let mut cfg = match path {
            Some(p) => {
                tracing::debug!(path = %p.display(), "loading config");
                let data = fs_err::read_to_string(&p)?;
                Self::parse(&data).with_context(|| format!("in {}", p.display()))?
            }
            None => {
                tracing::debug!("no config file found, using defaults");
                Self::default()
            }
        };
        cfg.apply_env(env);
        Ok(cfg)
    }

    pub fn apply_env(&mut self, env: &dyn Environment) {
        if let Some(changelog) = env.non_empty(ENV_CHANGELOG) {
            self.project.changelog = PathBuf::from(changelog);
        }
        if let Some(git) = env.non_empty(ENV_GIT) {
            self.git.program = git;
        }
    }
}

/// `<cwd>/modcli.toml` first, then `<config_dir>/modcli/config.toml`.
fn discover(cwd: &Path, config_dir: Option<PathBuf>) -> Option<PathBuf> {
    let local = cwd.join(DEFAULT_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }
    config_dir
        .map(|d| d.join("modcli").join("config.toml"))
        .filter(|p| p.is_file())
}
