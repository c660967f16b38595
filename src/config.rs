//! Configuration for mediacat.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variable MEDIACAT_DATA_DIR
//! 2. Config file (.mediacat/config.yaml)
//! 3. Defaults (data files relative to the working directory)
//!
//! Config file discovery:
//! - Searches current directory and parents for .mediacat/config.yaml
//! - `data_dir` is relative to the directory containing .mediacat/

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

pub const DEFAULT_PROMPT: &str = "Enter command: ";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub shell: Option<ShellConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Where relative save/restore file names land (relative to project root)
    pub data_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShellConfig {
    pub prompt: Option<String>,
    /// Save file restored before the first prompt
    pub restore_on_start: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Base directory for relative data file names
    pub data_dir: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Shell settings
    pub shell: ShellSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellSettings {
    pub prompt: String,
    pub restore_on_start: Option<PathBuf>,
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            restore_on_start: None,
        }
    }
}

/// Resolve a file name typed at the shell against a data directory
pub fn data_path(data_dir: &Path, file_name: &str) -> PathBuf {
    let path = Path::new(file_name);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        data_dir.join(path)
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".mediacat").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's parent
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Combine a parsed config file (if any) with the environment override
fn resolve(
    config_path: Option<&Path>,
    config: Option<ConfigFile>,
    env_data_dir: Option<String>,
) -> ResolvedConfig {
    let (data_dir, shell) = match (config_path, config) {
        (Some(config_path), Some(config)) => {
            // Project root is the directory that contains .mediacat/
            let base_dir = config_path
                .parent()
                .and_then(Path::parent)
                .unwrap_or(Path::new("."));

            let data_dir = match (env_data_dir, &config.paths.data_dir) {
                (Some(env), _) => PathBuf::from(env),
                (None, Some(dir)) => resolve_path(base_dir, dir),
                (None, None) => PathBuf::from("."),
            };

            let shell = config
                .shell
                .map(|s| ShellSettings {
                    prompt: s.prompt.unwrap_or_else(|| DEFAULT_PROMPT.to_string()),
                    restore_on_start: s
                        .restore_on_start
                        .map(|file| data_path(&data_dir, &file)),
                })
                .unwrap_or_default();

            (data_dir, shell)
        }
        _ => {
            let data_dir = env_data_dir
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));

            (data_dir, ShellSettings::default())
        }
    };

    ResolvedConfig {
        data_dir,
        config_file: config_path.map(Path::to_path_buf),
        shell,
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let config_file = find_config_file();
    let parsed = match &config_file {
        Some(path) => Some(load_config_file(path)?),
        None => None,
    };

    Ok(resolve(
        config_file.as_deref(),
        parsed,
        std::env::var("MEDIACAT_DATA_DIR").ok(),
    ))
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}
