//! `logic.toml`: formatting, module search paths and evaluation limits.
//!
//! Every section and key is optional:
//!
//! ```toml
//! [format]
//! indent = 2
//! max-width = 100
//!
//! [modules]
//! paths = ["tokens", "lib"]
//!
//! [evaluation]
//! max-call-depth = 256
//! ```

use std::path::{Path, PathBuf};

use logic_eval::{EvalOptions, DEFAULT_MAX_CALL_DEPTH};
use logic_fmt::PrintOptions;
use serde::Deserialize;

pub const CONFIG_FILE: &str = "logic.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub format: FormatConfig,
    pub modules: ModulesConfig,
    pub evaluation: EvaluationConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct FormatConfig {
    pub indent: usize,
    pub max_width: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        let options = PrintOptions::default();
        FormatConfig {
            indent: options.indent,
            max_width: options.max_width,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModulesConfig {
    /// Directories searched for imported modules, relative to the config
    /// file. The config file's own directory is always searched first.
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct EvaluationConfig {
    pub max_call_depth: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        EvaluationConfig {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

/// A loaded config and the directory its relative paths resolve against.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: Config,
    pub base: PathBuf,
}

impl Config {
    /// Read and parse a config file.
    pub fn from_file(path: &Path) -> Result<Config, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_str(&content).map_err(|e| format!("{}: {}", path.display(), e))
    }

    /// Parse a config from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Config, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE, e))
    }

    pub fn print_options(&self) -> PrintOptions {
        PrintOptions {
            indent: self.format.indent,
            max_width: self.format.max_width,
        }
    }

    pub fn eval_options(&self) -> EvalOptions {
        EvalOptions {
            max_call_depth: self.evaluation.max_call_depth,
        }
    }
}

impl Settings {
    /// The explicit `--config` file, else `logic.toml` next to `input`, else
    /// defaults.
    pub fn for_input(input: &Path, explicit: Option<&Path>) -> Result<Settings, String> {
        let input_dir = input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        if let Some(path) = explicit {
            return Ok(Settings {
                config: Config::from_file(path)?,
                base: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            });
        }

        let implicit = input_dir.join(CONFIG_FILE);
        let config = if implicit.is_file() {
            Config::from_file(&implicit)?
        } else {
            Config::default()
        };
        Ok(Settings {
            config,
            base: input_dir,
        })
    }

    /// Module search directories, in lookup order.
    pub fn module_dirs(&self) -> Vec<PathBuf> {
        std::iter::once(self.base.clone())
            .chain(self.config.modules.paths.iter().map(|p| self.base.join(p)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let toml = r#"
[format]
indent = 4
max-width = 80

[modules]
paths = ["tokens", "lib"]

[evaluation]
max-call-depth = 32
"#;
        let config = Config::from_str(toml).unwrap();
        assert_eq!(
            config.print_options(),
            PrintOptions {
                indent: 4,
                max_width: 80
            }
        );
        assert_eq!(
            config.modules.paths,
            vec![PathBuf::from("tokens"), PathBuf::from("lib")]
        );
        assert_eq!(config.eval_options().max_call_depth, 32);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let config = Config::from_str("[format]\nindent = 3\n").unwrap();
        assert_eq!(config.format.indent, 3);
        assert_eq!(config.format.max_width, 100);
        assert!(config.modules.paths.is_empty());
        assert_eq!(config.evaluation.max_call_depth, DEFAULT_MAX_CALL_DEPTH);
        assert_eq!(Config::from_str("").unwrap(), Config::default());
    }

    #[test]
    fn reject_unknown_keys() {
        let err = Config::from_str("[format]\nwidth = 80\n").unwrap_err();
        assert!(err.contains("Failed to parse logic.toml"), "Error: {}", err);
        assert!(err.contains("width"), "Error: {}", err);
    }

    #[test]
    fn module_dirs_are_relative_to_the_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[modules]\npaths = [\"tokens\"]\n",
        )
        .unwrap();
        let input = dir.path().join("main.logic");

        let settings = Settings::for_input(&input, None).unwrap();
        assert_eq!(
            settings.module_dirs(),
            vec![dir.path().to_path_buf(), dir.path().join("tokens")]
        );
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("other.toml");
        let err = Settings::for_input(&dir.path().join("main.logic"), Some(&missing)).unwrap_err();
        assert!(err.starts_with("Failed to read"), "Error: {}", err);
    }
}
