//! Generation options and `rktbind.toml` loading.
//!
//! ```toml
//! [generate]
//! exclude = ["/usr/include/"]
//! print_source_path = true
//! predefined = ["_size_t", "_uintptr_t", "_ssize_t"]
//! preamble = "ffi/preamble.rkt"
//! binders = "ffi/binders.rkt"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BindError, Result};

/// Name of the configuration file searched for by [`GenConfig::find_and_load`].
pub const CONFIG_FILE: &str = "rktbind.toml";

/// Module language line, written first unless a binders file supplies it.
pub const MODULE_LANG: &str = "#lang racket/base\n\n";

/// Fixed block written once before any definition.
pub const DEFAULT_PREAMBLE: &str = r#";; -----------------------------------------------------------------------------
;; WARNING: auto-generated code - Changes will be lost!
;; -----------------------------------------------------------------------------

(require ffi/unsafe)
(define _size_t _uint64)
(define _uintptr_t _uint64)
"#;

/// Names bound by [`DEFAULT_PREAMBLE`].
pub const DEFAULT_PREDEFINED: [&str; 2] = ["_size_t", "_uintptr_t"];

/// Options for one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenConfig {
    /// Declarations whose location contains any of these are skipped.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Write a `;; file:line` comment above each definition.
    #[serde(default)]
    pub print_source_path: bool,
    /// Names treated as always defined.
    #[serde(default = "default_predefined")]
    pub predefined: Vec<String>,
    /// File replacing [`DEFAULT_PREAMBLE`], relative to the config file.
    /// Must not carry a `#lang` line.
    #[serde(default)]
    pub preamble: Option<PathBuf>,
    /// File written verbatim before the preamble, relative to the config file.
    /// Replaces [`MODULE_LANG`], so it must start with its own `#lang` line.
    #[serde(default)]
    pub binders: Option<PathBuf>,
}

fn default_predefined() -> Vec<String> {
    DEFAULT_PREDEFINED.iter().map(|s| s.to_string()).collect()
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            print_source_path: false,
            predefined: default_predefined(),
            preamble: None,
            binders: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    generate: GenConfig,
}

impl GenConfig {
    /// Parse the `[generate]` section of a `rktbind.toml` string.
    pub fn parse(input: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(input)?;
        let config = file.generate;
        if config.exclude.iter().any(String::is_empty) {
            return Err(BindError::InvalidConfig {
                detail: "exclude patterns must not be empty".to_string(),
            });
        }
        Ok(config)
    }

    /// Parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Search upward from `start_dir` for `rktbind.toml`, returning the
    /// configuration and the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                return Ok(Some((Self::load(&candidate)?, dir)));
            }
            if !dir.pop() {
                return Ok(None);
            }
        }
    }

    /// Text written before the first definition: the binders file or
    /// [`MODULE_LANG`], then the preamble file or [`DEFAULT_PREAMBLE`].
    /// Relative paths resolve against `base_dir`.
    pub fn preamble_text(&self, base_dir: &Path) -> Result<String> {
        let mut text = match &self.binders {
            Some(binders) => std::fs::read_to_string(base_dir.join(binders))?,
            None => MODULE_LANG.to_string(),
        };
        match &self.preamble {
            Some(preamble) => text.push_str(&std::fs::read_to_string(base_dir.join(preamble))?),
            None => text.push_str(DEFAULT_PREAMBLE),
        }
        Ok(text)
    }

    /// Template written by `rktbind init`.
    pub fn template() -> String {
        r#"[generate]
# Skip declarations whose source location contains any of these.
exclude = ["/usr/include/", "/usr/lib/"]
# Annotate each definition with its file:line.
print_source_path = false
# Names bound by the preamble.
predefined = ["_size_t", "_uintptr_t"]
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let config = GenConfig::parse(
            r#"
[generate]
exclude = ["/usr/include/", "vendor/"]
print_source_path = true
predefined = ["_size_t", "_ssize_t"]
preamble = "pre.rkt"
binders = "binders.rkt"
"#,
        )
        .unwrap();
        assert_eq!(config.exclude, ["/usr/include/", "vendor/"]);
        assert!(config.print_source_path);
        assert_eq!(config.predefined, ["_size_t", "_ssize_t"]);
        assert_eq!(config.preamble.as_deref(), Some(Path::new("pre.rkt")));
        assert_eq!(config.binders.as_deref(), Some(Path::new("binders.rkt")));
    }

    #[test]
    fn missing_section_uses_defaults() {
        let config = GenConfig::parse("").unwrap();
        assert_eq!(config, GenConfig::default());
        assert_eq!(config.predefined, ["_size_t", "_uintptr_t"]);
    }

    #[test]
    fn empty_exclude_pattern_is_rejected() {
        let err = GenConfig::parse("[generate]\nexclude = [\"\"]\n").unwrap_err();
        assert!(matches!(err, BindError::InvalidConfig { .. }));
    }

    #[test]
    fn reject_invalid_toml() {
        assert!(matches!(
            GenConfig::parse("[generate\nexclude = "),
            Err(BindError::Toml(_))
        ));
    }

    #[test]
    fn template_is_valid() {
        let config = GenConfig::parse(&GenConfig::template()).unwrap();
        assert_eq!(config.exclude.len(), 2);
        assert!(!config.print_source_path);
    }

    #[test]
    fn default_preamble_binds_predefined_names() {
        assert!(!DEFAULT_PREAMBLE.contains("#lang"));
        for name in DEFAULT_PREDEFINED {
            assert!(DEFAULT_PREAMBLE.contains(&format!("(define {name} ")));
        }
    }

    #[test]
    fn preamble_text_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("binders.rkt"), ";; binders\n").unwrap();
        std::fs::write(dir.path().join("pre.rkt"), ";; custom preamble\n").unwrap();
        let config = GenConfig {
            preamble: Some(PathBuf::from("pre.rkt")),
            binders: Some(PathBuf::from("binders.rkt")),
            ..Default::default()
        };
        let text = config.preamble_text(dir.path()).unwrap();
        assert_eq!(text, ";; binders\n;; custom preamble\n");
    }

    #[test]
    fn preamble_text_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let text = GenConfig::default().preamble_text(dir.path()).unwrap();
        assert_eq!(text, format!("{MODULE_LANG}{DEFAULT_PREAMBLE}"));
        assert!(text.starts_with("#lang racket/base\n"));
    }

    #[test]
    fn binders_own_the_lang_line() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("binders.rkt"),
            "#lang racket/base\n(provide (all-defined-out))\n",
        )
        .unwrap();
        let config = GenConfig {
            binders: Some(PathBuf::from("binders.rkt")),
            ..Default::default()
        };
        let text = config.preamble_text(dir.path()).unwrap();
        assert!(text.starts_with("#lang racket/base\n(provide (all-defined-out))\n"));
        assert_eq!(text.matches("#lang").count(), 1);
        assert!(text.ends_with(DEFAULT_PREAMBLE));
    }

    #[test]
    fn preamble_text_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = GenConfig {
            preamble: Some(PathBuf::from("absent.rkt")),
            ..Default::default()
        };
        assert!(matches!(
            config.preamble_text(dir.path()),
            Err(BindError::Io(_))
        ));
    }

    #[test]
    fn find_and_load_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[generate]\nprint_source_path = true\n",
        )
        .unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let (config, found_dir) = GenConfig::find_and_load(&nested).unwrap().unwrap();
        assert!(config.print_source_path);
        assert_eq!(found_dir, dir.path());
    }
}
