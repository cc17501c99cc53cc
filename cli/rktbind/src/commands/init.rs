//! `rktbind init`: write a template configuration file.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use rktbind_ffi::config::CONFIG_FILE;
use rktbind_ffi::GenConfig;

/// Write `rktbind.toml` into `dir`, creating the directory if needed.
pub fn run(dir: &Path) -> Result<()> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() {
        bail!("'{}' already exists", path.display());
    }

    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    fs::write(&path, GenConfig::template())
        .with_context(|| format!("writing {}", path.display()))?;

    println!("Created {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_loadable_template() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path()).unwrap();
        let config = GenConfig::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config.predefined, ["_size_t", "_uintptr_t"]);
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("bindings");
        run(&nested).unwrap();
        assert!(nested.join(CONFIG_FILE).is_file());
    }

    #[test]
    fn refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "# mine\n").unwrap();
        let err = run(dir.path()).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        let kept = std::fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(kept, "# mine\n");
    }
}
