//! `rktbind generate`: declaration dump in, binding module out.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use rktbind_core::DeclarationUnit;
use rktbind_ffi::{generate, GenConfig, GeneratedModule};
use tracing::debug;

/// Generate a binding module for the declarations in `input`.
///
/// The module goes to `output` (parent directories are created) or to
/// stdout. With `deny_unresolved`, an incomplete module is still written
/// but the command fails afterwards.
pub fn run(
    input: &Path,
    config: &GenConfig,
    base_dir: &Path,
    output: Option<&Path>,
    deny_unresolved: bool,
) -> Result<()> {
    let module = generate_module(input, config, base_dir)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            fs::write(path, &module.text)
                .with_context(|| format!("writing {}", path.display()))?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(module.text.as_bytes())
                .context("writing to stdout")?;
        }
    }

    eprintln!("{}", module.report);

    if deny_unresolved && !module.report.is_complete() {
        let names: Vec<&str> = module
            .report
            .unresolved
            .iter()
            .map(|u| u.name.as_str())
            .collect();
        bail!("unresolved definitions: {}", names.join(", "));
    }
    Ok(())
}

/// Load the dump, then run the generator over it.
pub(crate) fn generate_module(
    input: &Path,
    config: &GenConfig,
    base_dir: &Path,
) -> Result<GeneratedModule> {
    let unit = DeclarationUnit::load(input)
        .with_context(|| format!("loading declarations from {}", input.display()))?;
    debug!(input = %input.display(), declarations = unit.len(), "declarations loaded");
    let preamble = config
        .preamble_text(base_dir)
        .context("reading preamble")?;
    Ok(generate(&unit, config, &preamble))
}
