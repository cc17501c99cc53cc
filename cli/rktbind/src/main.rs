//! rktbind CLI: generate Racket FFI bindings from C declaration dumps.

mod commands;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rktbind_ffi::GenConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rktbind", version, about = "Racket FFI binding generator for C headers")]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a template rktbind.toml
    Init {
        /// Directory to write into (default: current directory)
        dir: Option<PathBuf>,
    },
    /// Generate a binding module from a declaration dump
    Generate {
        /// Declarations in JSON form
        input: PathBuf,
        /// Configuration file (default: nearest rktbind.toml)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Skip declarations whose location contains this pattern
        #[arg(long)]
        exclude: Vec<String>,
        /// Annotate each definition with its source location
        #[arg(long)]
        print_source_path: bool,
        /// Fail when any definition is left unresolved
        #[arg(long)]
        deny_unresolved: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Init { dir } => commands::init::run(dir.as_deref().unwrap_or(&cwd)),

        Commands::Generate {
            input,
            config,
            output,
            exclude,
            print_source_path,
            deny_unresolved,
        } => {
            let (mut gen_config, base_dir) = load_config(&cwd, config.as_deref())?;
            gen_config.exclude.extend(exclude);
            gen_config.print_source_path |= print_source_path;
            commands::generate::run(
                &input,
                &gen_config,
                &base_dir,
                output.as_deref(),
                deny_unresolved,
            )
        }
    }
}

/// Load an explicit config file, or the nearest `rktbind.toml` above `cwd`,
/// or fall back to defaults. Returns the directory relative paths resolve
/// against.
fn load_config(cwd: &Path, explicit: Option<&Path>) -> anyhow::Result<(GenConfig, PathBuf)> {
    if let Some(path) = explicit {
        let config =
            GenConfig::load(path).with_context(|| format!("loading {}", path.display()))?;
        let base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.to_path_buf());
        return Ok((config, base_dir));
    }
    match GenConfig::find_and_load(cwd)? {
        Some((config, dir)) => Ok((config, dir)),
        None => Ok((GenConfig::default(), cwd.to_path_buf())),
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use rktbind_core::{CType, Declaration, DeclarationUnit};

    fn write_unit(dir: &Path, declarations: Vec<Declaration>) -> PathBuf {
        let path = dir.join("decls.json");
        let unit = DeclarationUnit::new(declarations);
        std::fs::write(&path, serde_json::to_string(&unit).unwrap()).unwrap();
        path
    }

    #[test]
    fn init_then_generate_with_discovered_config() {
        let dir = tempfile::tempdir().unwrap();
        commands::init::run(dir.path()).unwrap();

        let input = write_unit(
            dir.path(),
            vec![
                Declaration::typedef(1, "off_t", CType::named("long"))
                    .at("/usr/include/types.h:3:1"),
                Declaration::typedef(2, "handle_t", CType::named("int")).at("lib.h:1:1"),
            ],
        );
        let (config, base_dir) = load_config(dir.path(), None).unwrap();
        assert_eq!(base_dir, dir.path());

        let output = dir.path().join("out").join("bindings.rkt");
        commands::generate::run(&input, &config, &base_dir, Some(&output), false).unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.starts_with("#lang racket/base"));
        assert!(text.contains("(define _handle_t _int32)"));
        assert!(!text.contains("_off_t"));
    }

    #[test]
    fn explicit_config_resolves_relative_to_its_directory() {
        let dir = tempfile::tempdir().unwrap();
        let conf_dir = dir.path().join("conf");
        std::fs::create_dir_all(&conf_dir).unwrap();
        std::fs::write(conf_dir.join("pre.rkt"), ";; custom\n").unwrap();
        std::fs::write(
            conf_dir.join("custom.toml"),
            "[generate]\npreamble = \"pre.rkt\"\n",
        )
        .unwrap();

        let (config, base_dir) =
            load_config(dir.path(), Some(&conf_dir.join("custom.toml"))).unwrap();
        assert_eq!(base_dir, conf_dir);
        assert_eq!(
            config.preamble_text(&base_dir).unwrap(),
            "#lang racket/base\n\n;; custom\n"
        );
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, base_dir) = load_config(dir.path(), None).unwrap();
        // A config further up the real filesystem would be picked up here;
        // temp directories normally have none.
        if base_dir == dir.path() {
            assert_eq!(config, GenConfig::default());
        }
    }

    #[test]
    fn explicit_config_missing_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path(), Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(format!("{err:#}").contains("absent.toml"));
    }
}
