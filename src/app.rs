//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the signal handler,
//! builds the site from a layout and runs the command script.

use anyhow::{Context, Result};
use std::io::Read;
use std::sync::{Arc, Mutex};
use tracing::{debug, error};

use cpmove::cli::Args;
use cpmove::config::{create_template_config, default_config_path, load_config, CONFIG_ENV};
use cpmove::namespace::load_layout_from_xml_path;
use cpmove::output as out;
use cpmove::{parse_script, shutdown, NamespaceError, Session, Site, Tree};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Config-location commands run before logging init.
    if args.print_config {
        if let Ok(p) = std::env::var(CONFIG_ENV) {
            out::print_info(&format!("Using {CONFIG_ENV} (explicit):\n  {p}"));
            return Ok(());
        }
        match default_config_path() {
            Some(p) if p.exists() => out::print_info(&format!("Config file:\n  {}", p.display())),
            Some(p) => out::print_info(&format!(
                "Default config path (no file yet; create one with --init-config):\n  {}",
                p.display()
            )),
            None => out::print_error("Could not determine a default config path"),
        }
        return Ok(());
    }
    if args.init_config {
        let path = default_config_path().context("could not determine a config path")?;
        create_template_config(&path)?;
        out::print_success(&format!("A template cpmove config was written to: {}", path.display()));
        return Ok(());
    }

    let (mut cfg, cfg_path) = load_config()?;
    args.apply_overrides(&mut cfg).map_err(anyhow::Error::msg)?;
    cfg.validate()?;

    let guard_opt = init_tracing(cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
        e
    })?;

    // The Ctrl-C handler drops the guard so buffered file logs get flushed.
    let guard_slot = Arc::new(Mutex::new(guard_opt));
    {
        let guard_slot = Arc::clone(&guard_slot);
        ctrlc::set_handler(move || {
            shutdown::request();
            out::print_warn("Received interrupt; stopping after the current command...");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take();
            }
        })
        .context("failed to install signal handler")?;
    }

    debug!(?args, config = ?cfg_path, "starting cpmove");

    let result = (|| -> Result<()> {
        let tree = match &args.tree {
            Some(path) => load_layout_from_xml_path(path)?,
            None => Tree::new(),
        };
        let text = match args.script_path() {
            Some(path) => std::fs::read_to_string(path).with_context(|| format!("read script '{}'", path.display()))?,
            None => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf).context("read script from stdin")?;
                buf
            }
        };
        let script = parse_script(&text)?;

        let site = Site::with_defaults(tree, cfg.name_policy, cfg.annotate_created);
        let mut session = Session::new(site, cfg.principal.clone());
        match session.run_each(&script, out::print_user) {
            Ok(_) => {
                if !args.quiet {
                    out::print_tree(&session.site.tree.render(session.site.tree.root())?);
                }
                Ok(())
            }
            Err(e) => {
                match e.downcast_ref::<NamespaceError>() {
                    Some(ns) => error!(code = ns.code(), kind = ns.kind(), error = %format!("{e:#}"), "script failed"),
                    None => error!(error = %format!("{e:#}"), "script failed"),
                }
                Err(e)
            }
        }
    })();

    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }

    result
}
