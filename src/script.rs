//! Line-oriented command scripts driving a [`Site`].
//!
//! One command per line; `#` starts a comment line and blank lines are
//! skipped. Paths are absolute and `/`-separated from the tree root.

use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use tracing::{debug, info, warn};

use crate::clipboard::{ClipboardAction, ClipboardStore};
use crate::namespace::ItemId;
use crate::ops::{paste, renamer_for, ObjectCopier, ObjectMover};
use crate::shutdown;
use crate::site::Site;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Copy {
        src: String,
        dest: String,
        name: Option<String>,
    },
    Move {
        src: String,
        dest: String,
        name: Option<String>,
    },
    Rename {
        container: String,
        old: String,
        new: String,
    },
    Mark {
        action: ClipboardAction,
        paths: Vec<String>,
    },
    Paste {
        target: String,
    },
    Clear,
    Show {
        path: Option<String>,
    },
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or_else(|| anyhow!("empty command"))?;
        let args: Vec<String> = words.map(str::to_string).collect();
        let arity = |min: usize, max: usize| -> Result<()> {
            if args.len() < min || args.len() > max {
                bail!("'{verb}' takes {min}..={max} arguments, got {}", args.len());
            }
            Ok(())
        };

        match verb.to_ascii_lowercase().as_str() {
            "copy" | "move" => {
                arity(2, 3)?;
                let (src, dest, name) = (args[0].clone(), args[1].clone(), args.get(2).cloned());
                Ok(if verb.eq_ignore_ascii_case("copy") {
                    Command::Copy { src, dest, name }
                } else {
                    Command::Move { src, dest, name }
                })
            }
            "rename" => {
                arity(3, 3)?;
                Ok(Command::Rename {
                    container: args[0].clone(),
                    old: args[1].clone(),
                    new: args[2].clone(),
                })
            }
            "mark" => {
                if args.len() < 2 {
                    bail!("'mark' takes an action and at least one path");
                }
                let action = args[0].parse::<ClipboardAction>().map_err(|e| anyhow!(e))?;
                Ok(Command::Mark {
                    action,
                    paths: args[1..].to_vec(),
                })
            }
            "paste" => {
                arity(1, 1)?;
                Ok(Command::Paste { target: args[0].clone() })
            }
            "clear" => {
                arity(0, 0)?;
                Ok(Command::Clear)
            }
            "show" => {
                arity(0, 1)?;
                Ok(Command::Show { path: args.first().cloned() })
            }
            other => bail!("unknown command '{other}'"),
        }
    }
}

/// Parse a whole script, keeping 1-based line numbers for error reporting.
pub fn parse_script(text: &str) -> Result<Vec<(usize, Command)>> {
    let mut out = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let cmd = line
            .parse::<Command>()
            .with_context(|| format!("line {}: cannot parse '{line}'", idx + 1))?;
        out.push((idx + 1, cmd));
    }
    Ok(out)
}

/// A site plus the clipboards of the principal running the script.
#[derive(Debug)]
pub struct Session {
    pub site: Site,
    pub clipboards: ClipboardStore,
    pub principal: String,
}

impl Session {
    pub fn new(site: Site, principal: impl Into<String>) -> Self {
        Self {
            site,
            clipboards: ClipboardStore::new(),
            principal: principal.into(),
        }
    }

    fn resolve(&self, path: &str) -> Result<ItemId> {
        self.site
            .tree
            .resolve_path(path)
            .with_context(|| format!("cannot resolve '{path}'"))
    }

    fn child_path(&self, container: ItemId, name: &str) -> Result<String> {
        let base = self.site.tree.path_of(container)?;
        Ok(if base.ends_with('/') {
            format!("{base}{name}")
        } else {
            format!("{base}/{name}")
        })
    }

    /// Execute one command and describe what happened.
    pub fn execute(&mut self, cmd: &Command) -> Result<String> {
        debug!(?cmd, principal = %self.principal, "executing");
        match cmd {
            Command::Copy { src, dest, name } => {
                let (item, target) = (self.resolve(src)?, self.resolve(dest)?);
                let final_name = ObjectCopier::new(item).copy_to(&mut self.site, target, name.as_deref())?;
                Ok(format!("copied {src} -> {}", self.child_path(target, &final_name)?))
            }
            Command::Move { src, dest, name } => {
                let (item, target) = (self.resolve(src)?, self.resolve(dest)?);
                let final_name = ObjectMover::new(item).move_to(&mut self.site, target, name.as_deref())?;
                Ok(format!("moved {src} -> {}", self.child_path(target, &final_name)?))
            }
            Command::Rename { container, old, new } => {
                let target = self.resolve(container)?;
                let renamer = renamer_for(&self.site.tree, target)?;
                let final_name = renamer.rename_item(&mut self.site, old, new)?;
                Ok(format!(
                    "renamed {} -> {}",
                    self.child_path(target, old)?,
                    self.child_path(target, &final_name)?
                ))
            }
            Command::Mark { action, paths } => {
                let items = paths.iter().map(|p| self.resolve(p)).collect::<Result<Vec<_>>>()?;
                let mut clipboard = self.clipboards.for_principal(&self.principal);
                clipboard.add_items(*action, items);
                Ok(format!(
                    "marked {} item(s) for {action}; clipboard holds {}",
                    paths.len(),
                    clipboard.contents().len()
                ))
            }
            Command::Paste { target } => {
                let container = self.resolve(target)?;
                let mut clipboard = self.clipboards.for_principal(&self.principal);
                let report = paste(&mut self.site, &mut clipboard, container)?;
                let names: Vec<&str> = report.pasted.iter().map(|(_, n)| n.as_str()).collect();
                let mut line = format!("pasted {} item(s) into {target}", names.len());
                if !names.is_empty() {
                    line.push_str(&format!(": {}", names.join(", ")));
                }
                if !report.skipped.is_empty() {
                    line.push_str(&format!(" ({} stale skipped)", report.skipped.len()));
                }
                Ok(line)
            }
            Command::Clear => {
                self.clipboards.for_principal(&self.principal).clear_contents();
                Ok("clipboard cleared".to_string())
            }
            Command::Show { path } => {
                let item = match path {
                    Some(p) => self.resolve(p)?,
                    None => self.site.tree.root(),
                };
                Ok(self.site.tree.render(item)?.trim_end().to_string())
            }
        }
    }

    /// Run every command in order, stopping at the first error or when a
    /// shutdown has been requested. Returns the output of each command.
    pub fn run(&mut self, script: &[(usize, Command)]) -> Result<Vec<String>> {
        let mut outputs = Vec::with_capacity(script.len());
        self.run_each(script, |msg| outputs.push(msg.to_string()))?;
        Ok(outputs)
    }

    /// Like [`Session::run`], but hands each output to `emit` as soon as its
    /// command succeeds, so earlier results survive a later failure.
    /// Returns the number of commands executed.
    pub fn run_each<F>(&mut self, script: &[(usize, Command)], mut emit: F) -> Result<usize>
    where
        F: FnMut(&str),
    {
        let mut done = 0;
        for (line, cmd) in script {
            if shutdown::is_requested() {
                warn!(line, "shutdown requested; stopping script");
                break;
            }
            let msg = self.execute(cmd).with_context(|| format!("line {line}"))?;
            emit(&msg);
            done += 1;
        }
        info!(commands = done, "script finished");
        Ok(done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_skips_comments() {
        let script = "# setup\n\ncopy /a/f /b\nmark cut /a/x /a/y\nshow\n";
        let cmds = parse_script(script).unwrap();
        assert_eq!(cmds.len(), 3);
        assert_eq!(cmds[0].0, 3);
        assert_eq!(
            cmds[1].1,
            Command::Mark {
                action: ClipboardAction::Move,
                paths: vec!["/a/x".into(), "/a/y".into()],
            }
        );
        assert_eq!(cmds[2].1, Command::Show { path: None });
    }

    #[test]
    fn bad_lines_report_their_number() {
        let err = parse_script("show\nfrobnicate /a\n").unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
        assert!("rename /a b".parse::<Command>().is_err());
        assert!("mark copy".parse::<Command>().is_err());
    }
}
