//! Command-line argument parsing for the leaderkey tool
//!
//! Supports:
//! - Validating the rc file and printing the binding tree
//! - Printing the rc file location
//! - Simulating a leader session from key tokens

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::keymap::{key_for_label, Binding, BindingTree, KeyCode, KeyPhase, Modifiers, RawKeyEvent};

/// Leader key bindings: validate and simulate
#[derive(Parser, Debug)]
#[command(name = "leaderkey", version, about = "Validate and simulate leader key bindings")]
pub struct CliArgs {
    /// Read bindings from this file instead of the rc file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Product code whose override section is merged over `bindings`
    #[arg(long, value_name = "CODE", global = true)]
    pub product: Option<String>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Load and validate the config, then print the binding tree
    Check {
        /// Print the tree as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the rc file path, creating it from the template if needed
    Path,
    /// Run one leader session over the given keys (e.g. `q f`, `F2`, `esc`)
    Simulate {
        #[arg(value_name = "KEYS", required = true)]
        keys: Vec<String>,
    },
}

/// Expand a key token into the key-down/key-up pair a keyboard would send
///
/// Accepts a single character, a function key (`F1`..`F24`) or one of
/// `esc`, `space`, `enter`, `tab`.
pub fn parse_key_token(token: &str) -> Result<[RawKeyEvent; 2], String> {
    let named = match token.to_ascii_lowercase().as_str() {
        "esc" | "escape" => Some(KeyCode::Escape),
        "enter" => Some(KeyCode::Enter),
        "tab" => Some(KeyCode::Tab),
        _ => None,
    };
    if let Some(code) = named {
        return Ok([
            RawKeyEvent::press(code, Modifiers::NONE),
            RawKeyEvent::release(code, Modifiers::NONE),
        ]);
    }

    let token = if token.eq_ignore_ascii_case("space") { " " } else { token };
    let mut chars = token.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok([RawKeyEvent::press_char(c), RawKeyEvent::release_char(c)]);
    }

    let key = key_for_label(token, KeyPhase::Press)
        .map_err(|e| format!("Invalid key `{}`: {}", token, e))?;
    Ok([
        RawKeyEvent::press(key.code, key.mods),
        RawKeyEvent::release(key.code, key.mods),
    ])
}

/// Indented text listing of a binding tree, one binding per line
pub fn render_tree(tree: &BindingTree) -> String {
    let mut out = String::new();
    render_level(tree, 0, &mut out);
    out
}

fn render_level(tree: &BindingTree, depth: usize, out: &mut String) {
    for binding in tree {
        let indent = "  ".repeat(depth);
        match binding {
            Binding::Terminal(terminal) => {
                out.push_str(&format!(
                    "{}{}  {}  [{}]\n",
                    indent,
                    terminal.label(),
                    terminal.description(),
                    terminal.actions().join(", ")
                ));
            }
            Binding::Group(group) => {
                out.push_str(&format!("{}{}  {}\n", indent, group.label(), group.description()));
                render_level(group.children(), depth + 1, out);
            }
        }
    }
}
