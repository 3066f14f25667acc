use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use leaderkey::cli::{parse_key_token, render_tree, CliArgs, CliCommand};
use leaderkey::keymap::{load_config_file, KeyOutcome};
use leaderkey::{
    ActionInvoker, BindingTree, ConfigError, ConfigService, DispatchEvent, FocusContext,
    InvokeError, LeaderKey,
};

/// Prints every action instead of running it
struct PrintInvoker;

impl ActionInvoker for PrintInvoker {
    type Context = ();

    fn invoke(&mut self, action_id: &str, _context: &()) -> Result<(), InvokeError> {
        println!("invoke {}", action_id);
        Ok(())
    }
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    leaderkey::tracing::init();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: CliArgs) -> Result<ExitCode> {
    match &args.command {
        CliCommand::Path => {
            let path = rc_path(&args)?;
            println!("{}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        CliCommand::Check { json } => {
            let tree = match load_tree(&args)? {
                Ok(tree) => tree,
                Err(e) => {
                    eprintln!("{}", e);
                    return Ok(ExitCode::FAILURE);
                }
            };
            if *json {
                println!("{}", serde_json::to_string_pretty(&tree)?);
            } else {
                print!("{}", render_tree(&tree));
            }
            Ok(ExitCode::SUCCESS)
        }
        CliCommand::Simulate { keys } => simulate(&args, keys),
    }
}

fn rc_path(args: &CliArgs) -> Result<PathBuf> {
    if let Some(path) = &args.config {
        return Ok(path.clone());
    }
    let service = ConfigService::from_env(args.product.clone())
        .context("No home directory; set LEADERKEY_CONFIG_DIR")?;
    Ok(service.rc_file()?)
}

/// Outer error: the tool could not run. Inner error: the config is invalid.
fn load_tree(args: &CliArgs) -> Result<Result<BindingTree, ConfigError>> {
    let path = rc_path(args)?;
    match load_config_file(&path, args.product.as_deref()) {
        Err(ConfigError::Io { path, source }) => {
            Err(source).with_context(|| format!("Could not read {}", path.display()))
        }
        result => Ok(result),
    }
}

fn simulate(args: &CliArgs, keys: &[String]) -> Result<ExitCode> {
    let mut events = Vec::with_capacity(keys.len() * 2);
    for token in keys {
        events.extend(parse_key_token(token).map_err(anyhow::Error::msg)?);
    }

    let tree = match load_tree(args)? {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let dir = rc_path(args)?
        .parent()
        .map(PathBuf::from)
        .unwrap_or_default();
    let mut config = ConfigService::new(dir, args.product.clone());
    config.set_bindings(tree);

    let mut leader = LeaderKey::new(config, PrintInvoker);
    let notifications = leader.dispatcher_mut().subscribe();
    leader.trigger((), &FocusContext::idle());

    for event in &events {
        let outcome = leader.process_key_event(event);
        for notification in notifications.try_iter() {
            match notification {
                DispatchEvent::GroupEntered(group) => {
                    println!("group {}  {}", group.label(), group.description())
                }
                DispatchEvent::TerminalFired(terminal) => {
                    println!("fired {}  {}", terminal.label(), terminal.description())
                }
                DispatchEvent::Dismissed => println!("dismissed"),
            }
        }
        if outcome == KeyOutcome::Ignored {
            tracing::debug!("Session over, ignoring remaining keys");
            break;
        }
    }

    if leader.dispatcher().is_capturing() {
        let path = leader.dispatcher().path().join(" ");
        println!("still capturing at [{}]", path);
        leader.stop();
    }

    Ok(ExitCode::SUCCESS)
}
