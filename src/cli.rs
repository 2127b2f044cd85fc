//! Command-line front-end over the hive operation surface.
//!
//! The CLI is an optional caller of the core: it opens the hive, dispatches
//! one operation, renders the result as text or JSON, and exits. Policy on
//! absence (create or abort) lives here, not in the core.

use crate::core::config;
use crate::core::hive::{Hive, Root};
use crate::ops::{create, exists, guard, query, remove, update};
use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "hivereg",
    version = env!("CARGO_PKG_VERSION"),
    about = "Path-addressed hierarchical key/value hive with typed accessors"
)]
pub struct Cli {
    /// Hive file to operate on (default: HIVEREG_PATH or ~/.hivereg/hive.db).
    #[clap(long, global = true)]
    hive: Option<PathBuf>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether a key (or one of its values) exists
    Exists {
        root: Root,
        path: String,
        /// Check this value under the key instead of the key itself
        #[clap(long)]
        value: Option<String>,
    },
    /// Read a typed value
    Get {
        #[clap(subcommand)]
        command: GetCommand,
    },
    /// Show a value's declared type and size without reading its payload
    Peek { root: Root, path: String, value: String },
    /// Overwrite an existing typed value
    Set {
        #[clap(subcommand)]
        command: SetCommand,
    },
    /// Create a key or ensure a value is present
    Create {
        #[clap(subcommand)]
        command: CreateCommand,
    },
    /// Remove keys and values
    Rm {
        #[clap(subcommand)]
        command: RmCommand,
    },
    /// List subkey or value names
    Ls {
        #[clap(subcommand)]
        command: LsCommand,
    },
    /// Subkey/value counts and longest name lengths
    Info {
        root: Root,
        path: String,
        /// Output format: 'text' or 'json'.
        #[clap(long, default_value = "text")]
        format: String,
    },
}

#[derive(Subcommand, Debug)]
enum GetCommand {
    /// Read a 32-bit unsigned integer value
    Int { root: Root, path: String, value: String },
    /// Read a string value
    Str { root: Root, path: String, value: String },
}

#[derive(Subcommand, Debug)]
enum SetCommand {
    /// Overwrite an existing integer value
    Int {
        root: Root,
        path: String,
        value: String,
        data: u32,
    },
    /// Overwrite an existing string value
    Str {
        root: Root,
        path: String,
        value: String,
        data: String,
    },
}

#[derive(Subcommand, Debug)]
enum CreateCommand {
    /// Create a key, or open it if it already exists
    Key { root: Root, path: String },
    /// Ensure an integer value is present (existing data is never overwritten)
    Int {
        root: Root,
        path: String,
        value: String,
        #[clap(long, default_value_t = 0)]
        data: u32,
    },
    /// Ensure a string value is present (existing data is never overwritten)
    Str {
        root: Root,
        path: String,
        value: String,
        #[clap(long, default_value = "")]
        data: String,
    },
}

#[derive(Subcommand, Debug)]
enum RmCommand {
    /// Remove a childless key
    Key { root: Root, path: String },
    /// Remove a single value
    Value { root: Root, path: String, value: String },
    /// Remove all values of a key, leaving its subkeys
    Values { root: Root, path: String },
    /// Remove all subkeys of a key recursively, leaving its values
    Subkeys { root: Root, path: String },
    /// Remove a key with all descendant keys and values
    Cluster { root: Root, path: String },
}

#[derive(Subcommand, Debug)]
enum LsCommand {
    /// List direct subkey names
    Keys {
        root: Root,
        path: String,
        /// Output format: 'text' or 'json'.
        #[clap(long, default_value = "text")]
        format: String,
    },
    /// List value names
    Values {
        root: Root,
        path: String,
        /// Output format: 'text' or 'json'.
        #[clap(long, default_value = "text")]
        format: String,
    },
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let hive = match &cli.hive {
        Some(path) => config::open_at(path).context("opening hive")?,
        None => config::open_default().context("opening default hive")?,
    };
    dispatch(&hive, cli.command)
}

fn dispatch(hive: &Hive, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Exists { root, path, value } => {
            let present = match value {
                Some(value) => exists::value_exists(hive, root, &path, &value),
                None => exists::key_exists(hive, root, &path),
            };
            print_bool(present);
        }
        Command::Get { command } => match command {
            GetCommand::Int { root, path, value } => {
                println!("{}", query::read_integer(hive, root, &path, &value)?);
            }
            GetCommand::Str { root, path, value } => {
                println!("{}", query::read_string(hive, root, &path, &value)?);
            }
        },
        Command::Peek { root, path, value } => {
            let (value_type, size) = guard::peek(hive, root, &path, &value)?;
            println!("{} ({} bytes)", value_type.to_string().as_str().bold(), size);
        }
        Command::Set { command } => match command {
            SetCommand::Int { root, path, value, data } => {
                update::write_integer(hive, root, &path, &value, data)?;
            }
            SetCommand::Str { root, path, value, data } => {
                update::write_string(hive, root, &path, &value, &data)?;
            }
        },
        Command::Create { command } => {
            let disposition = match command {
                CreateCommand::Key { root, path } => create::create_key(hive, root, &path)?.1,
                CreateCommand::Int { root, path, value, data } => {
                    create::create_integer(hive, root, &path, &value, data)?.1
                }
                CreateCommand::Str { root, path, value, data } => {
                    create::create_string(hive, root, &path, &value, &data)?.1
                }
            };
            println!("{}", disposition.to_string().as_str().green());
        }
        Command::Rm { command } => {
            let removed = match command {
                RmCommand::Key { root, path } => remove::remove_key(hive, root, &path)?,
                RmCommand::Value { root, path, value } => {
                    remove::remove_value(hive, root, &path, &value)?
                }
                RmCommand::Values { root, path } => remove::remove_values(hive, root, &path)?,
                RmCommand::Subkeys { root, path } => remove::remove_subkeys(hive, root, &path)?,
                RmCommand::Cluster { root, path } => remove::remove_cluster(hive, root, &path)?,
            };
            print_bool(removed);
        }
        Command::Ls { command } => {
            let (names, format) = match command {
                LsCommand::Keys { root, path, format } => {
                    (query::list_keys(hive, root, &path)?, format)
                }
                LsCommand::Values { root, path, format } => {
                    (query::list_value_names(hive, root, &path)?, format)
                }
            };
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&names)?);
            } else {
                for name in names {
                    println!("{name}");
                }
            }
        }
        Command::Info { root, path, format } => {
            let info = query::key_info(hive, root, &path)?;
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{} {}", "subkeys:".bold(), info.subkeys);
                println!("{} {}", "longest subkey name + 1:".bold(), info.max_subkey_len);
                println!("{} {}", "values:".bold(), info.values);
                println!("{} {}", "longest value name + 1:".bold(), info.max_value_len);
            }
        }
    }
    Ok(())
}

fn print_bool(flag: bool) {
    if flag {
        println!("{}", "true".green());
    } else {
        println!("{}", "false".red());
    }
}
