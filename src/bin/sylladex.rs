//! Interactive sylladex shell.
//!
//! Reads commands from stdin, one per line, and prints replies to stdout.
//! Logs go to stderr, filtered by `--log` or `RUST_LOG`.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sylladex::core::{Card, DEFAULT_SHUFFLE_ROUNDS, DEFAULT_STORE};
use sylladex::modus::{FolderTag, Route};
use sylladex::shell::{Command, LoadRequest, Shell};
use sylladex::{LoadMode, ModusKind, Sylladex, SylladexConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sylladex")]
#[command(about = "Captchalogue inventory shell with pluggable fetch modi")]
struct Args {
    /// Record file used by save and load
    #[arg(short, long, default_value = DEFAULT_STORE)]
    store: PathBuf,

    /// Starting modus (pentafile, tarotdeck, btree)
    #[arg(short, long, default_value = "pentafile")]
    modus: String,

    /// RNG seed for reproducible shuffles
    #[arg(long)]
    seed: Option<u64>,

    /// Riffle rounds per shuffle
    #[arg(long, default_value_t = DEFAULT_SHUFFLE_ROUNDS)]
    rounds: u32,

    /// Load the store on startup with this mode (clear, as-is, no-empty, fast)
    #[arg(long)]
    load: Option<String>,

    /// Log filter, e.g. `debug` or `sylladex=trace` (overrides RUST_LOG)
    #[arg(long)]
    log: Option<String>,
}

fn init_tracing(filter: Option<&str>) -> Result<()> {
    let filter = match filter {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter `{directives}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

fn prompt(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "{text}")?;
    stdout.flush()
}

/// Ask the user where a record goes during a manual load.
fn route_interactively(stdin: &io::Stdin, card: &Card) -> Route {
    loop {
        let question = format!(
            "{} -> folder [w/s/m/i/k], (x) skip, (c) cancel: ",
            card.name()
        );
        if prompt(&question).is_err() {
            return Route::Cancel;
        }
        let mut answer = String::new();
        match stdin.read_line(&mut answer) {
            Ok(0) | Err(_) => return Route::Cancel,
            Ok(_) => {}
        }
        match answer.trim().to_ascii_lowercase().as_str() {
            "x" | "skip" => return Route::Skip,
            "c" | "cancel" => return Route::Cancel,
            other => match FolderTag::parse(other) {
                Ok(tag) => return Route::Folder(tag),
                Err(err) => println!("{err}"),
            },
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log.as_deref())?;

    let mut config = SylladexConfig::new()
        .with_store(&args.store)
        .with_shuffle_rounds(args.rounds)
        .with_modus(ModusKind::parse(&args.modus)?);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(mode) = &args.load {
        config = config.with_load_mode(LoadMode::parse(mode)?);
    }

    let sylladex = Sylladex::new(config).context("could not start the sylladex")?;
    let mut shell = Shell::new(sylladex);
    let stdin = io::stdin();
    let mut router = |card: &Card| route_interactively(&stdin, card);

    if args.load.is_some() {
        let reply = shell.dispatch(Command::Load(LoadRequest::Default), &mut router)?;
        print!("{}", reply.text);
    }

    println!("{}", shell.sylladex().modus().description());
    println!("type `help` for commands");

    loop {
        prompt(&format!("{}> ", shell.sylladex().kind()))?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        match shell.execute(&line, &mut router) {
            Ok(reply) => {
                print!("{}", reply.text);
                if reply.quit {
                    break;
                }
            }
            Err(err) => println!("error: {err}"),
        }
    }

    info!("shell closed");
    Ok(())
}
