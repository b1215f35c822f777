//! transcache: 翻译缓存命令行工具
//!
//! Usage:
//!   transcache translate --to <lang> [<text>...]          Translate arguments (or stdin lines)
//!   transcache project --to <lang> --path <p>... [file]   Translate fields of a JSON document
//!   transcache stats                                      Show cache tiers and counters
//!   transcache clear                                      Drop every cached translation
//!   transcache languages                                  List accepted target codes

use anyhow::{bail, Context};
use std::io::Read;
use tracing_subscriber::EnvFilter;
use transcache::language::SUPPORTED_TARGETS;
use transcache::{TranslationClient, TranslationConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let rest = &args[2..];
    let outcome = match args[1].as_str() {
        "translate" => cmd_translate(rest).await,
        "project" => cmd_project(rest).await,
        "stats" => cmd_stats(rest).await,
        "clear" => cmd_clear(rest).await,
        "languages" => {
            cmd_languages();
            Ok(())
        }
        "version" | "--version" | "-V" => {
            println!("transcache {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = outcome {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"transcache: 翻译缓存命令行工具

USAGE:
    transcache <COMMAND> [OPTIONS]

COMMANDS:
    translate --to <lang> [<text>...]         Translate texts; reads stdin lines when none given
    project --to <lang> --path <p>... [file]  Translate string fields of a JSON document
                                              (file or stdin) and print the result
    stats                                     Show cache tiers and hit counters
    clear                                     Remove cached translations from both tiers
    languages                                 List accepted target language codes
    version                                   Show version information
    help                                      Show this help message

OPTIONS:
    --config <file>                           YAML config; environment variables still apply

ENVIRONMENT:
    TRANSCACHE_API_KEY / DEEPL_API_KEY        Provider API key
    TRANSCACHE_API_URL                        Provider base URL
    TRANSCACHE_REDIS_URL / REDIS_URL          Shared cache tier
    RUST_LOG                                  Log filter, e.g. transcache=debug"#
    );
}

/// Flags shared by every command plus whatever is left over as positionals.
#[derive(Debug, Default)]
struct Args {
    config: Option<String>,
    to: Option<String>,
    paths: Vec<String>,
    positional: Vec<String>,
}

fn parse_args(args: &[String]) -> anyhow::Result<Args> {
    let mut out = Args::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "-c" => out.config = Some(flag_value(&mut iter, arg)?),
            "--to" | "-t" => out.to = Some(flag_value(&mut iter, arg)?),
            "--path" | "-p" => out.paths.push(flag_value(&mut iter, arg)?),
            _ => out.positional.push(arg.clone()),
        }
    }
    Ok(out)
}

fn flag_value<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str) -> anyhow::Result<String> {
    match iter.next() {
        Some(v) => Ok(v.clone()),
        None => bail!("{flag} expects a value"),
    }
}

async fn build_client(args: &Args) -> anyhow::Result<TranslationClient> {
    let config = match &args.config {
        Some(path) => {
            let mut cfg = TranslationConfig::from_yaml_file(path)
                .with_context(|| format!("loading config from {path}"))?;
            cfg.apply_env_overrides();
            cfg
        }
        None => TranslationConfig::from_env(),
    };
    let client = TranslationClient::builder()
        .config(config)
        .build()
        .await
        .context("building translation client")?;
    Ok(client)
}

fn read_stdin() -> anyhow::Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("reading stdin")?;
    Ok(buf)
}

async fn cmd_translate(args: &[String]) -> anyhow::Result<()> {
    let args = parse_args(args)?;
    let Some(target) = args.to.as_deref() else {
        bail!("translate requires --to <lang>");
    };

    let texts: Vec<String> = if args.positional.is_empty() {
        read_stdin()?.lines().map(str::to_string).collect()
    } else {
        args.positional.clone()
    };

    let client = build_client(&args).await?;
    if let [single] = texts.as_slice() {
        println!("{}", client.translate_text(single, Some(target)).await?);
        return Ok(());
    }

    let report = client.translate_detailed(&texts, Some(target)).await;
    let fallbacks = report.fallback_count();
    for line in report.into_texts() {
        println!("{line}");
    }
    if fallbacks > 0 {
        eprintln!("{fallbacks} item(s) kept their original text");
    }
    Ok(())
}

async fn cmd_project(args: &[String]) -> anyhow::Result<()> {
    let args = parse_args(args)?;
    let Some(target) = args.to.as_deref() else {
        bail!("project requires --to <lang>");
    };
    if args.paths.is_empty() {
        bail!("project requires at least one --path");
    }

    let raw = match args.positional.first().map(String::as_str) {
        None | Some("-") => read_stdin()?,
        Some(file) => std::fs::read_to_string(file).with_context(|| format!("reading {file}"))?,
    };
    let mut payload: serde_json::Value = serde_json::from_str(&raw).context("parsing JSON input")?;

    let client = build_client(&args).await?;
    let report = client
        .apply_translations_with_report(&mut payload, &args.paths, Some(target))
        .await;
    println!("{}", serde_json::to_string_pretty(&payload)?);
    for p in &report.paths {
        eprintln!("{}: {}/{} field(s) translated", p.path, p.written, p.matched);
    }
    Ok(())
}

async fn cmd_stats(args: &[String]) -> anyhow::Result<()> {
    let args = parse_args(args)?;
    let client = build_client(&args).await?;
    let stats = client.cache_stats().await;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

async fn cmd_clear(args: &[String]) -> anyhow::Result<()> {
    let args = parse_args(args)?;
    let client = build_client(&args).await?;
    let summary = client.clear_cache().await;
    println!(
        "removed {} in-memory and {} shared entries",
        summary.memory_entries_removed, summary.distributed_entries_removed
    );
    Ok(())
}

fn cmd_languages() {
    for code in SUPPORTED_TARGETS {
        println!("{code}");
    }
}
