//! kkreftx CLI
//!
//! Host-side helper for legacy input verification: lists the previous
//! transactions a KeepKey will ask for and prints them in the record form the
//! firmware accepts.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::Table;
use keepkey_reftx::chains::{self, BitcoinTxInput, RefTxSource};
use keepkey_reftx::{select_references, transform_transactions, RefTransaction};

#[derive(Parser)]
#[command(name = "kkreftx")]
#[command(about = "Prepare referenced transactions for KeepKey signing")]
struct Cli {
    /// Log filter directive, e.g. `debug` or `keepkey_reftx=trace`
    #[arg(long, global = true, env = "KKREFTX_LOG", default_value = "info")]
    log_level: String,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List previous transaction ids the device will request
    Refs {
        /// JSON file holding an array of inputs
        inputs: PathBuf,
    },
    /// Convert raw previous transactions into device records
    Transform {
        /// Chain family the transactions belong to
        #[arg(long, value_enum, default_value_t = Coin::Bitcoin)]
        coin: Coin,
        /// Raw transaction hex, or `@file` with one transaction per line
        #[arg(required = true)]
        txs: Vec<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Coin {
    Bitcoin,
    Zcash,
    Peercoin,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                cli.log_level
                    .parse()
                    .with_context(|| format!("Invalid log level {:?}", cli.log_level))?,
            ),
        )
        .init();

    match cli.command {
        Commands::Refs { inputs } => {
            let data = fs::read_to_string(&inputs)
                .with_context(|| format!("Failed to read {}", inputs.display()))?;
            let inputs: Vec<BitcoinTxInput> =
                serde_json::from_str(&data).context("Failed to parse inputs")?;

            let refs = select_references(&inputs);
            tracing::info!("{} referenced transactions to fetch", refs.len());
            print_refs(&refs, cli.format)?;
        }
        Commands::Transform { coin, txs } => {
            let raw_txs = collect_raw_txs(&txs)?;
            let parsed = raw_txs
                .iter()
                .enumerate()
                .map(|(i, raw)| {
                    parse_raw(coin, raw).with_context(|| format!("Failed to parse transaction #{}", i))
                })
                .collect::<Result<Vec<_>>>()?;

            let records =
                transform_transactions(&parsed).context("Failed to transform transactions")?;
            tracing::info!("Transformed {} {:?} transactions", records.len(), coin);
            print_records(&records, cli.format)?;
        }
    }

    Ok(())
}

fn collect_raw_txs(args: &[String]) -> Result<Vec<Vec<u8>>> {
    let mut lines = Vec::new();
    for arg in args {
        match arg.strip_prefix('@') {
            Some(path) => {
                let data = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path))?;
                lines.extend(
                    data.lines()
                        .map(str::trim)
                        .filter(|line| !line.is_empty())
                        .map(str::to_string),
                );
            }
            None => lines.push(arg.trim().to_string()),
        }
    }

    lines
        .iter()
        .map(|line| hex::decode(line).with_context(|| format!("Invalid hex: {:.16}...", line)))
        .collect()
}

fn parse_raw(coin: Coin, raw: &[u8]) -> keepkey_reftx::Result<Box<dyn RefTxSource>> {
    let tx: Box<dyn RefTxSource> = match coin {
        Coin::Bitcoin => Box::new(chains::bitcoin::parse_transaction(raw)?),
        Coin::Zcash => Box::new(chains::zcash::parse_transaction(raw)?),
        Coin::Peercoin => Box::new(chains::peercoin::parse_transaction(raw)?),
    };
    Ok(tx)
}

fn print_refs(refs: &[String], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(refs)?),
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_header(vec!["#", "Previous txid"]);
            for (i, txid) in refs.iter().enumerate() {
                table.add_row(vec![i.to_string(), txid.clone()]);
            }
            println!("{table}");
        }
    }
    Ok(())
}

fn print_records(records: &[RefTransaction], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(records)?),
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_header(vec![
                "Hash",
                "Version",
                "Inputs",
                "Outputs",
                "Extra bytes",
                "Group id",
                "Expiry",
                "Timestamp",
            ]);
            let optional = |value: Option<u32>| value.map(|v| v.to_string()).unwrap_or_default();
            for record in records {
                table.add_row(vec![
                    record.hash.clone(),
                    record.version.to_string(),
                    record.inputs.len().to_string(),
                    record.bin_outputs.len().to_string(),
                    record
                        .extra_data
                        .as_ref()
                        .map(|data| (data.len() / 2).to_string())
                        .unwrap_or_default(),
                    record
                        .version_group_id
                        .map(|id| format!("0x{:08x}", id))
                        .unwrap_or_default(),
                    optional(record.expiry),
                    optional(record.timestamp),
                ]);
            }
            println!("{table}");
        }
    }
    Ok(())
}
