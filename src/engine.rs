// src/engine.rs
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};

use crate::bencode::{bvalue_to_json, encode_bvalue, BValue};
use crate::config::{Config, DEFAULT_CONFIG_PATH};
use crate::hasher::HashAlgorithm;
use crate::torrent::{create_info_from_path, info_hash_of_encoded};

#[derive(Debug, Parser)]
#[command(name = "rusbit-hash", version, about = "Compute the info hash of a file")]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Hash a file and print its info hash
    Hash {
        file: PathBuf,

        /// Piece length in bytes
        #[arg(short, long)]
        piece_length: Option<u64>,

        #[arg(short, long, value_enum)]
        algorithm: Option<HashAlgorithm>,

        /// Value of the "name" key, defaults to the file name
        #[arg(short, long)]
        name: Option<OsString>,

        /// Write the encoded info dict here
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the info dict as JSON
        #[arg(long)]
        json: bool,

        #[arg(long)]
        no_progress: bool,
    },
    /// Write a config file with the default settings
    InitConfig { path: Option<PathBuf> },
}

/// What a `hash` run produced.
#[derive(Debug, Clone)]
pub struct HashReport {
    pub info_hash: String,
    pub piece_count: usize,
    pub length: u64,
    pub piece_length: u64,
    pub algorithm: HashAlgorithm,
    pub metainfo: BValue,
    pub encoded: Vec<u8>,
}

pub fn use_command(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Hash {
            file,
            piece_length,
            algorithm,
            name,
            output,
            json,
            no_progress,
        } => {
            let mut config = Config::load(&cli.config)
                .with_context(|| format!("loading config {:?}", cli.config))?;
            if let Some(piece_length) = piece_length {
                config.piece_length = piece_length;
            }
            if let Some(algorithm) = algorithm {
                config.algorithm = algorithm;
            }
            if no_progress {
                config.show_progress = false;
            }

            let report = hash_file(&file, name.as_deref(), &config)?;

            println!("Info Hash: {}", report.info_hash);
            println!("Algorithm: {}", report.algorithm);
            println!("Length: {}", report.length);
            println!("Piece Length: {}", report.piece_length);
            println!("Number of Pieces: {}", report.piece_count);

            if json {
                let json_val = bvalue_to_json(&report.metainfo);
                println!("{}", serde_json::to_string_pretty(&json_val)?);
            }

            if let Some(output) = output {
                let target = output_path(&config, &output);
                fs::write(&target, &report.encoded)
                    .with_context(|| format!("writing info dict to {:?}", target))?;
                info!("Wrote {} bytes to {:?}", report.encoded.len(), target);
            }
        }
        Command::InitConfig { path } => {
            let path = path.unwrap_or(cli.config);
            Config::default()
                .save(&path)
                .with_context(|| format!("saving config {:?}", path))?;
            println!("Wrote default config to {}", path.display());
        }
    }
    Ok(())
}

/// Runs the whole pipeline on `file`: pieces, info dict, encoding, info hash.
pub fn hash_file(file: &Path, name: Option<&OsStr>, config: &Config) -> Result<HashReport> {
    let start = Instant::now();

    let info = create_info_from_path(file, name, config)
        .with_context(|| format!("hashing pieces of {:?}", file))?;
    let metainfo = info.to_bvalue().context("building info dict")?;
    let encoded = encode_bvalue(&metainfo);
    let info_hash = info_hash_of_encoded(&encoded, &config.algorithm).context("computing info hash")?;

    debug!("Encoded info dict is {} bytes", encoded.len());
    info!("Execution time: {} ms", start.elapsed().as_millis());

    Ok(HashReport {
        info_hash: info_hash.to_hex(),
        piece_count: info.pieces.piece_count(),
        length: info.length,
        piece_length: info.piece_length,
        algorithm: config.algorithm,
        metainfo,
        encoded,
    })
}

fn output_path(config: &Config, output: &Path) -> PathBuf {
    if output.is_absolute() {
        output.to_path_buf()
    } else {
        Path::new(&config.output_directory).join(output)
    }
}
