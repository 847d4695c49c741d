// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-srs CLI
//!
//! Command-line interface for spatial reference system identification and
//! equivalence checks.

use clap::{Args, Parser, Subcommand};
use ferro_srs::cli::{
    output_descriptor, output_equivalence, output_error, output_error_with_context, output_text,
    process_input_line, OutputFormat,
};
use ferro_srs::wkt::{canonicalize_node, parse_wkt};
use ferro_srs::{
    EquivalenceOptions, FerroSrsConfig, IdentifyConfig, ObjectCodePolicy, Registry, SrsError,
    SrsIdentifier, WktComparison,
};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Exit status when two inputs are not equivalent.
const EXIT_NOT_EQUIVALENT: i32 = 1;
/// Exit status for any error.
const EXIT_ERROR: i32 = 2;

#[derive(Parser)]
#[command(name = "ferro-srs")]
#[command(author, version, about = "Spatial reference system identification and equivalence")]
#[command(
    long_about = "Identify spatial reference systems from EPSG codes, WKT or proj4 text, and \
decide whether two encodings denote the same system.

Examples:
  ferro-srs identify 4326
  ferro-srs identify '+proj=utm +zone=17 +datum=WGS84 +units=m +no_defs'
  ferro-srs identify -i codes.txt --format json
  ferro-srs equivalent 4326 EPSG:4326
  ferro-srs canonicalize 'GEOGCS[\"WGS 84\",UNIT[\"degree\",0.0174532925199433]]'
  ferro-srs lookup EPSG:3857"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to .ferro-srs.toml, then ~/.config/ferro-srs/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Extra dataset files (JSON arrays of EPSG entries)
    #[arg(long, global = true)]
    definitions: Vec<PathBuf>,

    /// Log filter (e.g. info, debug, ferro_srs=trace)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output format
    #[arg(short = 'f', long, global = true, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    #[command(flatten)]
    identify: IdentifyFlags,
}

/// Identification settings that override the config file.
#[derive(Args, Debug, Default)]
struct IdentifyFlags {
    /// Which WKT leaf of an object input decides its code (last-match, first-match)
    #[arg(long, global = true)]
    object_code_policy: Option<ObjectCodePolicy>,

    /// WKT tier comparison mode (dialects, composite)
    #[arg(long, global = true)]
    wkt_comparison: Option<WktComparison>,

    /// Maximum nesting followed when walking object inputs
    #[arg(long, global = true, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    max_object_depth: Option<usize>,
}

impl IdentifyFlags {
    fn apply(&self, mut config: IdentifyConfig) -> IdentifyConfig {
        if let Some(policy) = self.object_code_policy {
            config = config.with_object_code_policy(policy);
        }
        if let Some(comparison) = self.wkt_comparison {
            config = config.with_wkt_comparison(comparison);
        }
        if let Some(depth) = self.max_object_depth {
            config = config.with_max_object_depth(depth);
        }
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Identify a coordinate system and print its descriptor
    Identify {
        /// EPSG code, EPSG:<code>, WKT or proj4 text
        value: Option<String>,

        /// Input file (one value per line; stdin when neither value nor file is given)
        #[arg(short, long, conflicts_with = "value")]
        input: Option<PathBuf>,
    },

    /// Check whether two inputs denote the same coordinate system
    Equivalent {
        a: String,
        b: String,

        /// Log every comparison tier
        #[arg(long)]
        debug: bool,
    },

    /// Print the canonical form of a WKT text
    Canonicalize {
        wkt: String,
    },

    /// Show what the registry knows about an identifier
    Lookup {
        /// EPSG:<code> or a bare code
        id: String,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(&cli.log_level) {
        eprintln!("ERROR: {}", e);
        std::process::exit(EXIT_ERROR);
    }

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            EXIT_ERROR
        }
    };
    std::process::exit(code);
}

fn init_tracing(level: &str) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter =
        EnvFilter::try_new(level).map_err(|e| format!("Invalid log level '{}': {}", level, e))?;

    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    Ok(())
}

fn run(cli: Cli) -> Result<i32, Box<dyn std::error::Error>> {
    let format: OutputFormat = cli.format.parse()?;
    let identifier = build_identifier(cli.config.as_deref(), &cli.definitions, &cli.identify)?;

    match cli.command {
        Commands::Identify { value, input } => run_identify(&identifier, value, input, format),
        Commands::Equivalent { a, b, debug } => run_equivalent(&identifier, &a, &b, debug, format),
        Commands::Canonicalize { wkt } => run_canonicalize(&wkt, format),
        Commands::Lookup { id } => run_lookup(identifier.registry(), &id, format),
    }
}

/// Load the config, apply flag overrides, extend the built-in registry, and
/// freeze both.
fn build_identifier(
    config_path: Option<&Path>,
    definitions: &[PathBuf],
    flags: &IdentifyFlags,
) -> Result<SrsIdentifier, SrsError> {
    let config = match config_path {
        Some(path) => FerroSrsConfig::load_from_path(path)?,
        None => FerroSrsConfig::load().unwrap_or_default(),
    };

    let mut registry = Registry::builtin();
    for path in config.registry.definitions.iter().chain(definitions) {
        let added = registry.extend_from_json(path)?;
        info!("Loaded {} dataset entries from {}", added, path.display());
    }
    debug!(
        "Registry ready: {} entries, {} definitions",
        registry.len(),
        registry.definition_count()
    );

    Ok(SrsIdentifier::new(Arc::new(registry), flags.apply(config.identify)))
}

fn run_identify(
    identifier: &SrsIdentifier,
    value: Option<String>,
    input: Option<PathBuf>,
    format: OutputFormat,
) -> Result<i32, Box<dyn std::error::Error>> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut err = io::stderr();

    if let Some(value) = value {
        return Ok(match identifier.identify(value.as_str()) {
            Ok(srs) => {
                output_descriptor(&mut out, &value, &srs, format)?;
                0
            }
            Err(e) => {
                output_error(&mut err, &value, &e, format)?;
                EXIT_ERROR
            }
        });
    }

    let reader: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(File::open(&path)?)),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut failed = 0usize;
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let Some(value) = process_input_line(&line, i == 0) else {
            continue;
        };
        match identifier.identify(value) {
            Ok(srs) => output_descriptor(&mut out, value, &srs, format)?,
            Err(e) => {
                failed += 1;
                output_error_with_context(&mut err, value, &e, format, Some(i + 1))?;
            }
        }
    }
    out.flush()?;

    if failed > 0 {
        info!("{} inputs failed", failed);
        Ok(EXIT_ERROR)
    } else {
        Ok(0)
    }
}

fn run_equivalent(
    identifier: &SrsIdentifier,
    a: &str,
    b: &str,
    debug: bool,
    format: OutputFormat,
) -> Result<i32, Box<dyn std::error::Error>> {
    let options = EquivalenceOptions { debug };
    match identifier.compare_with(a, b, options) {
        Ok(result) => {
            output_equivalence(&mut io::stdout(), a, b, &result, format)?;
            Ok(if result.is_equivalent() {
                0
            } else {
                EXIT_NOT_EQUIVALENT
            })
        }
        Err(e) => {
            output_error(&mut io::stderr(), &format!("{} / {}", a, b), &e, format)?;
            Ok(EXIT_ERROR)
        }
    }
}

fn run_canonicalize(wkt: &str, format: OutputFormat) -> Result<i32, Box<dyn std::error::Error>> {
    match parse_wkt(wkt) {
        Ok(node) => {
            let canonical = canonicalize_node(&node).to_string();
            output_text(&mut io::stdout(), wkt, &canonical, format)?;
            Ok(0)
        }
        Err(e) => {
            match format {
                OutputFormat::Json => output_error(&mut io::stderr(), wkt, &e, format)?,
                OutputFormat::Text => eprintln!("ERROR: {}", e.detailed_message(Some(wkt.trim()))),
            }
            Ok(EXIT_ERROR)
        }
    }
}

fn run_lookup(
    registry: &Registry,
    id: &str,
    format: OutputFormat,
) -> Result<i32, Box<dyn std::error::Error>> {
    let id = if id.chars().all(|c| c.is_ascii_digit()) {
        format!("EPSG:{}", id)
    } else {
        id.to_string()
    };

    let Some(bundle) = registry.lookup(&id) else {
        let e = SrsError::RegistryLookup { id: id.clone() };
        output_error(&mut io::stderr(), &id, &e, format)?;
        return Ok(EXIT_ERROR);
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({ "id": id, "registry": bundle });
            writeln!(out, "{}", value)?;
        }
        OutputFormat::Text => {
            writeln!(out, "{}", id)?;
            if let Some(proj4) = &bundle.proj4 {
                writeln!(out, "  proj4: {}", proj4)?;
            }
            if let Some(ogc) = &bundle.wkt_ogc {
                writeln!(out, "  wkt.ogc: {}", ogc)?;
            }
            if let Some(esri) = &bundle.wkt_esri {
                writeln!(out, "  wkt.esri: {}", esri)?;
            }
            let defined = bundle.proj4js.is_some();
            writeln!(out, "  definition: {}", if defined { "registered" } else { "none" })?;
        }
    }
    Ok(0)
}
