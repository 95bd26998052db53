//! Stache CLI
//!
//! Usage:
//!   stache [OPTIONS] [TEMPLATE]
//!
//! Options:
//!   -d, --data <FILE>       Data file (JSON or TOML, chosen by extension)
//!   -p, --partials <DIR>    Directory of partial templates
//!       --ext <EXT>         Extension of partial files [default: mustache]
//!   -c, --config <FILE>     Render configuration (TOML format)
//!       --no-escape         Do not HTML-escape {{name}} output
//!   -v, --verbose           Log lambda calls and missing partials
//!   -h, --help              Print help

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use log::{debug, info};
use thiserror::Error;

use stache::{render_with_config, PartialRegistry, RenderConfig, Value};

#[derive(Parser)]
#[command(name = "stache")]
#[command(about = "Render Mustache templates")]
struct Cli {
    /// Template file (reads from stdin if not provided)
    template: Option<PathBuf>,

    /// Data file, JSON or TOML by extension
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Directory of partial templates, named by file stem
    #[arg(short, long)]
    partials: Option<PathBuf>,

    /// Extension of partial files
    #[arg(long, default_value = "mustache")]
    ext: String,

    /// Render configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Do not HTML-escape {{name}} output
    #[arg(long)]
    no_escape: bool,

    /// Log lambda calls and missing partials
    #[arg(short, long)]
    verbose: bool,
}

/// Errors from loading CLI inputs
#[derive(Debug, Error)]
enum LoadError {
    #[error("failed to read '{}': {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid JSON in '{}': {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid TOML in '{}': {source}", .path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("unsupported data format '{}': expected .json or .toml", .path.display())]
    UnknownFormat { path: PathBuf },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => match RenderConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => RenderConfig::default(),
    };
    if cli.no_escape {
        config.escape_html = false;
    }

    // Load data
    let data = match &cli.data {
        Some(path) => match load_data(path) {
            Ok(data) => data,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => Value::Null,
    };

    // Load partials
    let partials = match &cli.partials {
        Some(dir) => match load_partials(dir, &cli.ext) {
            Ok(partials) => partials,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => PartialRegistry::new(),
    };

    // Read template
    let (source, filename) = match &cli.template {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    match render_with_config(&source, &data, &partials, &config) {
        Ok(output) => {
            print!("{}", output);
        }
        Err(e) => {
            eprintln!("{}", e.format(&source, &filename));
            std::process::exit(1);
        }
    }
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_data(path: &Path) -> Result<Value, LoadError> {
    let content = read(path)?;
    let value = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str::<serde_json::Value>(&content)
            .map_err(|source| LoadError::Json {
                path: path.to_path_buf(),
                source,
            })?
            .into(),
        Some("toml") => toml::from_str::<toml::Value>(&content)
            .map_err(|source| LoadError::Toml {
                path: path.to_path_buf(),
                source,
            })?
            .into(),
        _ => {
            return Err(LoadError::UnknownFormat {
                path: path.to_path_buf(),
            })
        }
    };
    info!("loaded data from {}", path.display());
    Ok(value)
}

fn load_partials(dir: &Path, ext: &str) -> Result<PartialRegistry, LoadError> {
    let io_err = |source: io::Error| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut partials = PartialRegistry::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.extension().and_then(|e| e.to_str()) != Some(ext) {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        debug!("partial '{}' from {}", name, path.display());
        partials.insert(name, read(&path)?);
    }
    info!("loaded {} partials from {}", partials.len(), dir.display());
    Ok(partials)
}
