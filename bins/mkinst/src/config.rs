use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, ValueEnum};
use opcode_table::Options;
use serde::Deserialize;
use thiserror::Error;

/// Compiles an instruction data sheet into a 65536 entry dispatch table and operand extraction
/// code.
#[derive(Debug, Parser)]
#[command(name = "mkinst", version)]
pub struct Args {
    /// Data sheet to compile. The bundled AVR data sheet is used when omitted.
    pub input: Option<PathBuf>,

    /// Read settings from a TOML file. Command line flags override it.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Where to write the generated code. Standard output when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the operand extractions to a separate file.
    #[arg(long)]
    pub fields_output: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub format: Option<Format>,

    /// Handler for instruction words no template matches.
    #[arg(long)]
    pub default_handler: Option<String>,

    #[arg(long)]
    pub handler_prefix: Option<String>,

    #[arg(long)]
    pub table_name: Option<String>,

    /// Only validate the data sheet, write nothing.
    #[arg(long)]
    pub check: bool,

    /// More logging, repeat for more detail.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Rust,
    C,
}

/// Contents of a config file. Everything is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub fields_output: Option<PathBuf>,
    pub format: Option<Format>,
    pub emit: Options,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug)]
pub struct Config {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub fields_output: Option<PathBuf>,
    pub format: Format,
    pub check: bool,
    pub options: Options,
}

impl Config {
    pub fn load(args: Args) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => Self::read_file(path)?,
            None => FileConfig::default(),
        };

        Ok(Self::merge(args, file))
    }

    fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;

        toml::from_str(&source).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Command line flags win over the config file, which wins over the defaults.
    fn merge(args: Args, file: FileConfig) -> Self {
        let mut options = file.emit;
        if let Some(default_handler) = args.default_handler {
            options.default_handler = default_handler;
        }
        if let Some(handler_prefix) = args.handler_prefix {
            options.handler_prefix = handler_prefix;
        }
        if let Some(table_name) = args.table_name {
            options.table_name = table_name;
        }

        Self {
            input: args.input.or(file.input),
            output: args.output.or(file.output),
            fields_output: args.fields_output.or(file.fields_output),
            format: args.format.or(file.format).unwrap_or_default(),
            check: args.check,
            options,
        }
    }
}
