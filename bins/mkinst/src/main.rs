mod config;
mod output;

use std::borrow::Cow;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use config::{Args, Config, Format};
use data_sheet::{Diagnostics, AVR_DATA_SHEET};
use opcode_table::{Artifacts, CEmitter, Emitter, Error, Generated, RustEmitter};
use output::{OutputFile, WriteError};
use tracing::{error, info, Level};

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_source(input: Option<&Path>) -> std::io::Result<(String, Cow<'static, str>)> {
    match input {
        Some(path) => {
            info!("Reading data sheet from: {}", path.display());
            Ok((
                path.display().to_string(),
                Cow::Owned(std::fs::read_to_string(path)?),
            ))
        }
        None => {
            info!("Using the bundled AVR data sheet");
            Ok(("<avr>".to_owned(), Cow::Borrowed(AVR_DATA_SHEET)))
        }
    }
}

fn render(config: &Config, generated: &Generated) -> opcode_table::Result<Artifacts> {
    let emitter: Box<dyn Emitter + '_> = match config.format {
        Format::Rust => Box::new(RustEmitter::new(&config.options)),
        Format::C => Box::new(CEmitter::new(&config.options)),
    };

    generated.render(emitter.as_ref())
}

/// Files are written first, all or nothing, so a failed run never prints half of the output.
fn write_artifacts(config: &Config, artifacts: &Artifacts) -> Result<(), WriteError> {
    let table = artifacts.table.as_slice();
    let fields = artifacts.fields.as_slice();

    let mut files = vec![];
    let mut stdout = vec![];
    match (config.output.as_deref(), config.fields_output.as_deref()) {
        (Some(output), Some(fields_output)) => {
            files.push(OutputFile::new(output, vec![table]));
            files.push(OutputFile::new(fields_output, vec![fields]));
        }
        (Some(output), None) => files.push(OutputFile::new(output, vec![table, fields])),
        (None, Some(fields_output)) => {
            files.push(OutputFile::new(fields_output, vec![fields]));
            stdout.push(table);
        }
        (None, None) => stdout.extend([table, fields]),
    }

    output::write_files(&files)?;
    if !stdout.is_empty() {
        output::write_stdout(&stdout)?;
    }

    Ok(())
}

fn run(config: &Config) -> bool {
    let (path, source) = match read_source(config.input.as_deref()) {
        Ok(r) => r,
        Err(err) => {
            error!("Could not read data sheet. ({})", err);
            return false;
        }
    };

    let generated = match opcode_table::generate_from(source.as_bytes(), &config.options) {
        Ok(generated) => generated,
        Err(Error::Parse(err)) => {
            let mut diags = Diagnostics::new(&source, &path);
            if !diags.parse_error(&err) {
                error!("{}: {}", path, err);
            } else if let Err(print_err) = diags.print(&mut std::io::stderr()) {
                error!("{}: {} (could not print diagnostics: {})", path, err, print_err);
            }
            return false;
        }
        Err(err) => {
            error!("{}: {}", path, err);
            return false;
        }
    };

    if config.check {
        println!(
            "{}: {} words claimed, {} words go to {}, {} distinct shapes",
            path,
            generated.table.claimed(),
            generated.table.unmatched(),
            generated.table.default_handler(),
            generated.layouts.len()
        );
        return true;
    }

    // Render everything before touching any file.
    let artifacts = match render(config, &generated) {
        Ok(artifacts) => artifacts,
        Err(err) => {
            error!("{}", err);
            return false;
        }
    };

    match write_artifacts(config, &artifacts) {
        Ok(()) => true,
        Err(err) => {
            error!("{}", err);
            false
        }
    }
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match Config::load(args) {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            exit(1);
        }
    };

    if !run(&config) {
        exit(1);
    }
}
