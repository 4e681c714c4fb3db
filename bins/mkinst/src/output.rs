use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
#[error("Could not write {}: {source}", .path.display())]
pub struct WriteError {
    pub path: PathBuf,
    pub source: io::Error,
}

/// A generated file, made of one or more rendered parts.
pub struct OutputFile<'a> {
    pub path: &'a Path,
    pub parts: Vec<&'a [u8]>,
}

impl<'a> OutputFile<'a> {
    pub fn new(path: &'a Path, parts: Vec<&'a [u8]>) -> Self {
        Self { path, parts }
    }
}

/// `table.rs` is staged as `.table.rs.tmp` in the same directory, so the final rename does not
/// cross file systems.
fn staging_path(path: &Path) -> io::Result<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "output path has no file name")
    })?;

    let mut staged = OsString::from(".");
    staged.push(name);
    staged.push(".tmp");
    Ok(path.with_file_name(staged))
}

fn write_parts(path: &Path, parts: &[&[u8]]) -> io::Result<()> {
    let mut file = File::create(path)?;
    for part in parts {
        file.write_all(part)?;
    }
    file.sync_all()
}

fn stage(file: &OutputFile) -> Result<PathBuf, WriteError> {
    let error = |source: io::Error| WriteError {
        path: file.path.to_owned(),
        source,
    };

    let staged = staging_path(file.path).map_err(error)?;
    if let Err(err) = write_parts(&staged, &file.parts) {
        discard(std::slice::from_ref(&staged));
        return Err(error(err));
    }

    Ok(staged)
}

fn discard(staged: &[PathBuf]) {
    for path in staged {
        if let Err(err) = fs::remove_file(path) {
            if err.kind() != io::ErrorKind::NotFound {
                warn!("Could not remove {}. ({})", path.display(), err);
            }
        }
    }
}

/// Writes all files or none of them. Every file is written to a staging file next to it first,
/// and the staging files are only moved into place once all of them were written.
pub fn write_files(files: &[OutputFile]) -> Result<(), WriteError> {
    let mut staged = Vec::with_capacity(files.len());

    for file in files {
        match stage(file) {
            Ok(path) => staged.push(path),
            Err(err) => {
                discard(&staged);
                return Err(err);
            }
        }
    }

    for (i, (file, path)) in files.iter().zip(&staged).enumerate() {
        info!("Writing {}", file.path.display());
        if let Err(source) = fs::rename(path, file.path) {
            discard(&staged[i..]);
            return Err(WriteError {
                path: file.path.to_owned(),
                source,
            });
        }
    }

    Ok(())
}

pub fn write_stdout(parts: &[&[u8]]) -> Result<(), WriteError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    parts
        .iter()
        .try_for_each(|part| out.write_all(part))
        .and_then(|()| out.flush())
        .map_err(|source| WriteError {
            path: PathBuf::from("<stdout>"),
            source,
        })
}
