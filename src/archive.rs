//! Zip packaging for an extraction directory.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("io error on '{}' while packing: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

pub type ArchiveResult<T> = Result<T, ArchiveError>;

fn io_at(path: &Path) -> impl FnOnce(io::Error) -> ArchiveError + '_ {
    move |source| ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Pack every regular file in `dir` into a deflate-compressed zip at
/// `zip_path`, rooted under a `top_level/` folder inside the archive.
///
/// Entries go in sorted name order so the same file set always produces the
/// same archive layout. Contents are copied byte for byte; the source
/// directory is left untouched.
pub fn pack_directory(dir: &Path, zip_path: &Path, top_level: &str) -> ArchiveResult<()> {
    let mut names: Vec<String> = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_at(dir))? {
        let entry = entry.map_err(io_at(dir))?;
        let file_type = entry.file_type().map_err(io_at(dir))?;
        if file_type.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort_unstable();

    let file = File::create(zip_path).map_err(io_at(zip_path))?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    writer.add_directory(top_level, options)?;
    for name in &names {
        let path = dir.join(name);
        let bytes = fs::read(&path).map_err(io_at(&path))?;
        writer.start_file(format!("{top_level}/{name}"), options)?;
        writer.write_all(&bytes).map_err(io_at(zip_path))?;
    }
    writer.finish()?;
    Ok(())
}
