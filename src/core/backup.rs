use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use crate::utils::path::{ensure_writable, require_absolute};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::FileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Copy the database file to `dest_file`, optionally zipped. Returns the
    /// path actually written.
    pub fn backup(db_path: &str, dest_file: &str, compress: bool, force: bool) -> AppResult<PathBuf> {
        let src = Path::new(db_path);
        let dest = require_absolute(dest_file)?;

        if !src.exists() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Database not found: {}", src.display()),
            )
            .into());
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        let final_path = if compress {
            let zip_path = dest.with_extension("zip");
            ensure_writable(&zip_path, force)?;
            compress_into(src, &zip_path)?;
            zip_path
        } else {
            ensure_writable(&dest, force)?;
            fs::copy(src, &dest)?;
            dest
        };

        success(format!("Backup created: {}", final_path.display()));
        Ok(final_path)
    }
}

/// Write `src` as the single entry of a deflated zip archive.
fn compress_into(src: &Path, zip_path: &Path) -> AppResult<()> {
    let file = fs::File::create(zip_path)?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let entry = src
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "database.sqlite".to_string());

    let mut f = fs::File::open(src)?;
    zip.start_file(entry, options).map_err(io::Error::other)?;
    io::copy(&mut f, &mut zip)?;
    if let Err(e) = zip.finish() {
        warning(format!("Failed to finalize archive {}: {e}", zip_path.display()));
        return Err(io::Error::other(e).into());
    }

    Ok(())
}
