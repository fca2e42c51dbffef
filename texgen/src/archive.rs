//! Zip package archives.
//!
//! Source packages are plain zip files. Writing goes through
//! [`PackageFile`], which builds the archive next to its destination
//! and only renames it into place on [`PackageFile::commit`]. A package
//! that is dropped or [`discard`](PackageFile::discard)ed leaves the
//! destination untouched.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::error::{TextureError, TextureResult};

/// Streaming writer for a package held in any seekable sink.
pub struct PackageWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    options: SimpleFileOptions,
}

impl<W: Write + Seek> PackageWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            zip: ZipWriter::new(inner),
            options: SimpleFileOptions::default(),
        }
    }

    /// Add one file to the archive.
    pub fn write_file(&mut self, name: &str, bytes: &[u8]) -> TextureResult<()> {
        self.zip.start_file(name, self.options)?;
        self.zip.write_all(bytes)?;
        Ok(())
    }

    /// Write the central directory and return the sink.
    pub fn finish(self) -> TextureResult<W> {
        Ok(self.zip.finish()?)
    }
}

/// A package being written to disk.
pub struct PackageFile {
    path: PathBuf,
    temp_path: PathBuf,
    writer: Option<PackageWriter<BufWriter<File>>>,
}

impl PackageFile {
    /// Start a new package that will replace `path` on commit.
    pub fn create(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut temp: OsString = path.as_os_str().to_owned();
        temp.push(".tmp");
        let temp_path = PathBuf::from(temp);

        let file = File::create(&temp_path)?;
        Ok(Self {
            path,
            temp_path,
            writer: Some(PackageWriter::new(BufWriter::new(file))),
        })
    }

    /// Destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_file(&mut self, name: &str, bytes: &[u8]) -> TextureResult<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.write_file(name, bytes),
            None => Err(TextureError::Archive("package already closed".to_string())),
        }
    }

    /// Finish the archive and move it to its destination.
    ///
    /// On failure the partial archive is removed and the destination is
    /// left as it was.
    pub fn commit(mut self) -> TextureResult<()> {
        let writer = self
            .writer
            .take()
            .ok_or_else(|| TextureError::Archive("package already closed".to_string()))?;

        let result = self.finish_into_place(writer);
        if let Err(ref err) = result {
            if let Err(e) = fs::remove_file(&self.temp_path) {
                warn!(path = %self.temp_path.display(), error = %e, "Failed to remove partial package");
            }
            debug!(path = %self.path.display(), error = %err, "Package commit failed");
        }
        result
    }

    fn finish_into_place(&self, writer: PackageWriter<BufWriter<File>>) -> TextureResult<()> {
        let file = writer
            .finish()?
            .into_inner()
            .map_err(|e| TextureError::Io(e.into_error()))?;
        file.sync_all()?;
        drop(file);

        fs::rename(&self.temp_path, &self.path)?;
        debug!(path = %self.path.display(), "Package committed");
        Ok(())
    }

    /// Abandon the package, removing the partial archive.
    pub fn discard(mut self) {
        self.remove_temp();
    }

    fn remove_temp(&mut self) {
        if self.writer.take().is_some() {
            if let Err(e) = fs::remove_file(&self.temp_path) {
                warn!(path = %self.temp_path.display(), error = %e, "Failed to remove partial package");
            } else {
                debug!(path = %self.path.display(), "Package discarded");
            }
        }
    }
}

impl Drop for PackageFile {
    fn drop(&mut self) {
        self.remove_temp();
    }
}

/// Random-access reader for a package.
pub struct PackageReader<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl PackageReader<BufReader<File>> {
    /// Open a package on disk.
    pub fn open(path: impl AsRef<Path>) -> TextureResult<Self> {
        let file = File::open(path.as_ref())?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> PackageReader<R> {
    pub fn new(reader: R) -> TextureResult<Self> {
        Ok(Self {
            archive: ZipArchive::new(reader)?,
        })
    }

    /// True if the archive has an entry with exactly this name.
    pub fn contains(&self, name: &str) -> bool {
        self.archive.file_names().any(|entry| entry == name)
    }

    /// Read one file fully into memory.
    pub fn read_file(&mut self, name: &str) -> TextureResult<Vec<u8>> {
        let mut entry = self
            .archive
            .by_name(name)
            .map_err(|e| TextureError::Archive(format!("{}: {}", name, e)))?;
        let mut data = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut data)?;
        Ok(data)
    }
}
