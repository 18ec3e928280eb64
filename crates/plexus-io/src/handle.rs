// SPDX-FileCopyrightText: 2026 Plexus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lazily opened, seekable file handle.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use plexus_core::{AccessMode, PlexusError};
use tracing::debug;

/// Random access to one file.
///
/// The file is opened on first access with the handle's [`AccessMode`] and
/// stays open until [`FileHandle::close`] or drop. Read-only handles never
/// create the file; read-write handles create it when missing and never
/// truncate it. I/O errors are the operating system's, unchanged.
#[derive(Debug)]
pub struct FileHandle {
    path: PathBuf,
    mode: AccessMode,
    file: Option<File>,
}

impl FileHandle {
    /// A read-write handle on `path`. Nothing is opened yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mode: AccessMode::default(),
            file: None,
        }
    }

    pub fn with_mode(mut self, mode: AccessMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// Change the access mode of a handle that is not open.
    pub fn set_mode(&mut self, mode: AccessMode) -> Result<(), PlexusError> {
        if self.file.is_some() {
            return Err(PlexusError::InvalidState(format!(
                "file {} already initialized",
                self.path.display()
            )));
        }
        self.mode = mode;
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// The underlying file, opened on demand.
    pub fn file(&mut self) -> io::Result<&mut File> {
        if self.file.is_none() {
            let file = OpenOptions::new()
                .read(true)
                .write(self.mode.is_writable())
                .create(self.mode.is_writable())
                .truncate(false)
                .open(&self.path)?;
            debug!(path = %self.path.display(), mode = %self.mode, "file handle opened");
            self.file = Some(file);
        }
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::other("file handle not open"))
    }

    /// Current position from the start of the file.
    pub fn offset(&mut self) -> io::Result<u64> {
        self.file()?.stream_position()
    }

    pub fn length(&mut self) -> io::Result<u64> {
        Ok(self.file()?.metadata()?.len())
    }

    /// Move to absolute position `pos`; positions past the end are allowed.
    pub fn seek_to(&mut self, pos: u64) -> io::Result<()> {
        self.file()?.seek(SeekFrom::Start(pos)).map(|_| ())
    }

    /// Truncate or extend the file to `len` bytes.
    pub fn set_length(&mut self, len: u64) -> io::Result<()> {
        self.file()?.set_len(len)
    }

    /// Fill `buf` completely or fail with `UnexpectedEof`.
    pub fn read_fully(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.file()?.read_exact(buf)
    }

    /// Advance by up to `n` bytes without passing the end of the file.
    ///
    /// Returns the number of bytes actually skipped.
    pub fn skip_bytes(&mut self, n: u64) -> io::Result<u64> {
        let pos = self.offset()?;
        let len = self.length()?;
        let skipped = n.min(len.saturating_sub(pos));
        self.seek_to(pos + skipped)?;
        Ok(skipped)
    }

    /// Release the file. A later access opens it again.
    pub fn close(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
            debug!(path = %self.path.display(), "file handle closed");
        }
        Ok(())
    }
}

impl Read for FileHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file()?.read(buf)
    }
}

impl Write for FileHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl Seek for FileHandle {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file()?.seek(pos)
    }
}
