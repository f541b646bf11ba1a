//! Extension based lookup of lyrics readers and writers

use crate::error::{LyricsError, Result};
use crate::formats::{
    HrcsReader, HrcsWriter, HrcxReader, HrcxWriter, KrcReader, KrcWriter, KscReader, KscWriter,
    LrcReader, LrcWriter, LyricsReader, LyricsWriter,
};
use crate::model::{LyricsFormat, LyricsInfo};
use once_cell::sync::Lazy;
use sparkle_common::file_size::file_ext;
use std::path::Path;
use tracing::{debug, info};

static GLOBAL: Lazy<LyricsIo> = Lazy::new(LyricsIo::new);

/// Readers and writers for every supported format, in lookup priority
pub struct LyricsIo {
    readers: Vec<Box<dyn LyricsReader>>,
    writers: Vec<Box<dyn LyricsWriter>>,
}

impl Default for LyricsIo {
    fn default() -> Self {
        Self::new()
    }
}

impl LyricsIo {
    /// Registry with all built-in formats (krc, ksc, hrcx, hrcs, lrc)
    pub fn new() -> Self {
        let mut io = Self::empty();
        io.add_reader(Box::new(KrcReader));
        io.add_reader(Box::new(KscReader));
        io.add_reader(Box::new(HrcxReader));
        io.add_reader(Box::new(HrcsReader));
        io.add_reader(Box::new(LrcReader));

        io.add_writer(Box::new(KrcWriter));
        io.add_writer(Box::new(KscWriter));
        io.add_writer(Box::new(HrcxWriter));
        io.add_writer(Box::new(HrcsWriter));
        io.add_writer(Box::new(LrcWriter));
        io
    }

    /// Registry without any format
    pub fn empty() -> Self {
        Self {
            readers: Vec::new(),
            writers: Vec::new(),
        }
    }

    /// Shared instance with the built-in formats
    pub fn global() -> &'static LyricsIo {
        &GLOBAL
    }

    /// Register a reader unless its format already has one. Returns whether it was added.
    pub fn add_reader(&mut self, reader: Box<dyn LyricsReader>) -> bool {
        let format = reader.format();
        if self.readers.iter().any(|r| r.format() == format) {
            debug!(%format, "Reader already registered");
            return false;
        }
        self.readers.push(reader);
        true
    }

    /// Register a writer unless its format already has one. Returns whether it was added.
    pub fn add_writer(&mut self, writer: Box<dyn LyricsWriter>) -> bool {
        let format = writer.format();
        if self.writers.iter().any(|w| w.format() == format) {
            debug!(%format, "Writer already registered");
            return false;
        }
        self.writers.push(writer);
        true
    }

    /// Readable formats in priority order
    pub fn formats(&self) -> Vec<LyricsFormat> {
        self.readers.iter().map(|r| r.format()).collect()
    }

    /// Readable extensions (with a leading dot) in priority order
    pub fn supported_exts(&self) -> Vec<String> {
        self.readers
            .iter()
            .map(|r| format!(".{}", r.format().ext()))
            .collect()
    }

    pub fn reader_for(&self, file_name: &str) -> Option<&dyn LyricsReader> {
        let ext = file_ext(file_name);
        self.readers
            .iter()
            .find(|r| r.supports(&ext))
            .map(|r| r.as_ref())
    }

    pub fn writer_for(&self, file_name: &str) -> Option<&dyn LyricsWriter> {
        let ext = file_ext(file_name);
        self.writers
            .iter()
            .find(|w| w.supports(&ext))
            .map(|w| w.as_ref())
    }

    pub fn is_supported(&self, file_name: &str) -> bool {
        self.reader_for(file_name).is_some()
    }

    /// Read a lyrics file, choosing the reader by extension
    pub fn read_path(&self, path: &Path) -> Result<LyricsInfo> {
        let name = file_name(path);
        let reader = self
            .reader_for(&name)
            .ok_or_else(|| LyricsError::UnsupportedFormat(file_ext(&name)))?;
        reader.read_file(path)
    }

    /// Write a lyrics file, choosing the writer by extension
    pub fn write_path(&self, info: &LyricsInfo, path: &Path) -> Result<()> {
        let name = file_name(path);
        let writer = self
            .writer_for(&name)
            .ok_or_else(|| LyricsError::UnsupportedFormat(file_ext(&name)))?;
        writer.write_file(info, path)
    }

    /// Read `src` and write it to `dst` in the format of `dst`'s extension
    pub fn convert(&self, src: &Path, dst: &Path) -> Result<LyricsInfo> {
        let mut info = self.read_path(src)?;
        self.write_path(&info, dst)?;
        if let Some(format) = LyricsFormat::from_ext(&file_ext(&file_name(dst))) {
            info.format = format;
        }
        info!(
            src = %src.display(),
            dst = %dst.display(),
            lines = info.lines.len(),
            "Converted lyrics"
        );
        Ok(info)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
