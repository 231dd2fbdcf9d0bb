//! Flat text output files.
//!
//! Both files are truncated when opened and written line by line, flushing
//! after every page or batch so an aborted run keeps what it had gathered.

use crate::links::page_link;
use anyhow::{Context, Result};
use shared::UrlLineFormat;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Create (or truncate) `path`, creating parent directories if needed
fn create_truncated(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))
}

/// Appends titles, one per line
pub struct TitleWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    written: usize,
}

impl TitleWriter {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let writer = BufWriter::new(create_truncated(&path)?);
        debug!(path = %path.display(), "Titles file truncated");
        Ok(Self {
            path,
            writer,
            written: 0,
        })
    }

    /// Append one page of titles and flush it to disk
    pub fn append_page(&mut self, titles: &[String]) -> Result<()> {
        for title in titles {
            writeln!(self.writer, "{}", title)
                .with_context(|| format!("Failed to write {}", self.path.display()))?;
        }
        self.writer
            .flush()
            .with_context(|| format!("Failed to flush {}", self.path.display()))?;
        self.written += titles.len();
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }
}

/// Read titles back, one per line, skipping blank lines
///
/// Only the line terminator is removed, so a title reads back exactly as
/// it was written.
pub fn read_titles(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read titles file: {}", path.display()))?;

    Ok(content
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Format one line of the URLs file (without the newline)
pub fn format_url_line(format: UrlLineFormat, wiki_base: &str, title: &str, url: &str) -> String {
    match format {
        UrlLineFormat::WithPageLink => format!("{} {}", url, page_link(wiki_base, title)),
        UrlLineFormat::UrlOnly => url.to_string(),
    }
}

/// Writes resolved URLs, one per title
pub struct UrlWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    format: UrlLineFormat,
    wiki_base: String,
    written: usize,
}

impl UrlWriter {
    pub fn create(path: impl AsRef<Path>, format: UrlLineFormat, wiki_base: &str) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let writer = BufWriter::new(create_truncated(&path)?);
        debug!(path = %path.display(), format = ?format, "URLs file truncated");
        Ok(Self {
            path,
            writer,
            format,
            wiki_base: wiki_base.to_string(),
            written: 0,
        })
    }

    pub fn write_record(&mut self, title: &str, url: &str) -> Result<()> {
        let line = format_url_line(self.format, &self.wiki_base, title, url);
        writeln!(self.writer, "{}", line)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        self.written += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .with_context(|| format!("Failed to flush {}", self.path.display()))
    }

    pub fn written(&self) -> usize {
        self.written
    }
}
