//! CSV report sink.
//!
//! Rows are joined with commas and written as-is; any quoting was applied
//! when the values were rendered. Every write is flushed so an interrupted
//! run leaves a readable partial report. The header carries no trailing
//! newline and each row is preceded by one, so the file never ends in a
//! blank line.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Append-only CSV writer
#[derive(Debug)]
pub struct ReportWriter {
    path: PathBuf,
    file: Option<File>,
    rows: usize,
}

impl ReportWriter {
    /// Create (or truncate) the report at `path`, creating parent directories.
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let file = File::create(&path).await?;
        debug!("Opened report {}", path.display());
        Ok(Self {
            path,
            file: Some(file),
            rows: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Data rows written so far
    pub fn rows(&self) -> usize {
        self.rows
    }

    async fn write(&mut self, text: &str) -> io::Result<()> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::other("report already closed"))?;
        file.write_all(text.as_bytes()).await?;
        file.flush().await
    }

    /// Write the header row
    pub async fn write_header<I, S>(&mut self, columns: I) -> io::Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let line = join(columns);
        self.write(&line).await
    }

    /// Append one data row
    pub async fn append_row<I, S>(&mut self, values: I) -> io::Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let line = format!("\n{}", join(values));
        self.write(&line).await?;
        self.rows += 1;
        Ok(())
    }

    /// Flush and release the file. Later writes fail.
    pub async fn close(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush().await?;
            file.sync_all().await?;
        }
        Ok(())
    }
}

fn join<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| v.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(",")
}
