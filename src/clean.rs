//! Rewrites the raw cache into the canonical whitespace-normalized file.

use crate::error::{Error, Result};
use crate::fetch::Fetcher;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Replaces every tab with a single space, leaving everything else intact.
pub fn clean_line(line: &str) -> Cow<'_, str> {
    if line.contains('\t') {
        Cow::Owned(line.replace('\t', " "))
    } else {
        Cow::Borrowed(line)
    }
}

/// Produces the canonical file from the raw cache, fetching on a cache miss.
#[derive(Debug, Clone)]
pub struct Cleaner {
    raw_path: PathBuf,
    canonical_path: PathBuf,
}

impl Cleaner {
    pub fn new(raw_path: impl Into<PathBuf>, canonical_path: impl Into<PathBuf>) -> Self {
        Self {
            raw_path: raw_path.into(),
            canonical_path: canonical_path.into(),
        }
    }

    /// Writes the canonical file and returns its path.
    ///
    /// If the raw cache is missing, `fetcher` is called once and cleaning is
    /// retried once. Any other failure, including a second miss, propagates.
    #[tracing::instrument(skip(self, fetcher), fields(raw = %self.raw_path.display()))]
    pub async fn clean<F: Fetcher + ?Sized>(&self, fetcher: &F) -> Result<PathBuf> {
        let lines = match self.rewrite() {
            Err(e) if e.is_not_found() && e.path() == Some(self.raw_path.as_path()) => {
                warn!("Raw cache missing, fetching dataset");
                fetcher.fetch().await?;
                self.rewrite()?
            }
            other => other?,
        };

        info!(lines, canonical = %self.canonical_path.display(), "Canonical file written");
        Ok(self.canonical_path.clone())
    }

    fn rewrite(&self) -> Result<usize> {
        let raw = File::open(&self.raw_path).map_err(|e| Error::io(&self.raw_path, e))?;
        let out = File::create(&self.canonical_path).map_err(|e| Error::io(&self.canonical_path, e))?;

        let mut reader = BufReader::new(raw);
        let mut writer = BufWriter::new(out);
        let mut line = String::new();
        let mut count = 0;

        loop {
            line.clear();
            let read = reader
                .read_line(&mut line)
                .map_err(|e| Error::io(&self.raw_path, e))?;
            if read == 0 {
                break;
            }
            writer
                .write_all(clean_line(&line).as_bytes())
                .map_err(|e| Error::io(&self.canonical_path, e))?;
            count += 1;
        }

        writer.flush().map_err(|e| Error::io(&self.canonical_path, e))?;
        debug!(count, "Lines cleaned");
        Ok(count)
    }
}
