//! File-backed location ledger.
//!
//! Append-mostly store of position samples, partitioned by subject and UTC
//! calendar day. History rows are never mutated or deleted; the only
//! overwrite is the per-subject latest-position record. Reads return rows
//! sorted by capture time ascending regardless of insertion order.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::model::LocationSample;

#[derive(Clone)]
pub struct LedgerStore {
    root: PathBuf,
}

impl LedgerStore {
    /// Open (creating if needed) a ledger rooted at `data_dir/ledger`.
    pub fn open(data_dir: &Path) -> Result<Self> {
        let root = data_dir.join("ledger");
        fs::create_dir_all(root.join("trails")).context("create trails dir")?;
        fs::create_dir_all(root.join("latest")).context("create latest dir")?;
        Ok(Self { root })
    }

    /// Append a history row under `(sample.subject, sample.day)`.
    pub fn insert_sample(&self, sample: &LocationSample) -> Result<()> {
        check_subject(&sample.subject)?;
        check_day(&sample.day)?;

        let path = self.trail_path(&sample.subject, &sample.day);
        let mut rows = read_rows(&path)?;
        rows.push(sample.clone());

        let bytes = serde_json::to_vec_pretty(&rows).context("serialize trail rows")?;
        write_atomic(&path, &bytes).context("write trail file")?;
        Ok(())
    }

    /// All rows for `(subject, day)`, sorted by capture time ascending.
    /// A subject/day with no rows yet reads back as an empty vec.
    pub fn query_day(&self, subject: &str, day: &str) -> Result<Vec<LocationSample>> {
        check_subject(subject)?;
        check_day(day)?;

        let mut rows = read_rows(&self.trail_path(subject, day))?;
        rows.sort_by_key(|row| row.captured_at);
        Ok(rows)
    }

    /// Upsert the subject's most recent position.
    pub fn set_latest(&self, sample: &LocationSample) -> Result<()> {
        check_subject(&sample.subject)?;
        let bytes = serde_json::to_vec_pretty(sample).context("serialize latest sample")?;
        write_atomic(&self.latest_path(&sample.subject), &bytes).context("write latest file")?;
        Ok(())
    }

    pub fn latest(&self, subject: &str) -> Result<Option<LocationSample>> {
        check_subject(subject)?;
        let path = self.latest_path(subject);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path).with_context(|| format!("read {}", path.display()))?;
        let sample: LocationSample =
            serde_json::from_slice(&bytes).context("parse latest sample")?;
        Ok(Some(sample))
    }

    fn trail_path(&self, subject: &str, day: &str) -> PathBuf {
        self.root
            .join("trails")
            .join(subject)
            .join(format!("{}.json", day))
    }

    fn latest_path(&self, subject: &str) -> PathBuf {
        self.root.join("latest").join(format!("{}.json", subject))
    }
}

fn read_rows(path: &Path) -> Result<Vec<LocationSample>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let rows: Vec<LocationSample> =
        serde_json::from_slice(&bytes).with_context(|| format!("parse {}", path.display()))?;
    Ok(rows)
}

// Subjects and days become path components; reject anything that could
// escape the store root.
fn check_subject(subject: &str) -> Result<()> {
    if subject.is_empty() {
        return Err(anyhow!("subject cannot be empty"));
    }
    if !subject
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(anyhow!("subject must be alphanumeric, '-' or '_'"));
    }
    Ok(())
}

fn check_day(day: &str) -> Result<()> {
    if day.len() != 8 || !day.chars().all(|c| c.is_ascii_digit()) {
        return Err(anyhow!("day bucket must be 8 digits (YYYYMMDD)"));
    }
    Ok(())
}

pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create dir {}", parent.display()))?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    fs::write(&tmp, bytes).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/ledger_tests.rs"]
mod tests;
