use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use vigia::ledger::write_atomic;

use crate::types::{Contact, MemoRecord, PanicAlert};

pub(crate) fn contacts_path(data_dir: &Path) -> PathBuf {
    data_dir.join("contacts.json")
}

pub(crate) fn alerts_path(data_dir: &Path) -> PathBuf {
    data_dir.join("alerts.json")
}

pub(crate) fn memos_path(data_dir: &Path) -> PathBuf {
    data_dir.join("memos.json")
}

pub(crate) fn memo_blob_path(data_dir: &Path, subject: &str, memo_id: &str) -> PathBuf {
    data_dir
        .join("memos")
        .join(subject)
        .join(format!("{}.bin", memo_id))
}

type SafetyState = (
    HashMap<String, Vec<Contact>>,
    Vec<PanicAlert>,
    HashMap<String, Vec<MemoRecord>>,
);

pub(crate) fn load_safety_state(data_dir: &Path) -> Result<SafetyState> {
    let contacts: Vec<Contact> = load_list(&contacts_path(data_dir)).context("load contacts")?;
    let alerts: Vec<PanicAlert> = load_list(&alerts_path(data_dir)).context("load alerts")?;
    let memos: Vec<MemoRecord> = load_list(&memos_path(data_dir)).context("load memos")?;

    let mut contacts_by_subject: HashMap<String, Vec<Contact>> = HashMap::new();
    for contact in contacts {
        contacts_by_subject
            .entry(contact.subject.clone())
            .or_default()
            .push(contact);
    }

    let mut memos_by_subject: HashMap<String, Vec<MemoRecord>> = HashMap::new();
    for memo in memos {
        memos_by_subject
            .entry(memo.subject.clone())
            .or_default()
            .push(memo);
    }

    Ok((contacts_by_subject, alerts, memos_by_subject))
}

fn load_list<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let list: Vec<T> =
        serde_json::from_slice(&bytes).with_context(|| format!("parse {}", path.display()))?;
    Ok(list)
}

pub(crate) fn persist_contacts(
    data_dir: &Path,
    contacts: &HashMap<String, Vec<Contact>>,
) -> Result<()> {
    let mut list: Vec<Contact> = contacts.values().flatten().cloned().collect();
    list.sort_by(|a, b| {
        (a.subject.as_str(), a.created_at.as_str()).cmp(&(b.subject.as_str(), b.created_at.as_str()))
    });
    let bytes = serde_json::to_vec_pretty(&list).context("serialize contacts")?;
    write_atomic(&contacts_path(data_dir), &bytes).context("write contacts.json")?;
    Ok(())
}

pub(crate) fn persist_alerts(data_dir: &Path, alerts: &[PanicAlert]) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(alerts).context("serialize alerts")?;
    write_atomic(&alerts_path(data_dir), &bytes).context("write alerts.json")?;
    Ok(())
}

pub(crate) fn persist_memos(
    data_dir: &Path,
    memos: &HashMap<String, Vec<MemoRecord>>,
) -> Result<()> {
    let mut list: Vec<MemoRecord> = memos.values().flatten().cloned().collect();
    list.sort_by(|a, b| {
        (a.subject.as_str(), a.recorded_at.as_str()).cmp(&(b.subject.as_str(), b.recorded_at.as_str()))
    });
    let bytes = serde_json::to_vec_pretty(&list).context("serialize memos")?;
    write_atomic(&memos_path(data_dir), &bytes).context("write memos.json")?;
    Ok(())
}

/// Store memo audio under its content id. Re-uploading identical bytes is a
/// no-op.
pub(crate) fn store_memo_blob(
    data_dir: &Path,
    subject: &str,
    memo_id: &str,
    bytes: &[u8],
) -> Result<()> {
    let path = memo_blob_path(data_dir, subject, memo_id);
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir {}", parent.display()))?;
    }
    std::fs::write(&path, bytes).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
