use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;

use vigia::ledger::LedgerStore;
use vigia::model::AuthConfig;

use super::records::{Contact, MemoRecord, PanicAlert};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: AuthConfig,

    pub(crate) data_dir: PathBuf,

    /// Location ledger. Writes take the write lock so the per-day
    /// read-modify-write append cannot lose rows under concurrent reports.
    pub(crate) ledger: Arc<RwLock<LedgerStore>>,

    pub(crate) contacts: Arc<RwLock<HashMap<String, Vec<Contact>>>>,
    pub(crate) alerts: Arc<RwLock<Vec<PanicAlert>>>,
    pub(crate) memos: Arc<RwLock<HashMap<String, Vec<MemoRecord>>>>,
}
