/// Trusted contact in a subject's address book.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub(crate) struct Contact {
    pub(crate) id: String,
    pub(crate) subject: String,
    pub(crate) name: String,
    pub(crate) phone: String,
    pub(crate) created_at: String,
}

/// Record of a panic-button press. Delivery to contacts is an external
/// concern; the server only records and lists.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub(crate) struct PanicAlert {
    pub(crate) id: String,
    pub(crate) subject: String,
    pub(crate) raised_at: String,
}

/// Index entry for an uploaded voice memo. The audio bytes live on disk
/// under the content-addressed id; the index never stores them.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub(crate) struct MemoRecord {
    pub(crate) id: String,
    pub(crate) subject: String,
    pub(crate) bytes: u64,
    pub(crate) recorded_at: String,
}
