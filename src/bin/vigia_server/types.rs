#[path = "types/app_state.rs"]
mod app_state;
#[path = "types/records.rs"]
mod records;

pub(crate) use self::app_state::AppState;
pub(crate) use self::records::{Contact, MemoRecord, PanicAlert};
