//! Hand-off of the current report between screens.
//!
//! Views publish the decoded report here as plain JSON and return
//! [`Route::Result`]; the result screen reads it back, in-process from the
//! slot or, in a later process, from the persisted `meetingResult` key.

pub mod slot;
pub mod store;

pub use slot::ResultSlot;
pub use store::{LocalStore, get_store_path};

use serde_json::Value;

use crate::error::Result;

pub const RESULT_KEY: &str = "meetingResult";

/// Screens a view can ask the front end to show next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Create,
    History,
    Result,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Create => "/",
            Route::History => "/history",
            Route::Result => "/result",
        }
    }
}

pub struct NavigationBridge {
    slot: ResultSlot<Value>,
    store: Option<LocalStore>,
}

impl NavigationBridge {
    pub fn in_memory() -> Self {
        Self {
            slot: ResultSlot::new(),
            store: None,
        }
    }

    pub fn persistent(store: LocalStore) -> Self {
        Self {
            slot: ResultSlot::new(),
            store: Some(store),
        }
    }

    /// Overwrite the current result. Nothing is written if persisting fails.
    pub async fn publish(&self, payload: Value) -> Result<()> {
        if let Some(store) = &self.store {
            store.set(RESULT_KEY, payload.clone()).await?;
        }
        self.slot.set(payload);
        Ok(())
    }

    pub fn current(&self) -> Option<Value> {
        self.slot.get()
    }

    /// Latest result, falling back to the persisted copy.
    pub async fn load(&self) -> Result<Option<Value>> {
        if let Some(payload) = self.slot.get() {
            return Ok(Some(payload));
        }
        match &self.store {
            Some(store) => store.get(RESULT_KEY).await,
            None => Ok(None),
        }
    }

    /// Forget the current result, in memory and on disk. Returns what was held.
    pub async fn clear(&self) -> Result<Option<Value>> {
        let in_memory = self.slot.take();
        let persisted = match &self.store {
            Some(store) => store.remove(RESULT_KEY).await?,
            None => None,
        };
        Ok(in_memory.or(persisted))
    }
}

impl Default for NavigationBridge {
    fn default() -> Self {
        Self::in_memory()
    }
}
