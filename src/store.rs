//! Single-slot document store.
//!
//! Holds the text of the most recently uploaded document. The store is an
//! ordinary value shared through the server state, not a global. Each
//! upload replaces the slot wholesale; the text itself is an `Arc<str>`, so
//! a reader racing a writer sees either the old or the new document in
//! full, never a mix. Last writer wins.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock};

use crate::text_util::char_len;

struct Slot {
    text: Arc<str>,
    filename: Option<String>,
    uploaded_at: Option<DateTime<Utc>>,
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            text: Arc::from(""),
            filename: None,
            uploaded_at: None,
        }
    }
}

/// The stored document together with its upload metadata.
#[derive(Debug, Clone)]
pub struct DocumentSnapshot {
    pub text: Arc<str>,
    pub filename: Option<String>,
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// Metadata reported by `GET /api/document`.
#[derive(Debug, Serialize)]
pub struct DocumentStatus {
    pub loaded: bool,
    pub filename: Option<String>,
    pub chars: usize,
    pub uploaded_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
pub struct DocumentStore {
    slot: RwLock<Slot>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored text, clearing upload metadata.
    pub fn set(&self, text: impl Into<Arc<str>>) {
        self.replace(Slot {
            text: text.into(),
            filename: None,
            uploaded_at: None,
        });
    }

    /// Replaces the stored text with an upload's extracted text.
    pub fn set_upload(&self, filename: impl Into<String>, text: impl Into<Arc<str>>) {
        self.replace(Slot {
            text: text.into(),
            filename: Some(filename.into()),
            uploaded_at: Some(Utc::now()),
        });
    }

    /// Current text, or an empty string if nothing was ever stored.
    pub fn get(&self) -> Arc<str> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .text
            .clone()
    }

    pub fn snapshot(&self) -> DocumentSnapshot {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        DocumentSnapshot {
            text: slot.text.clone(),
            filename: slot.filename.clone(),
            uploaded_at: slot.uploaded_at,
        }
    }

    pub fn status(&self) -> DocumentStatus {
        let snap = self.snapshot();
        DocumentStatus {
            loaded: !snap.text.is_empty(),
            chars: char_len(&snap.text),
            filename: snap.filename,
            uploaded_at: snap.uploaded_at,
        }
    }

    fn replace(&self, slot: Slot) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = slot;
    }
}
