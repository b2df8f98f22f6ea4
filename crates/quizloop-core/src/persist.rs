//! Persisted hand-off between quiz runs and the results view.
//!
//! Two independent payloads live in two named slots so that a results view
//! can load the summary without knowing the session schema:
//!
//! - [`QUESTIONS_SLOT`] holds a [`QuestionSetPayload`]: the question set
//!   together with the full session state, so an interrupted quiz resumes
//!   by deserializing it.
//! - [`SUMMARY_SLOT`] holds a [`SummaryPayload`] written when a quiz ends.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SnapshotError;
use crate::session::QuizSession;
use crate::summary::QuizSummary;

/// Slot holding the question set and session progress.
pub const QUESTIONS_SLOT: &str = "quizQuestions";
/// Slot holding the final summary report.
pub const SUMMARY_SLOT: &str = "quizSummary";

pub const QUESTION_SET_VERSION: u32 = 1;
pub const SUMMARY_VERSION: u32 = 1;

/// Key-value storage for serialized payloads.
pub trait SlotStore {
    /// Read a slot, `None` if it has never been written or was removed.
    fn read(&self, slot: &str) -> Result<Option<String>>;
    fn write(&self, slot: &str, data: &str) -> Result<()>;
    /// Remove a slot. Removing a missing slot is not an error.
    fn remove(&self, slot: &str) -> Result<()>;
}

/// Stores each slot as `<dir>/<slot>.json`.
#[derive(Debug, Clone)]
pub struct FileSlotStore {
    dir: PathBuf,
}

impl FileSlotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.json"))
    }
}

impl SlotStore for FileSlotStore {
    fn read(&self, slot: &str) -> Result<Option<String>> {
        let path = self.slot_path(slot);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read slot from {}", path.display()))?;
        Ok(Some(content))
    }

    fn write(&self, slot: &str, data: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create state dir {}", self.dir.display()))?;
        let path = self.slot_path(slot);
        std::fs::write(&path, data)
            .with_context(|| format!("failed to write slot to {}", path.display()))?;
        Ok(())
    }

    fn remove(&self, slot: &str) -> Result<()> {
        let path = self.slot_path(slot);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("failed to remove slot {}", path.display()))
            }
        }
    }
}

/// In-memory slots, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemorySlotStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStore for MemorySlotStore {
    fn read(&self, slot: &str) -> Result<Option<String>> {
        Ok(self.slots.lock().unwrap().get(slot).cloned())
    }

    fn write(&self, slot: &str, data: &str) -> Result<()> {
        self.slots
            .lock()
            .unwrap()
            .insert(slot.to_string(), data.to_string());
        Ok(())
    }

    fn remove(&self, slot: &str) -> Result<()> {
        self.slots.lock().unwrap().remove(slot);
        Ok(())
    }
}

/// The question set with everything needed to resume the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSetPayload {
    pub version: u32,
    pub session_id: Uuid,
    #[serde(default)]
    pub quiz_title: Option<String>,
    pub saved_at: DateTime<Utc>,
    pub session: QuizSession,
}

impl QuestionSetPayload {
    pub fn new(session_id: Uuid, quiz_title: Option<String>, session: &QuizSession) -> Self {
        Self {
            version: QUESTION_SET_VERSION,
            session_id,
            quiz_title,
            saved_at: Utc::now(),
            session: session.clone(),
        }
    }

    /// Check the schema version and session invariants, then hand back the
    /// session ready to continue.
    pub fn into_session(self) -> std::result::Result<QuizSession, SnapshotError> {
        if self.version != QUESTION_SET_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                expected: QUESTION_SET_VERSION,
            });
        }
        self.session.check_consistency()?;
        Ok(self.session)
    }
}

/// The final report, readable on its own by a results view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryPayload {
    pub version: u32,
    pub session_id: Uuid,
    #[serde(default)]
    pub quiz_title: Option<String>,
    pub completed_at: DateTime<Utc>,
    pub summary: QuizSummary,
}

impl SummaryPayload {
    pub fn new(session_id: Uuid, quiz_title: Option<String>, summary: QuizSummary) -> Self {
        Self {
            version: SUMMARY_VERSION,
            session_id,
            quiz_title,
            completed_at: Utc::now(),
            summary,
        }
    }
}

pub fn save_question_set(store: &dyn SlotStore, payload: &QuestionSetPayload) -> Result<()> {
    let json = serde_json::to_string_pretty(payload).context("failed to serialize question set")?;
    store.write(QUESTIONS_SLOT, &json)
}

/// Load the saved question set, `None` if nothing is saved.
pub fn load_question_set(store: &dyn SlotStore) -> Result<Option<QuestionSetPayload>> {
    let Some(json) = store.read(QUESTIONS_SLOT)? else {
        return Ok(None);
    };
    let payload = serde_json::from_str(&json).context("failed to parse saved question set")?;
    Ok(Some(payload))
}

pub fn save_summary(store: &dyn SlotStore, payload: &SummaryPayload) -> Result<()> {
    let json = serde_json::to_string_pretty(payload).context("failed to serialize summary")?;
    store.write(SUMMARY_SLOT, &json)
}

/// Load the saved summary, `None` if no quiz has finished since the last start.
pub fn load_summary(store: &dyn SlotStore) -> Result<Option<SummaryPayload>> {
    let Some(json) = store.read(SUMMARY_SLOT)? else {
        return Ok(None);
    };
    let payload: SummaryPayload =
        serde_json::from_str(&json).context("failed to parse saved summary")?;
    if payload.version != SUMMARY_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            found: payload.version,
            expected: SUMMARY_VERSION,
        }
        .into());
    }
    Ok(Some(payload))
}

/// Store a fresh question set and drop any summary left from an older quiz.
pub fn begin_quiz(store: &dyn SlotStore, payload: &QuestionSetPayload) -> Result<()> {
    save_question_set(store, payload)?;
    store.remove(SUMMARY_SLOT)?;
    tracing::info!(session = %payload.session_id, "question set saved");
    Ok(())
}

/// Store both payloads for a finished quiz.
pub fn finish_quiz(
    store: &dyn SlotStore,
    questions: &QuestionSetPayload,
    summary: &SummaryPayload,
) -> Result<()> {
    save_summary(store, summary)?;
    save_question_set(store, questions)?;
    tracing::info!(session = %summary.session_id, "quiz results saved");
    Ok(())
}
