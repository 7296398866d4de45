use crate::models::{
    EntryPatch, MoodEntry, NewEntryRequest, Session, User, Worksheet, WorksheetPayload,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::{
    env,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tokio::fs;
use tracing::error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("entry not found")]
    EntryNotFound,
    #[error("failed to write data file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode data file: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The whole persisted document. The in-memory copy behind the state lock
/// is a cache of the file on disk; every successful mutation writes the
/// document back before the handler returns.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    pub users: Vec<User>,
    pub sessions: Vec<Session>,
    pub entries: Vec<MoodEntry>,
    pub worksheets: Vec<Worksheet>,
    next_user_id: u64,
    next_entry_id: u64,
    next_worksheet_id: u64,
}

impl AppData {
    pub fn allocate_user_id(&mut self) -> u64 {
        self.next_user_id += 1;
        self.next_user_id
    }

    /// The session user's entries, ordered by creation time ascending.
    pub fn entries_for(&self, user_id: u64) -> Vec<MoodEntry> {
        let mut entries: Vec<MoodEntry> = self
            .entries
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        entries
    }

    pub fn insert_entry(&mut self, user_id: u64, request: NewEntryRequest) -> MoodEntry {
        self.next_entry_id += 1;
        let entry = MoodEntry {
            id: self.next_entry_id,
            user_id,
            created_at: Utc::now(),
            situation: request.situation,
            automatic_thought: request.automatic_thought,
            emotion: request.emotion,
            emotion_intensity: request.emotion_intensity,
            cognitive_distortion: request.cognitive_distortion,
            rational_response: request.rational_response,
            outcome: request.outcome,
        };
        self.entries.push(entry.clone());
        entry
    }

    /// Applies a field patch to one of the user's entries and returns the
    /// merged record. A foreign or unknown id is the same error, so row
    /// ids never leak across users.
    pub fn update_entry(
        &mut self,
        user_id: u64,
        id: u64,
        patch: &EntryPatch,
    ) -> Result<MoodEntry, StoreError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.id == id && entry.user_id == user_id)
            .ok_or(StoreError::EntryNotFound)?;
        entry.apply(patch);
        Ok(entry.clone())
    }

    pub fn delete_entry(&mut self, user_id: u64, id: u64) -> Result<(), StoreError> {
        let position = self
            .entries
            .iter()
            .position(|entry| entry.id == id && entry.user_id == user_id)
            .ok_or(StoreError::EntryNotFound)?;
        self.entries.remove(position);
        Ok(())
    }

    pub fn insert_worksheet(&mut self, user_id: u64, payload: WorksheetPayload) -> Worksheet {
        self.next_worksheet_id += 1;
        let worksheet = Worksheet {
            id: self.next_worksheet_id,
            user_id,
            created_at: Utc::now(),
            payload,
        };
        self.worksheets.push(worksheet.clone());
        worksheet
    }

    pub fn worksheets_for(&self, user_id: u64) -> Vec<Worksheet> {
        let mut worksheets: Vec<Worksheet> = self
            .worksheets
            .iter()
            .filter(|worksheet| worksheet.user_id == user_id)
            .cloned()
            .collect();
        worksheets.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        worksheets
    }
}

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/journal.json"))
}

pub async fn load_data(path: &Path) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse data file: {err}");
                AppData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            AppData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), StoreError> {
    let payload = serde_json::to_vec_pretty(data)?;
    fs::write(path, payload).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CognitiveDistortion;

    fn new_request(situation: &str) -> NewEntryRequest {
        NewEntryRequest {
            situation: situation.into(),
            automatic_thought: "I'll fail".into(),
            emotion: "Anxiety".into(),
            emotion_intensity: 8,
            cognitive_distortion: Some(CognitiveDistortion::MagnificationOrMinimization),
            rational_response: "I've prepared well".into(),
            outcome: String::new(),
        }
    }

    #[test]
    fn insert_assigns_ids_and_preserves_order() {
        let mut data = AppData::default();
        let first = data.insert_entry(1, new_request("Meeting"));
        let second = data.insert_entry(1, new_request("Commute"));

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let listed = data.entries_for(1);
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].situation, "Meeting");
        assert_eq!(listed[1].situation, "Commute");
    }

    #[test]
    fn listing_is_scoped_to_the_owner() {
        let mut data = AppData::default();
        data.insert_entry(1, new_request("Mine"));
        data.insert_entry(2, new_request("Theirs"));

        let mine = data.entries_for(1);
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].situation, "Mine");
        assert!(data.entries_for(3).is_empty());
    }

    #[test]
    fn update_merges_patch_into_stored_entry() {
        let mut data = AppData::default();
        let entry = data.insert_entry(1, new_request("Meeting"));

        let patch = EntryPatch {
            emotion_intensity: Some(3),
            ..EntryPatch::default()
        };
        let merged = data.update_entry(1, entry.id, &patch).unwrap();

        assert_eq!(merged.emotion_intensity, 3);
        assert_eq!(merged.situation, "Meeting");
        assert_eq!(data.entries_for(1)[0].emotion_intensity, 3);
    }

    #[test]
    fn update_hides_foreign_rows() {
        let mut data = AppData::default();
        let entry = data.insert_entry(1, new_request("Meeting"));

        let patch = EntryPatch::default();
        let err = data.update_entry(2, entry.id, &patch).unwrap_err();
        assert!(matches!(err, StoreError::EntryNotFound));
    }

    #[test]
    fn delete_removes_exactly_one_entry() {
        let mut data = AppData::default();
        let first = data.insert_entry(1, new_request("Meeting"));
        let second = data.insert_entry(1, new_request("Commute"));

        data.delete_entry(1, first.id).unwrap();

        let listed = data.entries_for(1);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, second.id);

        let err = data.delete_entry(1, first.id).unwrap_err();
        assert!(matches!(err, StoreError::EntryNotFound));
    }

    #[test]
    fn delete_hides_foreign_rows() {
        let mut data = AppData::default();
        let entry = data.insert_entry(1, new_request("Meeting"));

        assert!(data.delete_entry(2, entry.id).is_err());
        assert_eq!(data.entries_for(1).len(), 1);
    }

    #[test]
    fn worksheets_are_append_only_and_scoped() {
        let mut data = AppData::default();
        let payload: WorksheetPayload = serde_json::from_value(serde_json::json!({
            "kind": "weekly-progress",
            "data": {
                "weeklyGoals": ["sleep", "walk", "journal"],
                "achievements": "kept the streak",
                "challenges": "late nights",
                "nextSteps": "earlier alarm"
            }
        }))
        .unwrap();

        let first = data.insert_worksheet(1, payload.clone());
        data.insert_worksheet(2, payload);

        assert_eq!(first.id, 1);
        let mine = data.worksheets_for(1);
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, first.id);
    }

    #[test]
    fn document_round_trips_through_json() {
        let mut data = AppData::default();
        data.insert_entry(1, new_request("Meeting"));

        let bytes = serde_json::to_vec_pretty(&data).unwrap();
        let reloaded: AppData = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(reloaded.entries.len(), 1);
        assert_eq!(reloaded.entries_for(1)[0].situation, "Meeting");

        // id allocation continues where the reloaded document left off
        let mut reloaded = reloaded;
        let next = reloaded.insert_entry(1, new_request("Commute"));
        assert_eq!(next.id, 2);
    }
}
