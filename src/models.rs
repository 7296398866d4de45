use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Canonical cognitive-distortion labels. The stored label is the exact
/// string shown in the picker, so unknown labels are rejected when a
/// payload is deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CognitiveDistortion {
    #[serde(rename = "All-or-Nothing Thinking")]
    AllOrNothingThinking,
    #[serde(rename = "Overgeneralization")]
    Overgeneralization,
    #[serde(rename = "Mental Filter")]
    MentalFilter,
    #[serde(rename = "Disqualifying the Positive")]
    DisqualifyingThePositive,
    #[serde(rename = "Jumping to Conclusions")]
    JumpingToConclusions,
    #[serde(rename = "Magnification or Minimization")]
    MagnificationOrMinimization,
    #[serde(rename = "Emotional Reasoning")]
    EmotionalReasoning,
    #[serde(rename = "Should Statements")]
    ShouldStatements,
    #[serde(rename = "Labeling")]
    Labeling,
    #[serde(rename = "Personalization")]
    Personalization,
}

/// Life domains for the daily activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityDomain {
    #[serde(rename = "Work/School")]
    WorkSchool,
    Family,
    Social,
    #[serde(rename = "Self-Care")]
    SelfCare,
    Exercise,
    Hobbies,
    Rest,
    Other,
}

/// Values-clarification categories. Used as map keys in the worksheet
/// payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValueCategory {
    Family,
    Relationships,
    #[serde(rename = "Work/Career")]
    WorkCareer,
    Education,
    Health,
    Spirituality,
    Community,
    Recreation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub password_salt: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: u64,
    pub created_at: DateTime<Utc>,
}

/// A stored thought record. Field names match the row store columns and
/// the wire format of the entries API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: u64,
    pub user_id: u64,
    pub created_at: DateTime<Utc>,
    pub situation: String,
    pub automatic_thought: String,
    pub emotion: String,
    pub emotion_intensity: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cognitive_distortion: Option<CognitiveDistortion>,
    pub rational_response: String,
    #[serde(default)]
    pub outcome: String,
}

impl MoodEntry {
    /// Overlays the provided patch fields; absent fields stay untouched.
    pub fn apply(&mut self, patch: &EntryPatch) {
        if let Some(situation) = &patch.situation {
            self.situation = situation.clone();
        }
        if let Some(thought) = &patch.automatic_thought {
            self.automatic_thought = thought.clone();
        }
        if let Some(emotion) = &patch.emotion {
            self.emotion = emotion.clone();
        }
        if let Some(intensity) = patch.emotion_intensity {
            self.emotion_intensity = intensity;
        }
        if let Some(distortion) = &patch.cognitive_distortion {
            self.cognitive_distortion = *distortion;
        }
        if let Some(response) = &patch.rational_response {
            self.rational_response = response.clone();
        }
        if let Some(outcome) = &patch.outcome {
            self.outcome = outcome.clone();
        }
    }
}

/// Insert payload for a new entry, already renamed to storage field names
/// by the dashboard form before submission.
#[derive(Debug, Clone, Deserialize)]
pub struct NewEntryRequest {
    pub situation: String,
    pub automatic_thought: String,
    pub emotion: String,
    pub emotion_intensity: u8,
    #[serde(default)]
    pub cognitive_distortion: Option<CognitiveDistortion>,
    pub rational_response: String,
    #[serde(default)]
    pub outcome: String,
}

impl NewEntryRequest {
    pub fn validate(&self) -> Result<(), String> {
        require("situation", &self.situation)?;
        require("automatic_thought", &self.automatic_thought)?;
        require("emotion", &self.emotion)?;
        require("rational_response", &self.rational_response)?;
        check_intensity("emotion_intensity", self.emotion_intensity)
    }
}

/// Partial update for an entry. Absent fields are left unchanged; the
/// distortion uses a nested option so an explicit `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryPatch {
    pub situation: Option<String>,
    pub automatic_thought: Option<String>,
    pub emotion: Option<String>,
    pub emotion_intensity: Option<u8>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub cognitive_distortion: Option<Option<CognitiveDistortion>>,
    pub rational_response: Option<String>,
    pub outcome: Option<String>,
}

impl EntryPatch {
    /// Required text fields may not be blanked out by a patch.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(situation) = &self.situation {
            require("situation", situation)?;
        }
        if let Some(thought) = &self.automatic_thought {
            require("automatic_thought", thought)?;
        }
        if let Some(emotion) = &self.emotion {
            require("emotion", emotion)?;
        }
        if let Some(response) = &self.rational_response {
            require("rational_response", response)?;
        }
        if let Some(intensity) = self.emotion_intensity {
            check_intensity("emotion_intensity", intensity)?;
        }
        Ok(())
    }
}

fn present_or_null<'de, D>(
    deserializer: D,
) -> Result<Option<Option<CognitiveDistortion>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::deserialize(deserializer).map(Some)
}

/// A stored worksheet submission. Append-only: there is no update or
/// delete path for these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worksheet {
    pub id: u64,
    pub user_id: u64,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: WorksheetPayload,
}

/// Kind-specific worksheet document, tagged the way submissions arrive
/// from the worksheets page: `{"kind": "...", "data": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "kebab-case")]
pub enum WorksheetPayload {
    ThoughtRecord(ThoughtRecord),
    ActivityLog(ActivityLog),
    ValuesClarification(ValuesClarification),
    WeeklyProgress(WeeklyProgress),
}

impl WorksheetPayload {
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::ThoughtRecord(record) => record.validate(),
            Self::ActivityLog(log) => log.validate(),
            Self::ValuesClarification(values) => values.validate(),
            Self::WeeklyProgress(progress) => progress.validate(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtRecord {
    pub situation: String,
    pub automatic_thought: String,
    pub emotion: String,
    pub emotion_intensity: u8,
    pub evidence_for: String,
    pub evidence_against: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cognitive_distortion: Option<CognitiveDistortion>,
    pub balanced_thought: String,
    pub new_emotion_intensity: u8,
}

impl ThoughtRecord {
    fn validate(&self) -> Result<(), String> {
        check_intensity("emotionIntensity", self.emotion_intensity)?;
        check_intensity("newEmotionIntensity", self.new_emotion_intensity)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLog {
    pub date: String,
    pub activities: Vec<ActivityItem>,
}

impl ActivityLog {
    fn validate(&self) -> Result<(), String> {
        if self.activities.is_empty() {
            return Err("activity log needs at least one activity".into());
        }
        for activity in &self.activities {
            check_intensity("moodBefore", activity.mood_before)?;
            check_intensity("moodAfter", activity.mood_after)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    pub domain: ActivityDomain,
    pub hours: String,
    pub mood_before: u8,
    pub mood_after: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValuesClarification(pub BTreeMap<ValueCategory, ValueRating>);

impl ValuesClarification {
    fn validate(&self) -> Result<(), String> {
        for rating in self.0.values() {
            check_intensity("importance", rating.importance)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueRating {
    pub importance: u8,
    #[serde(default)]
    pub action: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyProgress {
    pub weekly_goals: Vec<String>,
    pub achievements: String,
    pub challenges: String,
    pub next_steps: String,
}

impl WeeklyProgress {
    fn validate(&self) -> Result<(), String> {
        if self.weekly_goals.len() != 3 {
            return Err("weeklyGoals must have exactly 3 slots".into());
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub email: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub email: String,
}

fn require(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{field} is required"))
    } else {
        Ok(())
    }
}

fn check_intensity(field: &str, value: u8) -> Result<(), String> {
    if (1..=10).contains(&value) {
        Ok(())
    } else {
        Err(format!("{field} must be between 1 and 10"))
    }
}
