use crate::models::MoodEntry;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MoodPoint {
    pub date: String,
    pub intensity: u8,
}

/// Projects the entry list into the chart series: one point per record,
/// fetch order preserved, no aggregation. An empty list yields an empty
/// series and the page skips the chart entirely.
pub fn mood_series(entries: &[MoodEntry]) -> Vec<MoodPoint> {
    entries
        .iter()
        .map(|entry| MoodPoint {
            date: entry.created_at.format("%Y-%m-%d").to_string(),
            intensity: entry.emotion_intensity,
        })
        .collect()
}
