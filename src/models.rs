use crate::chart::{ChartSegment, LegendEntry};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A CSV picked by the operator, held in memory until uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvFile {
    pub name: String,
    pub content: Vec<u8>,
}

impl CsvFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }

    pub fn has_csv_extension(&self) -> bool {
        self.name.to_lowercase().ends_with(".csv")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub rows: Option<u64>,
    #[serde(default)]
    pub columns: Option<u64>,
}

/// Aggregate counts reported by `GET /payment-stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PaymentStatistics {
    pub total_people: u64,
    pub paid_full: u64,
    pub paid_partial: u64,
    pub not_paid: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl MessageResponse {
    pub fn reported(&self) -> Option<&str> {
        non_empty(self.message.as_deref()).or(non_empty(self.error.as_deref()))
    }
}

/// Body of a non-2xx response; every endpoint uses some subset of these fields.
pub type ErrorBody = MessageResponse;

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub text: String,
    pub tone: Tone,
}

impl StatusMessage {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    pub fn is_error(&self) -> bool {
        self.tone == Tone::Error
    }
}

/// Result of the last reminder attempt, kept only for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderRequestOutcome {
    pub message_text: String,
    pub is_error: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadView {
    pub selected_file: Option<String>,
    pub selected_size: Option<usize>,
    pub input_value: Option<String>,
    pub message: Option<StatusMessage>,
    pub is_uploading: bool,
    pub is_dragging: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsView {
    pub stats: Option<PaymentStatistics>,
    pub total_people: u64,
    pub segments: Vec<ChartSegment>,
    pub legend: Vec<LegendEntry>,
    pub error: Option<String>,
    pub loading: bool,
    pub reminders_disabled: bool,
    pub last_updated: Option<DateTime<Local>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReminderView {
    pub sending: bool,
    pub outcome: Option<ReminderRequestOutcome>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub upload: UploadView,
    pub stats: StatsView,
    pub reminders: ReminderView,
}

#[derive(Debug, Deserialize)]
pub struct DragRequest {
    pub dragging: bool,
}

#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SelectSource {
    #[default]
    Browse,
    Drop,
}

#[derive(Debug, Deserialize, Default)]
pub struct SelectQuery {
    #[serde(default)]
    pub source: SelectSource,
}
