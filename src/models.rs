use serde::{Deserialize, Serialize};

pub const DEFAULT_EMOJI: &str = "🌟";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
}

impl Frequency {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
        }
    }
}

/// A tracked habit as persisted and exported.
///
/// `completed_dates` holds `YYYY-MM-DD` local calendar days in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default = "default_emoji")]
    pub emoji: String,
    #[serde(default)]
    pub frequency: Frequency,
    pub created_at: String,
    #[serde(default)]
    pub completed_dates: Vec<String>,
}

fn default_emoji() -> String {
    DEFAULT_EMOJI.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    pub selected_habits: Vec<String>,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub habits: Vec<Habit>,
    #[serde(default)]
    pub widget: Option<WidgetConfig>,
}

#[derive(Debug, Deserialize)]
pub struct NewHabit {
    pub name: String,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub frequency: Frequency,
}

#[derive(Debug, Deserialize, Default)]
pub struct HabitPatch {
    pub name: Option<String>,
    pub emoji: Option<String>,
    pub frequency: Option<Frequency>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ToggleRequest {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct WidgetConfigRequest {
    pub habits: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct DateQuery {
    pub date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitStats {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub completion_rate: u32,
    pub total_completions: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeekRow {
    pub start_date: String,
    pub end_date: String,
    pub days: Vec<bool>,
    pub completed: u8,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MonthRow {
    pub month: String,
    pub start_date: String,
    pub days: Vec<bool>,
    pub completed: u8,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HabitSummary {
    pub habit: Habit,
    pub completed: bool,
    pub stats: HabitStats,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HabitListResponse {
    pub date: String,
    pub habits: Vec<HabitSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HabitDetailResponse {
    pub habit: Habit,
    pub created_on: Option<String>,
    pub frequency_label: String,
    pub stats: HabitStats,
    pub history: Vec<WeekRow>,
    pub year: Vec<MonthRow>,
    pub completions: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub id: String,
    pub date: String,
    pub completed: bool,
    pub stats: HabitStats,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupFile {
    pub version: String,
    pub export_date: String,
    pub habits: Vec<Habit>,
    pub total_habits: usize,
    pub app_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImportResponse {
    pub imported: usize,
    pub export_date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedHabit {
    pub name: String,
    pub emoji: String,
    pub streak: u32,
    pub completion_rate: u32,
    pub total_completions: u32,
    pub created_at: String,
    pub frequency: Frequency,
    pub completed_dates: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitExport {
    pub version: String,
    pub export_date: String,
    pub export_type: String,
    pub habit: SharedHabit,
    pub app_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShareBundle {
    pub title: String,
    pub summary: String,
    pub motivational: String,
    pub file_name: String,
    pub export: HabitExport,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WidgetHabit {
    pub id: String,
    pub name: String,
    pub emoji: String,
    pub completed: bool,
    pub current_streak: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WidgetView {
    pub date: String,
    pub habits: Vec<WidgetHabit>,
    pub completed_count: usize,
    pub total: usize,
}
