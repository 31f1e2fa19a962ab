use crate::errors::AppError;
use crate::habits::replace_habits;
use crate::models::{AppData, BackupFile, Habit, HabitExport, ShareBundle, SharedHabit};
use crate::stats::{date_key, habit_stats_at};
use chrono::{DateTime, Local, NaiveDate, SecondsFormat};
use serde::Deserialize;
use tracing::info;

pub const APP_NAME: &str = "Lunar Habit Tracker";
pub const FORMAT_VERSION: &str = "1.0";

/// Lenient view of a backup document; only `habits` is required.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncomingBackup {
    habits: Vec<Habit>,
    #[serde(default)]
    export_date: Option<String>,
}

pub fn export_backup(habits: &[Habit], now: DateTime<Local>) -> BackupFile {
    BackupFile {
        version: FORMAT_VERSION.to_string(),
        export_date: timestamp(now),
        habits: habits.to_vec(),
        total_habits: habits.len(),
        app_name: APP_NAME.to_string(),
    }
}

pub fn backup_file_name(today: NaiveDate) -> String {
    format!("lunar-habits-backup-{}.json", date_key(today))
}

/// Restores habits from a backup document, replacing the current collection.
/// Returns the number of habits imported and the backup's export date, if any.
pub fn import_backup(data: &mut AppData, payload: &[u8]) -> Result<(usize, Option<String>), AppError> {
    let incoming: IncomingBackup = serde_json::from_slice(payload)
        .map_err(|err| AppError::bad_request(format!("Invalid file format: {err}")))?;

    let imported = replace_habits(data, incoming.habits)?;
    info!(imported, export_date = ?incoming.export_date, "habits restored from backup");
    Ok((imported, incoming.export_date))
}

pub fn share_habit(habit: &Habit, today: NaiveDate, now: DateTime<Local>) -> ShareBundle {
    let stats = habit_stats_at(today, habit);
    let title = format!("{} {}", habit.emoji, habit.name);
    let summary = format!(
        "🔥 Current Streak: {} days\n📊 Success Rate: {}%\n📅 Total Completions: {}\n⭐ Tracked with {}",
        stats.current_streak, stats.completion_rate, stats.total_completions, APP_NAME
    );

    ShareBundle {
        motivational: motivational_message(habit, stats.current_streak),
        file_name: format!(
            "lunar-habit-{}-{}.json",
            file_safe_name(&habit.name),
            date_key(today)
        ),
        export: HabitExport {
            version: FORMAT_VERSION.to_string(),
            export_date: timestamp(now),
            export_type: "single_habit".to_string(),
            habit: SharedHabit {
                name: habit.name.clone(),
                emoji: habit.emoji.clone(),
                streak: stats.current_streak,
                completion_rate: stats.completion_rate,
                total_completions: stats.total_completions,
                created_at: habit.created_at.clone(),
                frequency: habit.frequency,
                completed_dates: habit.completed_dates.clone(),
            },
            app_name: APP_NAME.to_string(),
        },
        title,
        summary,
    }
}

pub fn motivational_message(habit: &Habit, streak: u32) -> String {
    let emoji = &habit.emoji;
    let name = &habit.name;
    match streak {
        0 => format!(
            "Starting my {emoji} {name} journey today! 🚀\n\nSmall steps lead to big changes. Here's to building better habits with Lunar! 🌙✨"
        ),
        1..=6 => format!(
            "{emoji} {name} - Day {streak}! 💪\n\nBuilding momentum one day at a time. Every small step counts! 🌟\n\n#HabitTracker #LunarApp"
        ),
        7..=29 => format!(
            "🔥 {streak} days strong with {emoji} {name}!\n\nConsistency is key, and I'm proving it to myself every day. 💯\n\n#{streak}DayStreak #LunarHabits"
        ),
        _ => format!(
            "🏆 MILESTONE ACHIEVED! 🏆\n\n{emoji} {name} - {streak} days and counting!\n\nThis is what dedication looks like. Big dreams start with small habits! 🌙🚀\n\n#{streak}Days #HabitMaster #LunarApp"
        ),
    }
}

fn file_safe_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

fn timestamp(now: DateTime<Local>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, false)
}
