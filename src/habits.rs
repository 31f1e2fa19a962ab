use crate::errors::AppError;
use crate::models::{AppData, DEFAULT_EMOJI, Habit, HabitPatch, NewHabit, ToggleRequest};
use crate::stats::{date_key, parse_date_key};
use chrono::{DateTime, Local, NaiveDate};
use std::collections::HashSet;
use tracing::info;

pub fn find_habit<'a>(data: &'a AppData, id: &str) -> Result<&'a Habit, AppError> {
    data.habits
        .iter()
        .find(|habit| habit.id == id)
        .ok_or_else(|| AppError::unknown_habit(id))
}

fn find_habit_mut<'a>(data: &'a mut AppData, id: &str) -> Result<&'a mut Habit, AppError> {
    data.habits
        .iter_mut()
        .find(|habit| habit.id == id)
        .ok_or_else(|| AppError::unknown_habit(id))
}

pub fn create_habit(
    data: &mut AppData,
    request: NewHabit,
    now: DateTime<Local>,
) -> Result<Habit, AppError> {
    let name = required_name(&request.name)?;
    let emoji = request
        .emoji
        .as_deref()
        .map(str::trim)
        .filter(|emoji| !emoji.is_empty())
        .unwrap_or(DEFAULT_EMOJI)
        .to_string();

    let mut id = now.timestamp_millis();
    while data.habits.iter().any(|habit| habit.id == id.to_string()) {
        id += 1;
    }

    let habit = Habit {
        id: id.to_string(),
        name,
        emoji,
        frequency: request.frequency,
        created_at: now.to_rfc3339(),
        completed_dates: Vec::new(),
    };
    info!(habit_id = %habit.id, name = %habit.name, "habit created");
    data.habits.push(habit.clone());
    Ok(habit)
}

pub fn edit_habit(data: &mut AppData, id: &str, patch: HabitPatch) -> Result<Habit, AppError> {
    let name = patch.name.as_deref().map(required_name).transpose()?;
    let habit = find_habit_mut(data, id)?;

    if let Some(name) = name {
        habit.name = name;
    }
    if let Some(emoji) = patch.emoji {
        let emoji = emoji.trim();
        if !emoji.is_empty() {
            habit.emoji = emoji.to_string();
        }
    }
    if let Some(frequency) = patch.frequency {
        habit.frequency = frequency;
    }
    Ok(habit.clone())
}

pub fn delete_habit(data: &mut AppData, id: &str) -> Result<Habit, AppError> {
    let index = data
        .habits
        .iter()
        .position(|habit| habit.id == id)
        .ok_or_else(|| AppError::unknown_habit(id))?;
    let removed = data.habits.remove(index);

    if let Some(widget) = data.widget.as_mut() {
        widget.selected_habits.retain(|selected| selected != id);
    }
    info!(habit_id = %removed.id, "habit deleted");
    Ok(removed)
}

/// Reorders habits to match `ids`, which must name every habit exactly once.
pub fn reorder_habits(data: &mut AppData, ids: &[String]) -> Result<(), AppError> {
    let unique: HashSet<&str> = ids.iter().map(String::as_str).collect();
    if ids.len() != data.habits.len()
        || unique.len() != ids.len()
        || data.habits.iter().any(|habit| !unique.contains(habit.id.as_str()))
    {
        return Err(AppError::bad_request("ids must list every habit exactly once"));
    }

    let mut remaining = std::mem::take(&mut data.habits);
    for id in ids {
        if let Some(index) = remaining.iter().position(|habit| habit.id == *id) {
            data.habits.push(remaining.swap_remove(index));
        }
    }
    Ok(())
}

/// Flips completion of `date` and returns whether the habit is now completed on it.
pub fn toggle_completion(
    data: &mut AppData,
    id: &str,
    date: NaiveDate,
    today: NaiveDate,
) -> Result<bool, AppError> {
    if date > today {
        return Err(AppError::bad_request("cannot complete a habit on a future date"));
    }

    let habit = find_habit_mut(data, id)?;
    let key = date_key(date);
    match habit.completed_dates.iter().position(|entry| *entry == key) {
        Some(index) => {
            habit.completed_dates.remove(index);
            Ok(false)
        }
        None => {
            habit.completed_dates.push(key);
            Ok(true)
        }
    }
}

/// Replaces the whole collection, as a restore from backup does.
pub fn replace_habits(data: &mut AppData, habits: Vec<Habit>) -> Result<usize, AppError> {
    let mut seen = HashSet::new();
    let mut cleaned = Vec::with_capacity(habits.len());

    for mut habit in habits {
        if habit.id.trim().is_empty() {
            return Err(AppError::bad_request("every habit needs an id"));
        }
        if habit.name.trim().is_empty() {
            return Err(AppError::bad_request(format!(
                "habit '{}' has an empty name",
                habit.id
            )));
        }
        if !seen.insert(habit.id.clone()) {
            return Err(AppError::bad_request(format!(
                "duplicate habit id '{}'",
                habit.id
            )));
        }

        let mut days = HashSet::new();
        habit.completed_dates.retain(|entry| days.insert(entry.clone()));
        cleaned.push(habit);
    }

    if let Some(widget) = data.widget.as_mut() {
        widget.selected_habits.retain(|id| seen.contains(id));
    }
    data.habits = cleaned;
    Ok(data.habits.len())
}

/// Parses an optional `YYYY-MM-DD` parameter, defaulting to `today`.
pub fn resolve_date(value: Option<&str>, today: NaiveDate) -> Result<NaiveDate, AppError> {
    match value.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => parse_date_key(value)
            .ok_or_else(|| AppError::bad_request("date must be formatted as YYYY-MM-DD")),
        None => Ok(today),
    }
}

/// Reads a toggle body. Only an empty body means "today"; anything else must be
/// a valid JSON request.
pub fn parse_toggle_body(body: &[u8]) -> Result<ToggleRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ToggleRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|err| AppError::bad_request(format!("invalid toggle request: {err}")))
}

fn required_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("habit name must not be empty"));
    }
    Ok(name.to_string())
}
