use crate::errors::AppError;
use crate::models::{AppData, WidgetConfig, WidgetHabit, WidgetView};
use crate::stats::{current_streak, date_key, is_completed_on};
use chrono::{DateTime, Local, NaiveDate, SecondsFormat};
use std::collections::HashSet;

pub const MAX_WIDGET_HABITS: usize = 4;

pub fn configure_widget(
    data: &mut AppData,
    ids: Vec<String>,
    now: DateTime<Local>,
) -> Result<WidgetConfig, AppError> {
    if ids.is_empty() {
        return Err(AppError::bad_request("select at least one habit for the widget"));
    }
    if ids.len() > MAX_WIDGET_HABITS {
        return Err(AppError::bad_request(format!(
            "the widget shows at most {MAX_WIDGET_HABITS} habits"
        )));
    }

    let mut seen = HashSet::new();
    for id in &ids {
        if !seen.insert(id.as_str()) {
            return Err(AppError::bad_request(format!("habit '{id}' selected twice")));
        }
        if !data.habits.iter().any(|habit| habit.id == *id) {
            return Err(AppError::unknown_habit(id));
        }
    }

    let config = WidgetConfig {
        selected_habits: ids,
        updated_at: now.to_rfc3339_opts(SecondsFormat::Millis, false),
    };
    data.widget = Some(config.clone());
    Ok(config)
}

pub fn widget_view(data: &AppData, today: NaiveDate) -> WidgetView {
    let selected = data
        .widget
        .as_ref()
        .map(|config| config.selected_habits.as_slice())
        .unwrap_or_default();

    let habits: Vec<WidgetHabit> = selected
        .iter()
        .filter_map(|id| data.habits.iter().find(|habit| habit.id == *id))
        .map(|habit| WidgetHabit {
            id: habit.id.clone(),
            name: habit.name.clone(),
            emoji: habit.emoji.clone(),
            completed: is_completed_on(habit, today),
            current_streak: current_streak(habit, today),
        })
        .collect();

    WidgetView {
        date: date_key(today),
        completed_count: habits.iter().filter(|habit| habit.completed).count(),
        total: habits.len(),
        habits,
    }
}
