use crate::backup;
use crate::errors::AppError;
use crate::habits;
use crate::models::{
    DateQuery, Habit, HabitDetailResponse, HabitListResponse, HabitPatch, HabitSummary,
    ImportResponse, NewHabit, ReorderRequest, ShareBundle, ToggleResponse, WidgetConfig,
    WidgetConfigRequest, WidgetView,
};
use crate::state::AppState;
use crate::stats::{
    completion_history_at, completion_list, completion_year_at, created_on, date_key,
    habit_stats_at, is_completed_on,
};
use crate::ui::render_index;
use crate::widget;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use chrono::{Local, NaiveDate};
use tracing::info;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let today = today();
    let data = state.data.lock().await;
    Html(render_index(today, &data.habits))
}

pub async fn list_habits(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<HabitListResponse>, AppError> {
    let today = today();
    let date = habits::resolve_date(query.date.as_deref(), today)?;
    let data = state.data.lock().await;

    let summaries = data
        .habits
        .iter()
        .map(|habit| HabitSummary {
            completed: is_completed_on(habit, date),
            stats: habit_stats_at(today, habit),
            habit: habit.clone(),
        })
        .collect();

    Ok(Json(HabitListResponse {
        date: date_key(date),
        habits: summaries,
    }))
}

pub async fn create_habit(
    State(state): State<AppState>,
    Json(payload): Json<NewHabit>,
) -> Result<(StatusCode, Json<Habit>), AppError> {
    let habit = state
        .update(|data| habits::create_habit(data, payload, Local::now()))
        .await?;
    Ok((StatusCode::CREATED, Json(habit)))
}

pub async fn get_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HabitDetailResponse>, AppError> {
    let today = today();
    let data = state.data.lock().await;
    let habit = habits::find_habit(&data, &id)?;

    Ok(Json(HabitDetailResponse {
        created_on: created_on(habit).map(date_key),
        frequency_label: habit.frequency.label().to_string(),
        stats: habit_stats_at(today, habit),
        history: completion_history_at(today, habit),
        year: completion_year_at(today, habit),
        completions: completion_list(habit),
        habit: habit.clone(),
    }))
}

pub async fn update_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<HabitPatch>,
) -> Result<Json<Habit>, AppError> {
    let habit = state
        .update(|data| habits::edit_habit(data, &id, patch))
        .await?;
    Ok(Json(habit))
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.update(|data| habits::delete_habit(data, &id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<ToggleResponse>, AppError> {
    let today = today();
    let request = habits::parse_toggle_body(&body)?;
    let date = habits::resolve_date(request.date.as_deref(), today)?;

    let (completed, stats) = state
        .update(|data| {
            let completed = habits::toggle_completion(data, &id, date, today)?;
            let habit = habits::find_habit(data, &id)?;
            Ok((completed, habit_stats_at(today, habit)))
        })
        .await?;

    Ok(Json(ToggleResponse {
        id,
        date: date_key(date),
        completed,
        stats,
    }))
}

pub async fn share_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ShareBundle>, AppError> {
    let data = state.data.lock().await;
    let habit = habits::find_habit(&data, &id)?;
    Ok(Json(backup::share_habit(habit, today(), Local::now())))
}

pub async fn reorder_habits(
    State(state): State<AppState>,
    Json(payload): Json<ReorderRequest>,
) -> Result<StatusCode, AppError> {
    state
        .update(|data| habits::reorder_habits(data, &payload.ids))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn export_backup(State(state): State<AppState>) -> impl IntoResponse {
    let now = Local::now();
    let data = state.data.lock().await;
    let file = backup::export_backup(&data.habits, now);
    info!(habits = file.total_habits, "exporting backup");

    let disposition = format!(
        "attachment; filename=\"{}\"",
        backup::backup_file_name(now.date_naive())
    );
    ([(header::CONTENT_DISPOSITION, disposition)], Json(file))
}

pub async fn import_backup(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ImportResponse>, AppError> {
    let (imported, export_date) = state
        .update(|data| backup::import_backup(data, &body))
        .await?;
    Ok(Json(ImportResponse {
        imported,
        export_date,
    }))
}

pub async fn get_widget_config(State(state): State<AppState>) -> Json<Option<WidgetConfig>> {
    let data = state.data.lock().await;
    Json(data.widget.clone())
}

pub async fn set_widget_config(
    State(state): State<AppState>,
    Json(payload): Json<WidgetConfigRequest>,
) -> Result<Json<WidgetConfig>, AppError> {
    let config = state
        .update(|data| widget::configure_widget(data, payload.habits, Local::now()))
        .await?;
    Ok(Json(config))
}

pub async fn get_widget(State(state): State<AppState>) -> Json<WidgetView> {
    let data = state.data.lock().await;
    Json(widget::widget_view(&data, today()))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
