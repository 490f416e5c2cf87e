use crate::catalog::{self, Workout};
use crate::errors::{AppError, ValidationError};
use crate::export::{build_export, export_file_name, ExportBundle};
use crate::models::{
    Activity, ActivityForm, ActivitySummary, AppSettings, CompletedWorkout, DataCounts,
    HeartRateEntry, HeartRateForm, HeartRateSummary, Meal, MealForm, NutritionSummary, Profile,
    ProfileSummary, RecordId, ScheduleForm, ScheduledWorkout, SleepEntry, SleepForm, SleepSummary,
    WorkoutGoal, hhmm,
};
use crate::mutators;
use crate::state::AppState;
use crate::stats;
use crate::ui::{render_index, DashboardView};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let now = Utc::now();
    let view = state
        .with_repo(move |repo| DashboardView::build(now, repo))
        .await?;
    Ok(Html(render_index(&view)))
}

pub async fn list_activities(
    State(state): State<AppState>,
) -> Result<Json<Vec<Activity>>, AppError> {
    let items = state.with_repo(|repo| repo.load_activities()).await?;
    Ok(Json(items))
}

pub async fn create_activity(
    State(state): State<AppState>,
    Json(form): Json<ActivityForm>,
) -> Result<(StatusCode, Json<Activity>), AppError> {
    let now = Utc::now();
    let activity = state
        .with_repo(move |repo| mutators::record_activity(repo, form, now))
        .await??;
    Ok((StatusCode::CREATED, Json(activity)))
}

pub async fn delete_activity(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, AppError> {
    state
        .with_repo(move |repo| mutators::delete_activity(repo, id))
        .await??;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_meals(State(state): State<AppState>) -> Result<Json<Vec<Meal>>, AppError> {
    let items = state.with_repo(|repo| repo.load_meals()).await?;
    Ok(Json(items))
}

pub async fn create_meal(
    State(state): State<AppState>,
    Json(form): Json<MealForm>,
) -> Result<(StatusCode, Json<Meal>), AppError> {
    let now = Utc::now();
    let meal = state
        .with_repo(move |repo| mutators::record_meal(repo, form, now))
        .await??;
    Ok((StatusCode::CREATED, Json(meal)))
}

pub async fn delete_meal(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, AppError> {
    state
        .with_repo(move |repo| mutators::delete_meal(repo, id))
        .await??;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_sleep(State(state): State<AppState>) -> Result<Json<Vec<SleepEntry>>, AppError> {
    let items = state.with_repo(|repo| repo.load_sleep()).await?;
    Ok(Json(items))
}

pub async fn create_sleep(
    State(state): State<AppState>,
    Json(form): Json<SleepForm>,
) -> Result<(StatusCode, Json<SleepEntry>), AppError> {
    let now = Utc::now();
    let entry = state
        .with_repo(move |repo| mutators::record_sleep(repo, form, now))
        .await??;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn delete_sleep(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, AppError> {
    state
        .with_repo(move |repo| mutators::delete_sleep(repo, id))
        .await??;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_heart_rate(
    State(state): State<AppState>,
) -> Result<Json<Vec<HeartRateEntry>>, AppError> {
    let items = state.with_repo(|repo| repo.load_heart_rate()).await?;
    Ok(Json(items))
}

pub async fn create_heart_rate(
    State(state): State<AppState>,
    Json(form): Json<HeartRateForm>,
) -> Result<(StatusCode, Json<HeartRateEntry>), AppError> {
    let now = Utc::now();
    let entry = state
        .with_repo(move |repo| mutators::record_heart_rate(repo, form, now))
        .await??;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn delete_heart_rate(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, AppError> {
    state
        .with_repo(move |repo| mutators::delete_heart_rate(repo, id))
        .await??;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_schedule(
    State(state): State<AppState>,
) -> Result<Json<Vec<ScheduledWorkout>>, AppError> {
    let items = state.with_repo(|repo| repo.load_scheduled_workouts()).await?;
    Ok(Json(items))
}

pub async fn create_schedule(
    State(state): State<AppState>,
    Json(form): Json<ScheduleForm>,
) -> Result<(StatusCode, Json<ScheduledWorkout>), AppError> {
    let now = Utc::now();
    let scheduled = state
        .with_repo(move |repo| mutators::schedule_workout(repo, form, now))
        .await??;
    Ok((StatusCode::CREATED, Json(scheduled)))
}

pub async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(form): Json<ScheduleForm>,
) -> Result<Json<ScheduledWorkout>, AppError> {
    state
        .with_repo(move |repo| mutators::update_scheduled_workout(repo, id, form))
        .await??
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("no scheduled workout {id}")))
}

pub async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, AppError> {
    state
        .with_repo(move |repo| mutators::delete_scheduled_workout(repo, id))
        .await??;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct WorkoutQuery {
    pub goal: Option<String>,
}

pub async fn list_workouts(
    Query(query): Query<WorkoutQuery>,
) -> Result<Json<Vec<&'static Workout>>, AppError> {
    let goal = match query.goal.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(raw) => Some(parse_goal(raw)?),
    };
    Ok(Json(catalog::workouts_for_goal(goal)))
}

fn parse_goal(raw: &str) -> Result<WorkoutGoal, AppError> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| AppError::bad_request(format!("unknown workout goal '{raw}'")))
}

pub async fn start_workout(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<(StatusCode, Json<CompletedWorkout>), AppError> {
    let now = Utc::now();
    let completed = state
        .with_repo(move |repo| mutators::start_workout(repo, id, now))
        .await??;
    Ok((StatusCode::CREATED, Json(completed)))
}

pub async fn get_profile(State(state): State<AppState>) -> Result<Json<Profile>, AppError> {
    let profile = state.with_repo(|repo| repo.load_profile()).await?;
    Ok(Json(profile))
}

pub async fn put_profile(
    State(state): State<AppState>,
    Json(profile): Json<Profile>,
) -> Result<Json<ProfileSummary>, AppError> {
    let summary = stats::build_profile_summary(&profile);
    state
        .with_repo(move |repo| mutators::save_profile(repo, &profile))
        .await??;
    Ok(Json(summary))
}

pub async fn get_settings(State(state): State<AppState>) -> Result<Json<AppSettings>, AppError> {
    let settings = state.with_repo(|repo| repo.load_effective_settings()).await?;
    Ok(Json(settings))
}

pub async fn put_settings(
    State(state): State<AppState>,
    Json(settings): Json<AppSettings>,
) -> Result<Json<AppSettings>, AppError> {
    let saved = settings.clone();
    state
        .with_repo(move |repo| mutators::save_settings(repo, &saved))
        .await??;
    Ok(Json(settings))
}

pub async fn nutrition_stats(
    State(state): State<AppState>,
) -> Result<Json<NutritionSummary>, AppError> {
    let (meals, profile) = state
        .with_repo(|repo| (repo.load_meals(), repo.load_profile()))
        .await?;
    Ok(Json(stats::build_nutrition_at(Utc::now(), &meals, &profile)))
}

pub async fn sleep_stats(State(state): State<AppState>) -> Result<Json<SleepSummary>, AppError> {
    let entries = state.with_repo(|repo| repo.load_sleep()).await?;
    Ok(Json(stats::build_sleep_at(Utc::now(), &entries)))
}

pub async fn heart_rate_stats(
    State(state): State<AppState>,
) -> Result<Json<HeartRateSummary>, AppError> {
    let entries = state.with_repo(|repo| repo.load_heart_rate()).await?;
    Ok(Json(stats::build_heart_rate_at(Utc::now(), &entries)))
}

pub async fn activity_stats(
    State(state): State<AppState>,
) -> Result<Json<ActivitySummary>, AppError> {
    let activities = state.with_repo(|repo| repo.load_activities()).await?;
    Ok(Json(stats::build_activity_at(Utc::now(), &activities)))
}

pub async fn profile_stats(
    State(state): State<AppState>,
) -> Result<Json<ProfileSummary>, AppError> {
    let profile = state.with_repo(|repo| repo.load_profile()).await?;
    Ok(Json(stats::build_profile_summary(&profile)))
}

#[derive(Debug, Deserialize)]
pub struct EndTimeQuery {
    pub start: String,
    pub duration: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndTimeResponse {
    pub start_time: String,
    pub end_time: String,
}

pub async fn end_time(Query(query): Query<EndTimeQuery>) -> Result<Json<EndTimeResponse>, AppError> {
    let start = hhmm::parse(&query.start)
        .ok_or_else(|| ValidationError::InvalidTime(query.start.clone()))?;
    Ok(Json(EndTimeResponse {
        start_time: hhmm::format(start),
        end_time: hhmm::format(stats::end_time(start, query.duration)),
    }))
}

pub async fn data_counts(State(state): State<AppState>) -> Result<Json<DataCounts>, AppError> {
    let counts = state.with_repo(|repo| repo.data_counts()).await?;
    Ok(Json(counts))
}

pub async fn export(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let bundle: ExportBundle = state.with_repo(build_export).await?;
    let disposition = format!("attachment; filename=\"{}\"", export_file_name(Utc::now()));
    Ok(([(header::CONTENT_DISPOSITION, disposition)], Json(bundle)))
}
