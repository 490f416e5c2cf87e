use crate::catalog::{self, Workout};
use crate::errors::{StoreError, ValidationError};
use crate::models::{
    Activity, ActivityForm, AppSettings, CompletedWorkout, HeartRateEntry, HeartRateForm,
    HeartRateType, Meal, MealForm, Profile, Record, RecordId, ScheduleForm, ScheduledWorkout,
    SleepEntry, SleepForm, hhmm,
};
use crate::stats::sleep_duration;
use crate::store::Repository;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

pub const BPM_RANGE: (u32, u32) = (30, 220);
pub const QUALITY_RANGE: (u8, u8) = (1, 5);
const DEFAULT_SLEEP_QUALITY: u8 = 3;
const DEFAULT_START_TIME: &str = "09:00";

#[derive(Debug, Error)]
pub enum MutationError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub fn next_id(now: DateTime<Utc>) -> RecordId {
    now.timestamp_millis()
}

/// Newest first.
pub fn prepend<T>(collection: Vec<T>, record: T) -> Vec<T> {
    let mut updated = Vec::with_capacity(collection.len() + 1);
    updated.push(record);
    updated.extend(collection);
    updated
}

pub fn remove_by_id<T: Record>(collection: Vec<T>, id: RecordId) -> Vec<T> {
    collection
        .into_iter()
        .filter(|record| record.id() != id)
        .collect()
}

/// Every element carrying the record's id is replaced, duplicates included.
pub fn replace_by_id<T: Record + Clone>(collection: Vec<T>, record: T) -> Vec<T> {
    let id = record.id();
    collection
        .into_iter()
        .map(|existing| {
            if existing.id() == id {
                record.clone()
            } else {
                existing
            }
        })
        .collect()
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::MissingField(field))
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    value
        .filter(|text| !text.trim().is_empty())
        .ok_or(ValidationError::MissingField(field))
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn parse_time(raw: &str) -> Result<NaiveTime, ValidationError> {
    hhmm::parse(raw).ok_or_else(|| ValidationError::InvalidTime(raw.to_string()))
}

fn in_range<T: Copy + PartialOrd + Into<i64>>(
    value: T,
    (min, max): (T, T),
    field: &'static str,
) -> Result<T, ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            min: min.into(),
            max: max.into(),
        });
    }
    Ok(value)
}

impl ActivityForm {
    pub fn into_activity(self, now: DateTime<Utc>) -> Result<Activity, ValidationError> {
        Ok(Activity {
            id: next_id(now),
            activity_type: required(self.activity_type, "type")?,
            duration: required(self.duration, "duration")?,
            calories: required(self.calories, "calories")?,
            notes: optional_text(self.notes),
            date: now,
        })
    }
}

impl MealForm {
    pub fn into_meal(self, now: DateTime<Utc>) -> Result<Meal, ValidationError> {
        Ok(Meal {
            id: next_id(now),
            meal_type: required(self.meal_type, "type")?,
            calories: required(self.calories, "calories")?,
            food: optional_text(self.food),
            date: now,
        })
    }
}

impl SleepForm {
    pub fn into_entry(self, now: DateTime<Utc>) -> Result<SleepEntry, ValidationError> {
        let bedtime = parse_time(&required_text(self.bedtime, "bedtime")?)?;
        let wake_time = parse_time(&required_text(self.wake_time, "wakeTime")?)?;
        let quality = in_range(
            self.quality.unwrap_or(DEFAULT_SLEEP_QUALITY),
            QUALITY_RANGE,
            "quality",
        )?;

        Ok(SleepEntry {
            id: next_id(now),
            bedtime,
            wake_time,
            quality,
            duration: sleep_duration(bedtime, wake_time),
            notes: optional_text(self.notes),
            date: now,
        })
    }
}

impl HeartRateForm {
    pub fn into_entry(self, now: DateTime<Utc>) -> Result<HeartRateEntry, ValidationError> {
        let bpm = in_range(required(self.bpm, "bpm")?, BPM_RANGE, "bpm")?;
        Ok(HeartRateEntry {
            id: next_id(now),
            bpm,
            kind: self.kind.unwrap_or(HeartRateType::Resting),
            notes: optional_text(self.notes),
            date: now,
        })
    }
}

impl ScheduleForm {
    /// Resolves the form against the catalog; `id` is kept for edits.
    pub fn into_scheduled(self, id: RecordId) -> Result<ScheduledWorkout, ValidationError> {
        let workout_id = required(self.workout_id, "workoutId")?;
        let workout = catalog::find_workout(workout_id)
            .ok_or(ValidationError::UnknownWorkout(workout_id))?;

        let raw_date = required_text(self.date, "date")?;
        let date = NaiveDate::parse_from_str(raw_date.trim(), "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate(raw_date.clone()))?;
        let start = match optional_text(self.start_time) {
            Some(raw) => parse_time(&raw)?,
            None => parse_time(DEFAULT_START_TIME)?,
        };

        Ok(scheduled_from_catalog(
            workout,
            id,
            date.and_time(start).and_utc(),
            self.completed.unwrap_or(false),
        ))
    }
}

fn scheduled_from_catalog(
    workout: &Workout,
    id: RecordId,
    scheduled_date: DateTime<Utc>,
    completed: bool,
) -> ScheduledWorkout {
    ScheduledWorkout {
        id,
        workout_id: workout.id,
        name: workout.name.to_string(),
        goal: workout.goal,
        duration: workout.duration,
        difficulty: workout.difficulty,
        exercises: workout.exercises.iter().map(|e| e.to_string()).collect(),
        description: workout.description.to_string(),
        video: workout.video.to_string(),
        scheduled_date,
        completed,
    }
}

pub fn record_activity(
    repo: &Repository,
    form: ActivityForm,
    now: DateTime<Utc>,
) -> Result<Activity, MutationError> {
    let activity = form.into_activity(now)?;
    repo.save_activities(&prepend(repo.load_activities(), activity.clone()))?;
    info!(id = activity.id, kind = activity.activity_type.label(), "activity recorded");
    Ok(activity)
}

pub fn delete_activity(repo: &Repository, id: RecordId) -> Result<(), StoreError> {
    repo.save_activities(&remove_by_id(repo.load_activities(), id))?;
    info!(id = id, "activity deleted");
    Ok(())
}

pub fn record_meal(repo: &Repository, form: MealForm, now: DateTime<Utc>) -> Result<Meal, MutationError> {
    let meal = form.into_meal(now)?;
    repo.save_meals(&prepend(repo.load_meals(), meal.clone()))?;
    info!(id = meal.id, calories = meal.calories, "meal recorded");
    Ok(meal)
}

pub fn delete_meal(repo: &Repository, id: RecordId) -> Result<(), StoreError> {
    repo.save_meals(&remove_by_id(repo.load_meals(), id))?;
    info!(id = id, "meal deleted");
    Ok(())
}

pub fn record_sleep(
    repo: &Repository,
    form: SleepForm,
    now: DateTime<Utc>,
) -> Result<SleepEntry, MutationError> {
    let entry = form.into_entry(now)?;
    repo.save_sleep(&prepend(repo.load_sleep(), entry.clone()))?;
    info!(id = entry.id, hours = entry.duration, "sleep recorded");
    Ok(entry)
}

pub fn delete_sleep(repo: &Repository, id: RecordId) -> Result<(), StoreError> {
    repo.save_sleep(&remove_by_id(repo.load_sleep(), id))?;
    info!(id = id, "sleep entry deleted");
    Ok(())
}

pub fn record_heart_rate(
    repo: &Repository,
    form: HeartRateForm,
    now: DateTime<Utc>,
) -> Result<HeartRateEntry, MutationError> {
    let entry = form.into_entry(now)?;
    repo.save_heart_rate(&prepend(repo.load_heart_rate(), entry.clone()))?;
    info!(id = entry.id, bpm = entry.bpm, "heart rate recorded");
    Ok(entry)
}

pub fn delete_heart_rate(repo: &Repository, id: RecordId) -> Result<(), StoreError> {
    repo.save_heart_rate(&remove_by_id(repo.load_heart_rate(), id))?;
    info!(id = id, "heart rate entry deleted");
    Ok(())
}

pub fn schedule_workout(
    repo: &Repository,
    form: ScheduleForm,
    now: DateTime<Utc>,
) -> Result<ScheduledWorkout, MutationError> {
    let scheduled = form.into_scheduled(next_id(now))?;
    repo.save_scheduled_workouts(&prepend(repo.load_scheduled_workouts(), scheduled.clone()))?;
    info!(id = scheduled.id, workout = scheduled.workout_id, "workout scheduled");
    Ok(scheduled)
}

/// Returns `None` when no scheduled workout carries `id`; the collection is
/// still rewritten unchanged.
pub fn update_scheduled_workout(
    repo: &Repository,
    id: RecordId,
    form: ScheduleForm,
) -> Result<Option<ScheduledWorkout>, MutationError> {
    let scheduled = form.into_scheduled(id)?;
    let existing = repo.load_scheduled_workouts();
    let found = existing.iter().any(|workout| workout.id == id);
    repo.save_scheduled_workouts(&replace_by_id(existing, scheduled.clone()))?;

    if !found {
        warn!(id = id, "no scheduled workout to update");
        return Ok(None);
    }
    info!(id = id, "scheduled workout updated");
    Ok(Some(scheduled))
}

pub fn delete_scheduled_workout(repo: &Repository, id: RecordId) -> Result<(), StoreError> {
    repo.save_scheduled_workouts(&remove_by_id(repo.load_scheduled_workouts(), id))?;
    info!(id = id, "scheduled workout deleted");
    Ok(())
}

pub fn start_workout(
    repo: &Repository,
    workout_id: u32,
    now: DateTime<Utc>,
) -> Result<CompletedWorkout, MutationError> {
    let workout =
        catalog::find_workout(workout_id).ok_or(ValidationError::UnknownWorkout(workout_id))?;
    let completed = CompletedWorkout {
        workout_id: workout.id,
        name: workout.name.to_string(),
        goal: workout.goal,
        duration: workout.duration,
        difficulty: workout.difficulty,
        exercises: workout.exercises.iter().map(|e| e.to_string()).collect(),
        description: workout.description.to_string(),
        video: workout.video.to_string(),
        completed_date: now,
    };
    repo.save_completed_workouts(&prepend(repo.load_completed_workouts(), completed.clone()))?;
    info!(workout = workout_id, "workout started");
    Ok(completed)
}

pub fn save_profile(repo: &Repository, profile: &Profile) -> Result<(), StoreError> {
    repo.save_profile(profile)?;
    info!("profile updated");
    Ok(())
}

pub fn save_settings(repo: &Repository, settings: &AppSettings) -> Result<(), StoreError> {
    repo.save_settings(settings)?;
    repo.save_dark_mode(settings.dark_mode)?;
    info!(dark_mode = settings.dark_mode, "settings updated");
    Ok(())
}
