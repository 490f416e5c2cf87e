use crate::models::{Activity, AppSettings, HeartRateEntry, Meal, Profile, ScheduledWorkout};
use crate::store::Repository;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Downloadable snapshot of the user's data. Sleep entries and completed
/// workouts are not part of the bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub activities: Vec<Activity>,
    pub meals: Vec<Meal>,
    pub heart_rate_data: Vec<HeartRateEntry>,
    pub profile: Profile,
    pub scheduled_workouts: Vec<ScheduledWorkout>,
    pub settings: AppSettings,
}

pub fn build_export(repo: &Repository) -> ExportBundle {
    ExportBundle {
        activities: repo.load_activities(),
        meals: repo.load_meals(),
        heart_rate_data: repo.load_heart_rate(),
        profile: repo.load_profile(),
        scheduled_workouts: repo.load_scheduled_workouts(),
        settings: repo.load_effective_settings(),
    }
}

pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("fitness-tracker-data-{}.json", now.format("%Y-%m-%d"))
}
