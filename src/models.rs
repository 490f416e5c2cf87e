use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Creation timestamp in milliseconds, unique within one collection.
pub type RecordId = i64;

pub trait Record {
    fn id(&self) -> RecordId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActivityType {
    Running,
    Walking,
    Cycling,
    Swimming,
    Yoga,
    #[serde(rename = "Weight Training")]
    WeightTraining,
    Dancing,
    Basketball,
    Soccer,
    Tennis,
}

impl ActivityType {
    pub const ALL: [ActivityType; 10] = [
        ActivityType::Running,
        ActivityType::Walking,
        ActivityType::Cycling,
        ActivityType::Swimming,
        ActivityType::Yoga,
        ActivityType::WeightTraining,
        ActivityType::Dancing,
        ActivityType::Basketball,
        ActivityType::Soccer,
        ActivityType::Tennis,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ActivityType::Running => "Running",
            ActivityType::Walking => "Walking",
            ActivityType::Cycling => "Cycling",
            ActivityType::Swimming => "Swimming",
            ActivityType::Yoga => "Yoga",
            ActivityType::WeightTraining => "Weight Training",
            ActivityType::Dancing => "Dancing",
            ActivityType::Basketball => "Basketball",
            ActivityType::Soccer => "Soccer",
            ActivityType::Tennis => "Tennis",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    /// Minutes.
    pub duration: u32,
    pub calories: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub meal_type: MealType,
    pub calories: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food: Option<String>,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepEntry {
    pub id: RecordId,
    #[serde(with = "hhmm")]
    pub bedtime: NaiveTime,
    #[serde(with = "hhmm")]
    pub wake_time: NaiveTime,
    /// 1 (poor) to 5 (excellent).
    pub quality: u8,
    /// Hours, one decimal.
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeartRateType {
    Resting,
    Active,
    Max,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateEntry {
    pub id: RecordId,
    pub bpm: u32,
    #[serde(rename = "type")]
    pub kind: HeartRateType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitnessGoal {
    #[serde(rename = "Weight Loss")]
    WeightLoss,
    #[serde(rename = "Muscle Gain")]
    MuscleGain,
    #[serde(rename = "Strength Training")]
    StrengthTraining,
    #[serde(rename = "Cardio Fitness")]
    CardioFitness,
    Flexibility,
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::tolerant")]
    pub age: Option<u32>,
    /// Centimetres.
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::tolerant")]
    pub height: Option<f64>,
    /// Kilograms.
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::tolerant")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<FitnessGoal>,
    /// Image as a `data:` URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkoutGoal {
    WeightLoss,
    Strength,
    Cardio,
    Flexibility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledWorkout {
    pub id: RecordId,
    pub workout_id: u32,
    pub name: String,
    pub goal: WorkoutGoal,
    pub duration: u32,
    pub difficulty: Difficulty,
    pub exercises: Vec<String>,
    pub description: String,
    pub video: String,
    pub scheduled_date: DateTime<Utc>,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedWorkout {
    pub workout_id: u32,
    pub name: String,
    pub goal: WorkoutGoal,
    pub duration: u32,
    pub difficulty: Difficulty,
    pub exercises: Vec<String>,
    pub description: String,
    pub video: String,
    pub completed_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Metric,
    Imperial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    Monday,
    Sunday,
}

/// Missing or unreadable keys fall back to their defaults one by one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub units: Units,
    pub week_start: WeekStart,
    /// Days.
    pub data_retention: u32,
    pub auto_backup: bool,
    pub workout_reminder: bool,
    #[serde(serialize_with = "hhmm::serialize")]
    pub reminder_time: NaiveTime,
    pub default_workout_duration: u32,
    pub show_workout_calendar: bool,
    pub dark_mode: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            units: Units::Metric,
            week_start: WeekStart::Monday,
            data_retention: 365,
            auto_backup: false,
            workout_reminder: true,
            reminder_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            default_workout_duration: 30,
            show_workout_calendar: true,
            dark_mode: true,
        }
    }
}

impl<'de> Deserialize<'de> for AppSettings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Map::<String, Value>::deserialize(deserializer)?;
        let mut settings = Self::default();
        lenient::assign(&fields, "units", &mut settings.units);
        lenient::assign(&fields, "weekStart", &mut settings.week_start);
        lenient::assign(&fields, "dataRetention", &mut settings.data_retention);
        lenient::assign(&fields, "autoBackup", &mut settings.auto_backup);
        lenient::assign(&fields, "workoutReminder", &mut settings.workout_reminder);
        if let Some(time) = fields
            .get("reminderTime")
            .and_then(Value::as_str)
            .and_then(hhmm::parse)
        {
            settings.reminder_time = time;
        }
        lenient::assign(
            &fields,
            "defaultWorkoutDuration",
            &mut settings.default_workout_duration,
        );
        lenient::assign(&fields, "showWorkoutCalendar", &mut settings.show_workout_calendar);
        lenient::assign(&fields, "darkMode", &mut settings.dark_mode);
        Ok(settings)
    }
}

impl Record for Activity {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Record for Meal {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Record for SleepEntry {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Record for HeartRateEntry {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Record for ScheduledWorkout {
    fn id(&self) -> RecordId {
        self.id
    }
}

// Form submissions. Every field is optional so a missing one can be reported
// as a validation message instead of a body rejection. Blank strings count as
// missing.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityForm {
    #[serde(rename = "type", default, deserialize_with = "lenient::optional")]
    pub activity_type: Option<ActivityType>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub duration: Option<u32>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub calories: Option<u32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MealForm {
    #[serde(rename = "type", default, deserialize_with = "lenient::optional")]
    pub meal_type: Option<MealType>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub calories: Option<u32>,
    pub food: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepForm {
    pub bedtime: Option<String>,
    pub wake_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub quality: Option<u8>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HeartRateForm {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub bpm: Option<u32>,
    #[serde(rename = "type", default, deserialize_with = "lenient::optional")]
    pub kind: Option<HeartRateType>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleForm {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub workout_id: Option<u32>,
    /// `YYYY-MM-DD`.
    pub date: Option<String>,
    /// `HH:MM`, defaults to 09:00.
    pub start_time: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BmiCategory {
    Underweight,
    #[serde(rename = "Normal weight")]
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn label(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BmiReading {
    pub value: f64,
    pub category: BmiCategory,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionSummary {
    pub labels: [&'static str; 7],
    pub last_7_days: [u64; 7],
    pub today_calories: u64,
    pub suggested_calories: u32,
    pub progress_percent: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepSummary {
    pub labels: [&'static str; 7],
    pub last_7_days: [Option<f64>; 7],
    pub average_duration: f64,
    pub average_quality: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartRateSummary {
    pub labels: [&'static str; 7],
    pub resting: [Option<u32>; 7],
    pub active: [Option<u32>; 7],
    pub max: [Option<u32>; 7],
    pub average_resting: u32,
    pub average_active: u32,
    pub average_max: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    pub month_labels: [&'static str; 12],
    pub monthly_calories: [u64; 12],
    pub total_calories: u64,
    pub total_duration: u64,
    pub average_calories: u64,
    /// Minutes per activity type.
    pub distribution: BTreeMap<ActivityType, u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub bmi: Option<BmiReading>,
    pub suggested_calories: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataCounts {
    pub activities: usize,
    pub meals: usize,
    pub sleep_data: usize,
    pub heart_rate_data: usize,
    /// Number of profile fields that are set.
    pub profile: usize,
    pub scheduled_workouts: usize,
}

/// Serde adapter for 24-hour `HH:MM` strings.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn parse(raw: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()
    }

    pub fn format(time: NaiveTime) -> String {
        time.format("%H:%M").to_string()
    }

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid time '{raw}', expected HH:MM")))
    }
}

/// Loose readers for values typed into HTML inputs: numbers may arrive as
/// strings and an empty input means "not given".
pub mod lenient {
    use serde::{Deserialize, Deserializer, de::DeserializeOwned, de::Error};
    use serde_json::{Map, Value};

    fn number(raw: &str) -> Option<Value> {
        if let Ok(n) = raw.parse::<i64>() {
            return Some(Value::from(n));
        }
        raw.parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Value::from)
    }

    pub fn coerce<T: DeserializeOwned>(value: Value) -> Result<Option<T>, serde_json::Error> {
        let value = match value {
            Value::Null => return Ok(None),
            Value::String(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                number(trimmed).unwrap_or(Value::String(raw))
            }
            other => other,
        };
        serde_json::from_value(value).map(Some)
    }

    /// Blank or null reads as `None`; anything else must parse.
    pub fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        coerce(Value::deserialize(deserializer)?).map_err(D::Error::custom)
    }

    /// Like [`optional`], but a value that does not parse is dropped too.
    pub fn tolerant<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(coerce(Value::deserialize(deserializer)?).unwrap_or(None))
    }

    /// Overwrites `slot` only when `key` holds a readable value.
    pub fn assign<T: DeserializeOwned>(fields: &Map<String, Value>, key: &str, slot: &mut T) {
        if let Some(Ok(Some(value))) = fields.get(key).cloned().map(coerce::<T>) {
            *slot = value;
        }
    }
}
