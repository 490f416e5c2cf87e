use crate::models::{
    Activity, ActivitySummary, BmiCategory, BmiReading, FitnessGoal, HeartRateEntry,
    HeartRateSummary, HeartRateType, Meal, NutritionSummary, Profile, ProfileSummary, SleepEntry,
    SleepSummary,
};
use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use std::collections::BTreeMap;

pub const WEEK_LABELS: [&str; 7] = [
    "6d ago", "5d ago", "4d ago", "3d ago", "2d ago", "Yesterday", "Today",
];

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const MS_PER_DAY: i64 = 86_400_000;

pub const DEFAULT_CALORIE_TARGET: u32 = 2000;

/// Whole days between `date` and `now`, floored. Future dates are negative.
pub fn days_ago(now: DateTime<Utc>, date: DateTime<Utc>) -> i64 {
    (now - date).num_milliseconds().div_euclid(MS_PER_DAY)
}

/// Bucket 6 is today, bucket 0 six days ago.
pub fn week_bucket(now: DateTime<Utc>, date: DateTime<Utc>) -> Option<usize> {
    let days = days_ago(now, date);
    (0..7).contains(&days).then(|| (6 - days) as usize)
}

/// Bucket 11 is the current calendar month, bucket 0 eleven months back.
pub fn month_bucket(now: DateTime<Utc>, date: DateTime<Utc>) -> Option<usize> {
    let months = (now.year() - date.year()) * 12 + now.month() as i32 - date.month() as i32;
    (0..12).contains(&months).then(|| (11 - months) as usize)
}

pub fn weekly_sum<T>(
    records: &[T],
    now: DateTime<Utc>,
    date: impl Fn(&T) -> DateTime<Utc>,
    value: impl Fn(&T) -> u64,
) -> [u64; 7] {
    let mut buckets = [0u64; 7];
    for record in records {
        if let Some(index) = week_bucket(now, date(record)) {
            buckets[index] = buckets[index].saturating_add(value(record));
        }
    }
    buckets
}

/// Single-value series: when several records land on one day the one with
/// the latest timestamp is kept.
pub fn weekly_latest<T, V: Copy>(
    records: &[T],
    now: DateTime<Utc>,
    date: impl Fn(&T) -> DateTime<Utc>,
    value: impl Fn(&T) -> V,
) -> [Option<V>; 7] {
    let mut buckets: [Option<(DateTime<Utc>, V)>; 7] = [None; 7];
    for record in records {
        let at = date(record);
        let Some(index) = week_bucket(now, at) else {
            continue;
        };
        match buckets[index] {
            Some((seen, _)) if seen >= at => {}
            _ => buckets[index] = Some((at, value(record))),
        }
    }
    buckets.map(|bucket| bucket.map(|(_, value)| value))
}

pub fn monthly_sum<T>(
    records: &[T],
    now: DateTime<Utc>,
    date: impl Fn(&T) -> DateTime<Utc>,
    value: impl Fn(&T) -> u64,
) -> [u64; 12] {
    let mut buckets = [0u64; 12];
    for record in records {
        if let Some(index) = month_bucket(now, date(record)) {
            buckets[index] = buckets[index].saturating_add(value(record));
        }
    }
    buckets
}

pub fn month_labels(now: DateTime<Utc>) -> [&'static str; 12] {
    let current = now.month0() as usize;
    std::array::from_fn(|i| MONTH_NAMES[(current + 1 + i) % 12])
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn bmi(height_cm: Option<f64>, weight_kg: Option<f64>) -> Option<BmiReading> {
    let height_m = height_cm? / 100.0;
    let weight = weight_kg?;
    if height_m <= 0.0 || weight <= 0.0 {
        return None;
    }

    let value = weight / (height_m * height_m);
    let category = if value < 18.5 {
        BmiCategory::Underweight
    } else if value < 25.0 {
        BmiCategory::Normal
    } else if value < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    };

    Some(BmiReading {
        value: round1(value),
        category,
    })
}

pub fn suggested_calories(profile: &Profile) -> u32 {
    let Some(weight) = profile.weight.filter(|weight| *weight > 0.0) else {
        return DEFAULT_CALORIE_TARGET;
    };
    let multiplier = match profile.goal {
        Some(FitnessGoal::WeightLoss) => 0.8,
        Some(FitnessGoal::MuscleGain) => 1.2,
        _ => 1.0,
    };
    (weight * 24.0 * multiplier).round() as u32
}

/// Hours slept, one decimal. A wake time earlier than the bedtime is on the
/// following day.
pub fn sleep_duration(bedtime: NaiveTime, wake_time: NaiveTime) -> f64 {
    let mut minutes = wake_time.signed_duration_since(bedtime).num_minutes();
    if minutes < 0 {
        minutes += 24 * 60;
    }
    round1(minutes as f64 / 60.0)
}

/// Wraps past midnight.
pub fn end_time(start: NaiveTime, duration_minutes: u32) -> NaiveTime {
    let (end, _) = start.overflowing_add_signed(Duration::minutes(i64::from(duration_minutes)));
    end
}

pub fn calories_on_day(meals: &[Meal], now: DateTime<Utc>) -> u64 {
    let today = now.date_naive();
    meals
        .iter()
        .filter(|meal| meal.date.date_naive() == today)
        .map(|meal| u64::from(meal.calories))
        .sum()
}

pub fn average_sleep_duration(entries: &[SleepEntry]) -> f64 {
    if entries.is_empty() {
        return 0.0;
    }
    let total: f64 = entries.iter().map(|entry| entry.duration).sum();
    round1(total / entries.len() as f64)
}

pub fn average_sleep_quality(entries: &[SleepEntry]) -> f64 {
    if entries.is_empty() {
        return 0.0;
    }
    let total: f64 = entries.iter().map(|entry| f64::from(entry.quality)).sum();
    round1(total / entries.len() as f64)
}

pub fn average_bpm(entries: &[HeartRateEntry], kind: HeartRateType) -> u32 {
    let readings: Vec<u32> = entries
        .iter()
        .filter(|entry| entry.kind == kind)
        .map(|entry| entry.bpm)
        .collect();
    if readings.is_empty() {
        return 0;
    }
    let total: u64 = readings.iter().map(|bpm| u64::from(*bpm)).sum();
    (total as f64 / readings.len() as f64).round() as u32
}

pub fn build_nutrition_at(now: DateTime<Utc>, meals: &[Meal], profile: &Profile) -> NutritionSummary {
    let today_calories = calories_on_day(meals, now);
    let suggested = suggested_calories(profile);
    let progress = if suggested == 0 {
        0.0
    } else {
        round1(today_calories as f64 / f64::from(suggested) * 100.0)
    };

    NutritionSummary {
        labels: WEEK_LABELS,
        last_7_days: weekly_sum(meals, now, |meal| meal.date, |meal| u64::from(meal.calories)),
        today_calories,
        suggested_calories: suggested,
        progress_percent: progress,
    }
}

pub fn build_sleep_at(now: DateTime<Utc>, entries: &[SleepEntry]) -> SleepSummary {
    SleepSummary {
        labels: WEEK_LABELS,
        last_7_days: weekly_latest(entries, now, |entry| entry.date, |entry| entry.duration),
        average_duration: average_sleep_duration(entries),
        average_quality: average_sleep_quality(entries),
    }
}

pub fn build_heart_rate_at(now: DateTime<Utc>, entries: &[HeartRateEntry]) -> HeartRateSummary {
    let series = |kind: HeartRateType| {
        let matching: Vec<HeartRateEntry> = entries
            .iter()
            .filter(|entry| entry.kind == kind)
            .cloned()
            .collect();
        weekly_latest(&matching, now, |entry| entry.date, |entry| entry.bpm)
    };

    HeartRateSummary {
        labels: WEEK_LABELS,
        resting: series(HeartRateType::Resting),
        active: series(HeartRateType::Active),
        max: series(HeartRateType::Max),
        average_resting: average_bpm(entries, HeartRateType::Resting),
        average_active: average_bpm(entries, HeartRateType::Active),
        average_max: average_bpm(entries, HeartRateType::Max),
    }
}

pub fn build_activity_at(now: DateTime<Utc>, activities: &[Activity]) -> ActivitySummary {
    let total_calories: u64 = activities.iter().map(|a| u64::from(a.calories)).sum();
    let total_duration: u64 = activities.iter().map(|a| u64::from(a.duration)).sum();
    let average_calories = if activities.is_empty() {
        0
    } else {
        (total_calories as f64 / activities.len() as f64).round() as u64
    };

    let mut distribution = BTreeMap::new();
    for activity in activities {
        *distribution.entry(activity.activity_type).or_insert(0u64) += u64::from(activity.duration);
    }

    ActivitySummary {
        month_labels: month_labels(now),
        monthly_calories: monthly_sum(activities, now, |a| a.date, |a| u64::from(a.calories)),
        total_calories,
        total_duration,
        average_calories,
        distribution,
    }
}

pub fn build_profile_summary(profile: &Profile) -> ProfileSummary {
    ProfileSummary {
        bmi: bmi(profile.height, profile.weight),
        suggested_calories: suggested_calories(profile),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityType, MealType};
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn hhmm(raw: &str) -> NaiveTime {
        NaiveTime::parse_from_str(raw, "%H:%M").unwrap()
    }

    fn activity(id: i64, date: DateTime<Utc>, calories: u32, duration: u32) -> Activity {
        Activity {
            id,
            activity_type: ActivityType::Cycling,
            duration,
            calories,
            notes: None,
            date,
        }
    }

    fn meal(id: i64, date: DateTime<Utc>, calories: u32) -> Meal {
        Meal {
            id,
            meal_type: MealType::Dinner,
            calories,
            food: None,
            date,
        }
    }

    #[test]
    fn week_buckets_exclude_entries_older_than_seven_days() {
        let now = at(2026, 1, 10, 18);
        let meals = vec![
            meal(3, at(2026, 1, 10, 8), 500),
            meal(2, at(2026, 1, 9, 12), 700),
            meal(1, at(2026, 1, 2, 12), 900),
        ];

        let buckets = weekly_sum(&meals, now, |m| m.date, |m| u64::from(m.calories));
        assert_eq!(buckets, [0, 0, 0, 0, 0, 700, 500]);
    }

    #[test]
    fn future_dates_fall_outside_the_window() {
        let now = at(2026, 1, 10, 8);
        assert_eq!(days_ago(now, at(2026, 1, 10, 9)), -1);
        assert_eq!(week_bucket(now, at(2026, 1, 10, 9)), None);
        assert_eq!(week_bucket(now, at(2026, 1, 10, 7)), Some(6));
    }

    #[test]
    fn same_day_calories_accumulate() {
        let now = at(2026, 1, 10, 20);
        let meals = vec![meal(2, at(2026, 1, 10, 13), 650), meal(1, at(2026, 1, 10, 8), 400)];
        let summary = build_nutrition_at(now, &meals, &Profile::default());
        assert_eq!(summary.last_7_days[6], 1050);
        assert_eq!(summary.today_calories, 1050);
        assert_eq!(summary.suggested_calories, DEFAULT_CALORIE_TARGET);
        assert_eq!(summary.progress_percent, 52.5);
    }

    #[test]
    fn latest_record_wins_for_single_value_series() {
        let now = at(2026, 1, 10, 20);
        let entries = vec![
            SleepEntry {
                id: 2,
                bedtime: hhmm("23:30"),
                wake_time: hhmm("06:30"),
                quality: 3,
                duration: 7.0,
                notes: None,
                date: at(2026, 1, 10, 9),
            },
            SleepEntry {
                id: 1,
                bedtime: hhmm("22:00"),
                wake_time: hhmm("06:00"),
                quality: 5,
                duration: 8.0,
                notes: None,
                date: at(2026, 1, 10, 7),
            },
        ];

        let summary = build_sleep_at(now, &entries);
        assert_eq!(summary.last_7_days[6], Some(7.0));
        assert_eq!(summary.last_7_days[5], None);
        assert_eq!(summary.average_duration, 7.5);
        assert_eq!(summary.average_quality, 4.0);
    }

    #[test]
    fn heart_rate_series_split_by_type() {
        let now = at(2026, 1, 10, 20);
        let entry = |id, bpm, kind, date| HeartRateEntry {
            id,
            bpm,
            kind,
            notes: None,
            date,
        };
        let entries = vec![
            entry(3, 150, HeartRateType::Active, at(2026, 1, 10, 18)),
            entry(2, 61, HeartRateType::Resting, at(2026, 1, 10, 7)),
            entry(1, 58, HeartRateType::Resting, at(2026, 1, 8, 7)),
        ];

        let summary = build_heart_rate_at(now, &entries);
        assert_eq!(summary.resting[6], Some(61));
        assert_eq!(summary.resting[4], Some(58));
        assert_eq!(summary.active[6], Some(150));
        assert_eq!(summary.max, [None; 7]);
        assert_eq!(summary.average_resting, 60);
        assert_eq!(summary.average_max, 0);
    }

    #[test]
    fn monthly_buckets_cross_year_boundary() {
        let now = at(2026, 2, 15, 12);
        let activities = vec![
            activity(3, at(2026, 2, 1, 9), 300, 30),
            activity(2, at(2025, 12, 20, 9), 200, 20),
            activity(1, at(2025, 2, 20, 9), 999, 60),
        ];

        let summary = build_activity_at(now, &activities);
        assert_eq!(summary.monthly_calories[11], 300);
        assert_eq!(summary.monthly_calories[9], 200);
        assert_eq!(summary.monthly_calories.iter().sum::<u64>(), 500);
        assert_eq!(summary.month_labels[11], "Feb");
        assert_eq!(summary.month_labels[0], "Mar");
        assert_eq!(summary.total_calories, 1499);
        assert_eq!(summary.total_duration, 110);
        assert_eq!(summary.average_calories, 500);
        assert_eq!(summary.distribution.get(&ActivityType::Cycling), Some(&110));
    }

    #[test]
    fn bmi_rounds_and_categorises() {
        let reading = bmi(Some(180.0), Some(75.0)).unwrap();
        assert_eq!(reading.value, 23.1);
        assert_eq!(reading.category.label(), "Normal weight");

        assert_eq!(bmi(Some(170.0), Some(50.0)).unwrap().category, BmiCategory::Underweight);
        assert_eq!(bmi(Some(170.0), Some(80.0)).unwrap().category, BmiCategory::Overweight);
        assert_eq!(bmi(Some(160.0), Some(90.0)).unwrap().category, BmiCategory::Obese);
        assert!(bmi(None, Some(75.0)).is_none());
        assert!(bmi(Some(0.0), Some(75.0)).is_none());
    }

    #[test]
    fn calorie_target_depends_on_goal() {
        let mut profile = Profile {
            weight: Some(70.0),
            goal: Some(FitnessGoal::WeightLoss),
            ..Profile::default()
        };
        assert_eq!(suggested_calories(&profile), 1344);

        profile.goal = Some(FitnessGoal::MuscleGain);
        assert_eq!(suggested_calories(&profile), 2016);

        profile.goal = Some(FitnessGoal::Flexibility);
        assert_eq!(suggested_calories(&profile), 1680);

        profile.weight = None;
        assert_eq!(suggested_calories(&profile), 2000);
    }

    #[test]
    fn sleep_crossing_midnight() {
        assert_eq!(sleep_duration(hhmm("23:00"), hhmm("07:00")), 8.0);
        assert_eq!(sleep_duration(hhmm("01:15"), hhmm("07:00")), 5.8);
        assert_eq!(sleep_duration(hhmm("07:00"), hhmm("07:00")), 0.0);
    }

    #[test]
    fn end_time_adds_minutes() {
        assert_eq!(end_time(hhmm("09:00"), 45), hhmm("09:45"));
        assert_eq!(end_time(hhmm("23:30"), 60), hhmm("00:30"));
    }
}
