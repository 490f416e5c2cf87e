use crate::models::{ActivityType, HeartRateType};
use crate::stats;
use crate::store::Repository;
use chrono::{DateTime, Utc};

/// Figures shown on the dashboard cards.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub date: String,
    pub burned_today: u64,
    pub eaten_today: u64,
    pub calorie_target: u32,
    pub last_sleep: Option<f64>,
    pub resting_bpm: u32,
    pub bmi: Option<String>,
    pub upcoming_workouts: usize,
    pub week_calories: [u64; 7],
}

impl DashboardView {
    pub fn build(now: DateTime<Utc>, repo: &Repository) -> Self {
        let activities = repo.load_activities();
        let meals = repo.load_meals();
        let profile = repo.load_profile();
        let sleep = stats::build_sleep_at(now, &repo.load_sleep());
        let today = now.date_naive();

        Self {
            date: today.to_string(),
            burned_today: activities
                .iter()
                .filter(|activity| activity.date.date_naive() == today)
                .map(|activity| u64::from(activity.calories))
                .sum(),
            eaten_today: stats::calories_on_day(&meals, now),
            calorie_target: stats::suggested_calories(&profile),
            last_sleep: sleep.last_7_days.iter().rev().find_map(|hours| *hours),
            resting_bpm: stats::average_bpm(&repo.load_heart_rate(), HeartRateType::Resting),
            bmi: stats::bmi(profile.height, profile.weight)
                .map(|reading| format!("{} ({})", reading.value, reading.category.label())),
            upcoming_workouts: repo
                .load_scheduled_workouts()
                .iter()
                .filter(|workout| !workout.completed && workout.scheduled_date >= now)
                .count(),
            week_calories: stats::weekly_sum(
                &meals,
                now,
                |meal| meal.date,
                |meal| u64::from(meal.calories),
            ),
        }
    }
}

pub fn render_index(view: &DashboardView) -> String {
    let sleep = view
        .last_sleep
        .map(|hours| format!("{}h {}m", hours.trunc(), ((hours.fract()) * 60.0).round()))
        .unwrap_or_else(|| "–".to_string());
    let resting = if view.resting_bpm == 0 {
        "–".to_string()
    } else {
        format!("{} bpm", view.resting_bpm)
    };

    INDEX_HTML
        .replace("{{DATE}}", &view.date)
        .replace("{{BURNED}}", &view.burned_today.to_string())
        .replace("{{EATEN}}", &view.eaten_today.to_string())
        .replace("{{TARGET}}", &view.calorie_target.to_string())
        .replace("{{SLEEP}}", &sleep)
        .replace("{{RESTING}}", &resting)
        .replace("{{BMI}}", view.bmi.as_deref().unwrap_or("–"))
        .replace("{{UPCOMING}}", &view.upcoming_workouts.to_string())
        .replace("{{WEEK_BARS}}", &week_bars(&view.week_calories))
        .replace("{{ACTIVITY_OPTIONS}}", &activity_options())
}

fn week_bars(values: &[u64; 7]) -> String {
    let peak = values.iter().copied().max().unwrap_or(0).max(1);
    values
        .iter()
        .zip(stats::WEEK_LABELS)
        .map(|(value, label)| {
            let height = value * 100 / peak;
            format!(
                r#"<div class="bar"><span style="height:{height}%" title="{value} kcal"></span><small>{label}</small></div>"#
            )
        })
        .collect()
}

fn activity_options() -> String {
    ActivityType::ALL
        .iter()
        .map(|kind| format!(r#"<option value="{0}">{0}</option>"#, kind.label()))
        .collect()
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Fitness Tracker</title>
  <style>
    :root {
      --bg: #111827;
      --card: #1f2937;
      --ink: #f9fafb;
      --muted: #9ca3af;
      --accent: #6366f1;
      --warm: #f59e0b;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(960px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.8rem, 4vw, 2.4rem);
    }

    .subtitle {
      margin: 4px 0 0;
      color: var(--muted);
    }

    .cards {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(170px, 1fr));
      gap: 16px;
    }

    .card {
      background: var(--card);
      border-radius: 16px;
      padding: 18px;
    }

    .card h3 {
      margin: 0 0 6px;
      font-size: 0.85rem;
      color: var(--muted);
      text-transform: uppercase;
      letter-spacing: 0.06em;
    }

    .card p {
      margin: 0;
      font-size: 1.6rem;
      font-weight: 600;
    }

    .chart {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      align-items: end;
      gap: 10px;
      height: 180px;
    }

    .bar {
      display: flex;
      flex-direction: column;
      justify-content: flex-end;
      align-items: center;
      height: 100%;
      gap: 6px;
    }

    .bar span {
      width: 100%;
      min-height: 2px;
      border-radius: 8px 8px 2px 2px;
      background: var(--accent);
    }

    .bar small {
      color: var(--muted);
    }

    form {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(140px, 1fr));
      gap: 10px;
    }

    input,
    select,
    button {
      font: inherit;
      padding: 10px 12px;
      border-radius: 10px;
      border: 1px solid #374151;
      background: #111827;
      color: var(--ink);
    }

    button {
      background: var(--accent);
      border: none;
      cursor: pointer;
    }

    ul {
      list-style: none;
      margin: 12px 0 0;
      padding: 0;
      display: grid;
      gap: 8px;
    }

    li {
      display: flex;
      justify-content: space-between;
      align-items: center;
      background: #111827;
      border-radius: 10px;
      padding: 10px 12px;
    }

    li button {
      background: transparent;
      color: var(--warm);
      padding: 4px 8px;
    }

    .status {
      min-height: 1.2em;
      color: var(--warm);
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Fitness Tracker</h1>
      <p class="subtitle">{{DATE}}</p>
    </header>

    <section class="cards">
      <div class="card"><h3>Burned today</h3><p>{{BURNED}} kcal</p></div>
      <div class="card"><h3>Eaten today</h3><p>{{EATEN}} / {{TARGET}}</p></div>
      <div class="card"><h3>Last sleep</h3><p>{{SLEEP}}</p></div>
      <div class="card"><h3>Resting HR</h3><p>{{RESTING}}</p></div>
      <div class="card"><h3>BMI</h3><p>{{BMI}}</p></div>
      <div class="card"><h3>Upcoming workouts</h3><p>{{UPCOMING}}</p></div>
    </section>

    <section class="card">
      <h3>Calories eaten, last 7 days</h3>
      <div class="chart">{{WEEK_BARS}}</div>
    </section>

    <section class="card">
      <h3>Log activity</h3>
      <form id="activity-form">
        <select name="type" required>
          <option value="">Activity type</option>
          {{ACTIVITY_OPTIONS}}
        </select>
        <input name="duration" type="number" min="1" placeholder="Minutes" required />
        <input name="calories" type="number" min="1" placeholder="Calories" required />
        <input name="notes" placeholder="Notes" />
        <button type="submit">Add</button>
      </form>
      <p class="status" id="status"></p>
      <ul id="activity-list"></ul>
    </section>
  </main>

  <script>
    const statusEl = document.getElementById('status');
    const list = document.getElementById('activity-list');
    const form = document.getElementById('activity-form');

    const setStatus = (text) => {
      statusEl.textContent = text;
    };

    const renderActivities = (activities) => {
      list.innerHTML = '';
      activities.forEach((activity) => {
        const item = document.createElement('li');
        const label = document.createElement('span');
        label.textContent = `${activity.type} · ${activity.duration} min · ${activity.calories} kcal · ${new Date(activity.date).toLocaleDateString()}`;
        const remove = document.createElement('button');
        remove.textContent = 'Delete';
        remove.addEventListener('click', () => {
          fetch(`/api/activities/${activity.id}`, { method: 'DELETE' })
            .then(loadActivities)
            .catch((err) => setStatus(err.message));
        });
        item.append(label, remove);
        list.append(item);
      });
    };

    const loadActivities = async () => {
      const res = await fetch('/api/activities');
      if (!res.ok) {
        throw new Error('Unable to load activities');
      }
      renderActivities(await res.json());
    };

    form.addEventListener('submit', async (event) => {
      event.preventDefault();
      const data = new FormData(form);
      const body = {
        type: data.get('type') || null,
        duration: data.get('duration') ? Number(data.get('duration')) : null,
        calories: data.get('calories') ? Number(data.get('calories')) : null,
        notes: data.get('notes') || null
      };
      const res = await fetch('/api/activities', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(body)
      });
      if (!res.ok) {
        alert(await res.text());
        return;
      }
      form.reset();
      setStatus('Saved');
      window.location.reload();
    });

    loadActivities().catch((err) => setStatus(err.message));
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityForm, MealForm, MealType};
    use crate::mutators::{record_activity, record_meal};
    use chrono::TimeZone;

    #[test]
    fn dashboard_reflects_todays_records() {
        let repo = Repository::in_memory();
        let now = Utc.with_ymd_and_hms(2026, 5, 20, 19, 0, 0).unwrap();
        record_activity(
            &repo,
            ActivityForm {
                activity_type: Some(ActivityType::Running),
                duration: Some(30),
                calories: Some(320),
                notes: None,
            },
            now,
        )
        .unwrap();
        record_meal(
            &repo,
            MealForm {
                meal_type: Some(MealType::Dinner),
                calories: Some(800),
                food: None,
            },
            now,
        )
        .unwrap();

        let view = DashboardView::build(now, &repo);
        assert_eq!(view.burned_today, 320);
        assert_eq!(view.eaten_today, 800);
        assert_eq!(view.week_calories[6], 800);
        assert_eq!(view.calorie_target, 2000);

        let html = render_index(&view);
        assert!(html.contains("2026-05-20"));
        assert!(html.contains("320 kcal"));
        assert!(html.contains(r#"<option value="Weight Training">"#));
        assert!(!html.contains("{{"));
    }
}
