use std::fmt;

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Meals to swap in one week of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekPlan {
    pub week_number: u32,
    pub meals_to_replace: u32,
}

/// Spread `baseline_meals` over `total_weeks`, ramping up linearly.
///
/// Week `w` replaces `ceil(baseline * w / total_weeks)` meals, capped at the
/// baseline, so the final week always reaches it.
///
/// ```
/// use offramp_transition::calculate_weekly_transition;
///
/// let plan = calculate_weekly_transition(7, 4);
/// let meals: Vec<u32> = plan.iter().map(|week| week.meals_to_replace).collect();
/// assert_eq!(meals, vec![2, 4, 6, 7]);
/// ```
pub fn calculate_weekly_transition(baseline_meals: u32, total_weeks: u32) -> Vec<WeekPlan> {
    if total_weeks == 0 {
        return Vec::new();
    }

    let baseline = u64::from(baseline_meals);
    let weeks = u64::from(total_weeks);

    (1..=total_weeks)
        .map(|week| {
            let scaled = baseline * u64::from(week);
            let meals = scaled.div_ceil(weeks).min(baseline);
            WeekPlan {
                week_number: week,
                meals_to_replace: u32::try_from(meals).unwrap_or(baseline_meals),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::ALL[date.weekday().num_days_from_monday() as usize]
    }

    /// Today's day name in UTC.
    pub fn today() -> Self {
        Self::from_date(Utc::now().date_naive())
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower-case name of today's UTC weekday, e.g. `"monday"`.
pub fn today_day_name() -> &'static str {
    DayOfWeek::today().as_str()
}

/// The first `meals` days of the week, Monday first, at most seven.
pub fn generate_swap_days(meals: u32) -> Vec<DayOfWeek> {
    let count = (meals as usize).min(DayOfWeek::ALL.len());
    DayOfWeek::ALL[..count].to_vec()
}
