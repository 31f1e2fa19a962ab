use crate::models::{Habit, HabitStats, MonthRow, WeekRow};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate};
use std::collections::BTreeSet;
use tracing::warn;

/// Upper bound on how far back `current_streak` looks, counted from today.
pub const STREAK_LOOKBACK_DAYS: i64 = 365;

const HISTORY_WEEKS: i64 = 12;

/// Parsed completion days of a single habit.
///
/// Entries that are not strict `YYYY-MM-DD` day keys are skipped with a warning,
/// so every statistic built from a ledger ignores the same malformed entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionLedger {
    days: BTreeSet<NaiveDate>,
}

impl CompletionLedger {
    pub fn from_habit(habit: &Habit) -> Self {
        let mut days = BTreeSet::new();
        for entry in &habit.completed_dates {
            match parse_date_key(entry) {
                Some(date) => {
                    days.insert(date);
                }
                None => warn!(habit_id = %habit.id, entry = %entry, "skipping malformed completion date"),
            }
        }
        Self { days }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn newest_first(&self) -> Vec<String> {
        self.days.iter().rev().map(|day| date_key(*day)).collect()
    }

    /// Consecutive completed days ending today, or ending yesterday when today
    /// is still open.
    pub fn current_streak(&self, today: NaiveDate) -> u32 {
        if self.days.is_empty() {
            return 0;
        }

        let first = if self.contains(today) {
            0
        } else if self.contains(today - Duration::days(1)) {
            1
        } else {
            return 0;
        };

        let mut streak = 0;
        for offset in first..STREAK_LOOKBACK_DAYS {
            if !self.contains(today - Duration::days(offset)) {
                break;
            }
            streak += 1;
        }
        streak
    }

    pub fn longest_streak(&self) -> u32 {
        let mut longest = 0;
        let mut running = 0;
        let mut previous: Option<NaiveDate> = None;

        for &day in &self.days {
            running = match previous {
                Some(prev) if (day - prev).num_days() == 1 => running + 1,
                _ => 1,
            };
            longest = longest.max(running);
            previous = Some(day);
        }
        longest
    }

    /// Rounded percentage of days since creation (inclusive) with a completion.
    /// Not clamped to 100.
    pub fn completion_rate(&self, created: NaiveDate, today: NaiveDate) -> u32 {
        if self.days.is_empty() {
            return 0;
        }

        let elapsed = ((today - created).num_days() + 1).max(1) as u64;
        let count = self.days.len() as u64;
        ((count * 200 + elapsed) / (2 * elapsed)) as u32
    }
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parses a day key, rejecting anything that does not format back to itself
/// (unpadded fields, whitespace, trailing time components).
pub fn parse_date_key(value: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    (date_key(date) == value).then_some(date)
}

/// Local calendar day of `created_at`. Accepts RFC 3339 timestamps and bare day keys.
pub fn created_on(habit: &Habit) -> Option<NaiveDate> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(&habit.created_at) {
        return Some(timestamp.with_timezone(&Local).date_naive());
    }
    parse_date_key(&habit.created_at)
}

pub fn is_completed_on(habit: &Habit, date: NaiveDate) -> bool {
    let key = date_key(date);
    habit.completed_dates.iter().any(|entry| *entry == key)
}

pub fn current_streak(habit: &Habit, today: NaiveDate) -> u32 {
    CompletionLedger::from_habit(habit).current_streak(today)
}

pub fn longest_streak(habit: &Habit) -> u32 {
    CompletionLedger::from_habit(habit).longest_streak()
}

pub fn completion_rate(habit: &Habit, today: NaiveDate) -> u32 {
    rate_from_ledger(habit, &CompletionLedger::from_habit(habit), today)
}

fn rate_from_ledger(habit: &Habit, ledger: &CompletionLedger, today: NaiveDate) -> u32 {
    if ledger.is_empty() {
        return 0;
    }
    let created = created_on(habit).unwrap_or_else(|| {
        warn!(habit_id = %habit.id, created_at = %habit.created_at, "malformed createdAt, rating from today");
        today
    });
    ledger.completion_rate(created, today)
}

pub fn habit_stats(habit: &Habit) -> HabitStats {
    habit_stats_at(Local::now().date_naive(), habit)
}

pub fn habit_stats_at(today: NaiveDate, habit: &Habit) -> HabitStats {
    let ledger = CompletionLedger::from_habit(habit);
    HabitStats {
        current_streak: ledger.current_streak(today),
        longest_streak: ledger.longest_streak(),
        completion_rate: rate_from_ledger(habit, &ledger, today),
        total_completions: ledger.len() as u32,
    }
}

/// Sunday-start weeks covering the last twelve weeks, oldest first.
pub fn completion_history_at(today: NaiveDate, habit: &Habit) -> Vec<WeekRow> {
    let ledger = CompletionLedger::from_habit(habit);
    let current_week_start = week_start(today);

    let mut weeks = Vec::with_capacity(HISTORY_WEEKS as usize);
    for offset in (0..HISTORY_WEEKS).rev() {
        let start = current_week_start - Duration::weeks(offset);
        let days: Vec<bool> = (0..7)
            .map(|day_offset| ledger.contains(start + Duration::days(day_offset)))
            .collect();
        let completed = days.iter().filter(|done| **done).count() as u8;

        weeks.push(WeekRow {
            start_date: date_key(start),
            end_date: date_key(start + Duration::days(6)),
            days,
            completed,
        });
    }
    weeks
}

/// Parseable completion days, most recent first.
pub fn completion_list(habit: &Habit) -> Vec<String> {
    CompletionLedger::from_habit(habit).newest_first()
}

/// One row per month of `today`'s calendar year, January first.
pub fn completion_year_at(today: NaiveDate, habit: &Habit) -> Vec<MonthRow> {
    let ledger = CompletionLedger::from_habit(habit);

    (1..=12)
        .filter_map(|month| NaiveDate::from_ymd_opt(today.year(), month, 1))
        .map(|first| {
            let days: Vec<bool> = first
                .iter_days()
                .take_while(|day| day.month() == first.month())
                .map(|day| ledger.contains(day))
                .collect();
            let completed = days.iter().filter(|done| **done).count() as u8;

            MonthRow {
                month: first.format("%B").to_string(),
                start_date: date_key(first),
                days,
                completed,
            }
        })
        .collect()
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Frequency;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn habit_with(created_at: &str, dates: &[NaiveDate]) -> Habit {
        Habit {
            id: "1".to_string(),
            name: "Read".to_string(),
            emoji: "📚".to_string(),
            frequency: Frequency::Daily,
            created_at: created_at.to_string(),
            completed_dates: dates.iter().map(|d| date_key(*d)).collect(),
        }
    }

    #[test]
    fn no_completions_means_no_streak() {
        let habit = habit_with("2025-01-01", &[]);
        for today in [day(2025, 1, 1), day(2025, 6, 30), day(2030, 12, 31)] {
            assert_eq!(current_streak(&habit, today), 0);
        }
        assert_eq!(longest_streak(&habit), 0);
        assert_eq!(completion_rate(&habit, day(2025, 2, 1)), 0);
    }

    #[test]
    fn current_streak_counts_back_from_today() {
        let today = day(2025, 3, 10);
        let habit = habit_with(
            "2025-03-01",
            &[today, today - Duration::days(1), today - Duration::days(2)],
        );
        assert_eq!(current_streak(&habit, today), 3);
    }

    #[test]
    fn current_streak_keeps_yesterday_alive() {
        let today = day(2025, 3, 10);
        let habit = habit_with("2025-03-01", &[today - Duration::days(1)]);
        assert_eq!(current_streak(&habit, today), 1);

        let longer = habit_with(
            "2025-03-01",
            &[
                today - Duration::days(1),
                today - Duration::days(2),
                today - Duration::days(3),
                today - Duration::days(5),
            ],
        );
        assert_eq!(current_streak(&longer, today), 3);
    }

    #[test]
    fn current_streak_resets_after_two_missed_days() {
        let today = day(2025, 3, 10);
        let habit = habit_with("2025-03-01", &[today - Duration::days(2)]);
        assert_eq!(current_streak(&habit, today), 0);
    }

    #[test]
    fn current_streak_stops_at_lookback_window() {
        let today = day(2025, 3, 10);
        let decade: Vec<NaiveDate> = (0..3650).map(|n| today - Duration::days(n)).collect();
        let habit = habit_with("2015-01-01", &decade);
        assert_eq!(current_streak(&habit, today), 365);

        let without_today: Vec<NaiveDate> = decade[1..].to_vec();
        let habit = habit_with("2015-01-01", &without_today);
        assert_eq!(current_streak(&habit, today), 364);
        assert_eq!(longest_streak(&habit), 3649);
    }

    #[test]
    fn longest_streak_finds_best_run() {
        let habit = habit_with(
            "2025-01-01",
            &[day(2025, 1, 10), day(2025, 1, 2), day(2025, 1, 1), day(2025, 1, 3)],
        );
        assert_eq!(longest_streak(&habit), 3);

        let single = habit_with("2025-01-01", &[day(2025, 1, 20)]);
        assert_eq!(longest_streak(&single), 1);
    }

    #[test]
    fn longest_streak_crosses_month_and_year_edges() {
        let habit = habit_with(
            "2024-12-01",
            &[day(2024, 12, 30), day(2024, 12, 31), day(2025, 1, 1), day(2025, 1, 2)],
        );
        assert_eq!(longest_streak(&habit), 4);
    }

    #[test]
    fn completion_rate_same_day() {
        let today = day(2025, 4, 1);
        let habit = habit_with("2025-04-01", &[today]);
        assert_eq!(completion_rate(&habit, today), 100);
    }

    #[test]
    fn completion_rate_over_ten_days() {
        let today = day(2025, 4, 10);
        let created = date_key(today - Duration::days(9));
        let habit = habit_with(
            &created,
            &[today, today - Duration::days(3), today - Duration::days(7)],
        );
        assert_eq!(completion_rate(&habit, today), 30);
    }

    #[test]
    fn completion_rate_rounds_half_up() {
        let today = day(2025, 4, 8);
        let habit = habit_with("2025-04-01", &[today]);
        // 1 of 8 days is 12.5%
        assert_eq!(completion_rate(&habit, today), 13);
    }

    #[test]
    fn completion_rate_floors_denominator_for_future_creation() {
        let today = day(2025, 4, 1);
        let habit = habit_with("2025-04-05", &[today, today - Duration::days(1)]);
        assert_eq!(completion_rate(&habit, today), 200);
    }

    #[test]
    fn completion_rate_reads_local_timestamps() {
        let today = day(2025, 4, 10);
        let created = Local
            .from_local_datetime(&day(2025, 4, 1).and_hms_opt(12, 0, 0).unwrap())
            .single()
            .unwrap()
            .to_rfc3339();
        let habit = habit_with(&created, &[today]);
        assert_eq!(created_on(&habit), Some(day(2025, 4, 1)));
        assert_eq!(completion_rate(&habit, today), 10);
    }

    #[test]
    fn malformed_created_at_rates_from_today() {
        let today = day(2025, 4, 10);
        let habit = habit_with("yesterday-ish", &[today]);
        assert_eq!(created_on(&habit), None);
        assert_eq!(completion_rate(&habit, today), 100);
    }

    #[test]
    fn malformed_dates_are_skipped_everywhere() {
        let today = day(2025, 5, 3);
        let mut habit = habit_with("2025-05-01", &[today, today - Duration::days(1)]);
        habit.completed_dates.insert(1, "2025-5-2".to_string());
        habit.completed_dates.push("not a date".to_string());
        habit.completed_dates.push("2025-05-03T00:00:00Z".to_string());

        let stats = habit_stats_at(today, &habit);
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.longest_streak, 2);
        assert_eq!(stats.total_completions, 2);
        assert_eq!(stats.completion_rate, 67);
    }

    #[test]
    fn stats_are_repeatable() {
        let today = day(2025, 5, 3);
        let habit = habit_with("2025-04-20", &[today, day(2025, 4, 21), day(2025, 4, 22)]);
        let first = habit_stats_at(today, &habit);
        let second = habit_stats_at(today, &habit);
        assert_eq!(first, second);
        assert_eq!(habit.completed_dates.len(), 3);
    }

    #[test]
    fn is_completed_on_follows_membership() {
        let date = day(2025, 2, 14);
        let mut habit = habit_with("2025-02-01", &[]);
        assert!(!is_completed_on(&habit, date));

        habit.completed_dates.push(date_key(date));
        assert!(is_completed_on(&habit, date));

        habit.completed_dates.retain(|entry| *entry != date_key(date));
        assert!(!is_completed_on(&habit, date));
    }

    #[test]
    fn weekly_habits_use_daily_streak_rules() {
        let today = day(2025, 3, 10);
        let mut habit = habit_with(
            "2025-02-01",
            &[today, today - Duration::days(7), today - Duration::days(14)],
        );
        habit.frequency = Frequency::Weekly;
        // One completion per week still only counts today.
        assert_eq!(current_streak(&habit, today), 1);
        assert_eq!(longest_streak(&habit), 1);
    }

    #[test]
    fn history_covers_twelve_sunday_weeks() {
        // 2025-03-12 is a Wednesday
        let today = day(2025, 3, 12);
        let habit = habit_with("2025-01-01", &[day(2025, 3, 9), day(2025, 3, 11), day(2025, 3, 1)]);
        let history = completion_history_at(today, &habit);

        assert_eq!(history.len(), 12);
        let current = history.last().expect("current week");
        assert_eq!(current.start_date, "2025-03-09");
        assert_eq!(current.end_date, "2025-03-15");
        assert_eq!(current.days, vec![true, false, true, false, false, false, false]);
        assert_eq!(current.completed, 2);

        let previous = &history[10];
        assert_eq!(previous.start_date, "2025-03-02");
        assert_eq!(previous.completed, 0);
        assert!(history[9].days[6]);
    }

    #[test]
    fn year_view_handles_leap_years() {
        let habit = habit_with(
            "2024-01-01",
            &[day(2024, 1, 31), day(2024, 2, 1), day(2024, 2, 29), day(2024, 12, 31), day(2023, 12, 31)],
        );
        let year = completion_year_at(day(2024, 7, 4), &habit);

        assert_eq!(year.len(), 12);
        assert_eq!(year.iter().map(|month| month.days.len()).sum::<usize>(), 366);
        assert_eq!(year[0].month, "January");
        assert_eq!(year[0].days.len(), 31);
        assert!(year[0].days[30]);
        assert_eq!(year[0].completed, 1);

        let february = &year[1];
        assert_eq!(february.start_date, "2024-02-01");
        assert_eq!(february.days.len(), 29);
        assert!(february.days[0]);
        assert!(february.days[28]);
        assert_eq!(february.completed, 2);

        assert_eq!(year[11].days.len(), 31);
        assert!(year[11].days[30]);
    }

    #[test]
    fn year_view_in_common_year() {
        let habit = habit_with("2025-01-01", &[day(2025, 3, 1), day(2024, 3, 1)]);
        let year = completion_year_at(day(2025, 3, 1), &habit);

        assert_eq!(year.iter().map(|month| month.days.len()).sum::<usize>(), 365);
        assert_eq!(year[1].days.len(), 28);
        assert_eq!(year[1].completed, 0);
        assert_eq!(year[2].month, "March");
        assert!(year[2].days[0]);
        assert_eq!(year.iter().map(|month| month.completed as u32).sum::<u32>(), 1);
    }

    #[test]
    fn completion_list_is_newest_first() {
        let mut habit = habit_with("2025-01-01", &[day(2025, 1, 3), day(2025, 1, 10), day(2025, 1, 1)]);
        habit.completed_dates.push("bogus".to_string());
        assert_eq!(completion_list(&habit), vec!["2025-01-10", "2025-01-03", "2025-01-01"]);
    }
}
