use chrono::{DateTime, Utc};

use crate::countdown::formatter::format_countdown;
use crate::error::{CountdownError, Result};
use crate::language::Language;
use crate::model::task::Task;
use crate::time::parse_deadline;

/// Time left until (or past) a deadline, broken into display units.
///
/// Every field is unsigned: a deadline in the past always lands in `Overdue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    /// Whole days past the deadline, truncated. Can be 0.
    Overdue { days: u64 },
    /// `hours` is below 24 and `minutes` below 60.
    Remaining { days: u64, hours: u64, minutes: u64 },
}

impl Countdown {
    pub fn is_overdue(&self) -> bool {
        matches!(self, Countdown::Overdue { .. })
    }

    /// Less than a minute left.
    pub fn is_due_now(&self) -> bool {
        matches!(
            self,
            Countdown::Remaining {
                days: 0,
                hours: 0,
                minutes: 0
            }
        )
    }
}

/// Structured countdown between `now` and `deadline`.
pub fn remaining(deadline: DateTime<Utc>, now: DateTime<Utc>) -> Countdown {
    if is_overdue(deadline, now) {
        let days = (now - deadline).num_days().unsigned_abs();
        return Countdown::Overdue { days };
    }

    let left = deadline - now;
    Countdown::Remaining {
        days: left.num_days().unsigned_abs(),
        hours: (left.num_hours() % 24).unsigned_abs(),
        minutes: (left.num_minutes() % 60).unsigned_abs(),
    }
}

/// Display text for the time left until `deadline`, e.g. "55天 15小时".
pub fn calculate(deadline: DateTime<Utc>, now: DateTime<Utc>, language: Language) -> String {
    format_countdown(&remaining(deadline, now), language)
}

/// Same as [`calculate`] for a deadline still in its stored ISO-8601 form.
pub fn calculate_str(deadline: &str, now: DateTime<Utc>, language: Language) -> Result<String> {
    let deadline = parse_deadline(deadline)?;
    Ok(calculate(deadline, now, language))
}

/// Strictly before `now`, full date-time precision.
pub fn is_overdue(deadline: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    deadline < now
}

/// `ceil((deadline - now) / 1 day)`. Negative once the deadline has passed
/// by a full day or more.
pub fn remaining_days_ceil(deadline: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;
    let ms = (deadline - now).num_milliseconds();
    let days = ms / MS_PER_DAY;
    if ms % MS_PER_DAY > 0 {
        days + 1
    } else {
        days
    }
}

/// Parsed deadline of a one-time task.
pub fn deadline_of(task: &Task) -> Result<DateTime<Utc>> {
    match task.deadline.as_deref() {
        Some(value) => parse_deadline(value),
        None => Err(CountdownError::MissingDeadline { task_id: task.id }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 18, 8, 30, 0).unwrap()
    }

    #[test]
    fn test_remaining_breaks_down_units() {
        let deadline = now() + Duration::days(2) + Duration::hours(5) + Duration::minutes(7);
        assert_eq!(
            remaining(deadline, now()),
            Countdown::Remaining {
                days: 2,
                hours: 5,
                minutes: 7
            }
        );
    }

    #[test]
    fn test_deadline_equal_to_now_is_due_now() {
        let countdown = remaining(now(), now());
        assert!(countdown.is_due_now());
        assert!(!countdown.is_overdue());
        assert_eq!(calculate(now(), now(), Language::Zh), "即将到期");
        assert_eq!(calculate(now(), now(), Language::En), "Due soon");
    }

    #[test]
    fn test_seconds_only_is_due_now() {
        let deadline = now() + Duration::seconds(59);
        assert!(remaining(deadline, now()).is_due_now());
    }

    #[test]
    fn test_overdue_days_truncate() {
        assert_eq!(
            remaining(now() - Duration::seconds(1), now()),
            Countdown::Overdue { days: 0 }
        );
        assert_eq!(
            remaining(now() - Duration::hours(25), now()),
            Countdown::Overdue { days: 1 }
        );
        assert_eq!(
            remaining(now() - Duration::hours(71), now()),
            Countdown::Overdue { days: 2 }
        );
    }

    #[test]
    fn test_calculate_branches() {
        let cases = [
            (Duration::days(3), "3天", "3 days"),
            (Duration::days(1) + Duration::hours(1), "1天 1小时", "1 day 1 hour"),
            (Duration::hours(2) + Duration::minutes(30), "2小时 30分钟", "2 hours 30 minutes"),
            (Duration::hours(1), "1小时", "1 hour"),
            (Duration::minutes(1), "1分钟", "1 minute"),
            (Duration::minutes(45), "45分钟", "45 minutes"),
        ];
        for (offset, zh, en) in cases {
            let deadline = now() + offset;
            assert_eq!(calculate(deadline, now(), Language::Zh), zh);
            assert_eq!(calculate(deadline, now(), Language::En), en);
        }
    }

    #[test]
    fn test_days_branch_drops_minutes() {
        let deadline = now() + Duration::days(1) + Duration::minutes(59);
        assert_eq!(calculate(deadline, now(), Language::En), "1 day");
    }

    #[test]
    fn test_calculate_str_parses_first() {
        assert_eq!(
            calculate_str("2025-11-13", now(), Language::Zh).unwrap(),
            "55天 15小时"
        );
        assert_eq!(
            calculate_str("not a date", now(), Language::Zh),
            Err(CountdownError::InvalidDeadline {
                value: "not a date".to_string()
            })
        );
    }

    #[test]
    fn test_remaining_days_ceil() {
        assert_eq!(remaining_days_ceil(now() + Duration::days(2), now()), 2);
        assert_eq!(
            remaining_days_ceil(now() + Duration::days(2) + Duration::seconds(1), now()),
            3
        );
        assert_eq!(remaining_days_ceil(now() + Duration::hours(1), now()), 1);
        assert_eq!(remaining_days_ceil(now(), now()), 0);
        assert_eq!(remaining_days_ceil(now() - Duration::hours(1), now()), 0);
        assert_eq!(remaining_days_ceil(now() - Duration::hours(25), now()), -1);
    }

    #[test]
    fn test_deadline_of_missing() {
        let task = Task::new("No date".to_string(), "life".to_string(), None);
        assert_eq!(
            deadline_of(&task),
            Err(CountdownError::MissingDeadline { task_id: task.id })
        );
    }
}
