use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::countdown::calculator::Countdown;
use crate::language::Language;

static OVERDUE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"已逾期\s*(\d+)\s*天").expect("overdue pattern"));
static DAYS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*天(?:\s*(\d+)\s*小时)?").expect("days pattern"));
static HOURS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*小时").expect("hours pattern"));
static MINUTES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*分钟").expect("minutes pattern"));

/// Recurring schedule prefixes and their English replacement.
const RECURRING_PREFIXES: [(&str, &str); 3] =
    [("每周", "Weekly "), ("每天", "Daily "), ("每月", "Monthly ")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Day,
    Hour,
    Minute,
}

impl Unit {
    fn zh(self) -> &'static str {
        match self {
            Unit::Day => "天",
            Unit::Hour => "小时",
            Unit::Minute => "分钟",
        }
    }

    fn en(self, count: u64) -> &'static str {
        match (self, count == 1) {
            (Unit::Day, true) => "day",
            (Unit::Day, false) => "days",
            (Unit::Hour, true) => "hour",
            (Unit::Hour, false) => "hours",
            (Unit::Minute, true) => "minute",
            (Unit::Minute, false) => "minutes",
        }
    }
}

fn quantity(count: u64, unit: Unit, language: Language) -> String {
    match language {
        Language::Zh => format!("{}{}", count, unit.zh()),
        Language::En => format!("{} {}", count, unit.en(count)),
    }
}

/// "major minor", or just "major" when `minor` is zero.
fn pair(major: (u64, Unit), minor: (u64, Unit), language: Language) -> String {
    let head = quantity(major.0, major.1, language);
    if minor.0 > 0 {
        format!("{} {}", head, quantity(minor.0, minor.1, language))
    } else {
        head
    }
}

fn overdue(days: u64, language: Language) -> String {
    match language {
        Language::Zh => format!("已逾期 {}", quantity(days, Unit::Day, language)),
        Language::En => format!("Overdue {}", quantity(days, Unit::Day, language)),
    }
}

pub fn due_now(language: Language) -> &'static str {
    language.pick("即将到期", "Due soon")
}

pub fn no_deadline(language: Language) -> &'static str {
    language.pick("无截止日期", "No deadline")
}

/// Renders a structured countdown.
pub fn format_countdown(countdown: &Countdown, language: Language) -> String {
    if countdown.is_due_now() {
        return due_now(language).to_string();
    }
    match *countdown {
        Countdown::Overdue { days } => overdue(days, language),
        Countdown::Remaining { days, hours, .. } if days > 0 => {
            pair((days, Unit::Day), (hours, Unit::Hour), language)
        }
        Countdown::Remaining { hours, minutes, .. } if hours > 0 => {
            pair((hours, Unit::Hour), (minutes, Unit::Minute), language)
        }
        Countdown::Remaining { minutes, .. } => quantity(minutes, Unit::Minute, language),
    }
}

/// Re-renders text that was already formatted in Chinese.
///
/// Recurring prefixes are swapped literally and the rest of the schedule stays
/// in Chinese, so "每周二 14:00" becomes "Weekly 二 14:00" in English.
/// Unrecognized text comes back unchanged.
pub fn reformat_legacy(text: &str, language: Language) -> String {
    if text == "已完成" {
        return language.pick("已完成", "Completed").to_string();
    }

    if text.starts_with("已逾期") {
        if let Some(days) = OVERDUE_RE
            .captures(text)
            .and_then(|caps| caps[1].parse::<u64>().ok())
        {
            return overdue(days, language);
        }
        return language.pick("已逾期", "Overdue").to_string();
    }

    for (prefix, english) in RECURRING_PREFIXES {
        if text.contains(prefix) {
            return match language {
                Language::Zh => text.to_string(),
                Language::En => text.replacen(prefix, english, 1),
            };
        }
    }

    if let Some(caps) = DAYS_RE.captures(text) {
        let hours = caps.get(2).map_or(Some(0), |m| m.as_str().parse::<u64>().ok());
        if let (Ok(days), Some(hours)) = (caps[1].parse::<u64>(), hours) {
            return pair((days, Unit::Day), (hours, Unit::Hour), language);
        }
        return text.to_string();
    }

    if let Some(caps) = HOURS_RE.captures(text) {
        return match caps[1].parse::<u64>() {
            Ok(hours) => quantity(hours, Unit::Hour, language),
            Err(_) => text.to_string(),
        };
    }

    if let Some(caps) = MINUTES_RE.captures(text) {
        return match caps[1].parse::<u64>() {
            Ok(minutes) => quantity(minutes, Unit::Minute, language),
            Err(_) => text.to_string(),
        };
    }

    if text == "新任务" || text == "New Task" {
        return language.pick("新任务", "New Task").to_string();
    }

    text.to_string()
}

/// Coarse distance between `date` and `now` with a direction suffix,
/// e.g. "in 3 days", "about 2 hours ago", "3 天后".
pub fn relative_time(date: DateTime<Utc>, now: DateTime<Utc>, language: Language) -> String {
    let seconds = (date - now).num_seconds();
    let future = seconds >= 0;
    let minutes = (seconds.unsigned_abs() + 30) / 60;

    let distance = match language {
        Language::Zh => zh_distance(minutes),
        Language::En => en_distance(minutes),
    };

    match (language, future) {
        (Language::Zh, true) => format!("{}后", distance),
        (Language::Zh, false) => format!("{}前", distance),
        (Language::En, true) => format!("in {}", distance),
        (Language::En, false) => format!("{} ago", distance),
    }
}

const MINUTES_PER_DAY: u64 = 1440;
const MINUTES_PER_MONTH: u64 = 43_200;
const MINUTES_PER_YEAR: u64 = 525_600;

fn round_div(value: u64, unit: u64) -> u64 {
    (value + unit / 2) / unit
}

fn en_distance(minutes: u64) -> String {
    let plural = |n: u64, one: &str, many: &str| if n == 1 { one.to_string() } else { many.to_string() };
    match minutes {
        0 => "less than a minute".to_string(),
        1..=44 => format!("{} {}", minutes, plural(minutes, "minute", "minutes")),
        45..=89 => "about 1 hour".to_string(),
        90..=1439 => format!("about {} hours", round_div(minutes, 60)),
        1440..=2519 => "1 day".to_string(),
        2520..=43_199 => format!("{} days", round_div(minutes, MINUTES_PER_DAY)),
        43_200..=86_399 => {
            let months = round_div(minutes, MINUTES_PER_MONTH);
            format!("about {} {}", months, plural(months, "month", "months"))
        }
        86_400..=525_599 => format!("{} months", round_div(minutes, MINUTES_PER_MONTH)),
        _ => {
            let years = round_div(minutes, MINUTES_PER_YEAR);
            format!("about {} {}", years, plural(years, "year", "years"))
        }
    }
}

fn zh_distance(minutes: u64) -> String {
    match minutes {
        0 => "不到 1 分钟".to_string(),
        1..=44 => format!("{} 分钟", minutes),
        45..=89 => "大约 1 小时".to_string(),
        90..=1439 => format!("大约 {} 小时", round_div(minutes, 60)),
        1440..=2519 => "1 天".to_string(),
        2520..=43_199 => format!("{} 天", round_div(minutes, MINUTES_PER_DAY)),
        43_200..=86_399 => format!("大约 {} 个月", round_div(minutes, MINUTES_PER_MONTH)),
        86_400..=525_599 => format!("{} 个月", round_div(minutes, MINUTES_PER_MONTH)),
        _ => format!("大约 {} 年", round_div(minutes, MINUTES_PER_YEAR)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_format_overdue_pluralizes() {
        assert_eq!(format_countdown(&Countdown::Overdue { days: 1 }, Language::En), "Overdue 1 day");
        assert_eq!(format_countdown(&Countdown::Overdue { days: 0 }, Language::En), "Overdue 0 days");
        assert_eq!(format_countdown(&Countdown::Overdue { days: 3 }, Language::Zh), "已逾期 3天");
    }

    #[test]
    fn test_format_due_now() {
        let countdown = Countdown::Remaining { days: 0, hours: 0, minutes: 0 };
        assert_eq!(format_countdown(&countdown, Language::En), due_now(Language::En));
        assert_eq!(format_countdown(&countdown, Language::Zh), due_now(Language::Zh));
        let countdown = Countdown::Remaining { days: 0, hours: 0, minutes: 1 };
        assert_eq!(format_countdown(&countdown, Language::En), "1 minute");
    }

    #[test]
    fn test_format_plural_units_independently() {
        let countdown = Countdown::Remaining { days: 2, hours: 1, minutes: 0 };
        assert_eq!(format_countdown(&countdown, Language::En), "2 days 1 hour");
        let countdown = Countdown::Remaining { days: 0, hours: 1, minutes: 2 };
        assert_eq!(format_countdown(&countdown, Language::En), "1 hour 2 minutes");
    }

    #[test]
    fn test_legacy_fixed_phrases() {
        assert_eq!(reformat_legacy("已完成", Language::En), "Completed");
        assert_eq!(reformat_legacy("已完成", Language::Zh), "已完成");
        assert_eq!(reformat_legacy("新任务", Language::En), "New Task");
        assert_eq!(reformat_legacy("New Task", Language::Zh), "新任务");
    }

    #[test]
    fn test_legacy_overdue() {
        assert_eq!(reformat_legacy("已逾期 3天", Language::En), "Overdue 3 days");
        assert_eq!(reformat_legacy("已逾期 1天", Language::En), "Overdue 1 day");
        assert_eq!(reformat_legacy("已逾期3天", Language::Zh), "已逾期 3天");
        assert_eq!(reformat_legacy("已逾期", Language::En), "Overdue");
    }

    #[test]
    fn test_legacy_recurring_prefix_only() {
        assert_eq!(reformat_legacy("每周二 14:00", Language::En), "Weekly 二 14:00");
        assert_eq!(reformat_legacy("每天 07:30", Language::En), "Daily  07:30");
        assert_eq!(reformat_legacy("每月1号", Language::En), "Monthly 1号");
        assert_eq!(reformat_legacy("每周二 14:00", Language::Zh), "每周二 14:00");
    }

    #[test]
    fn test_legacy_durations() {
        assert_eq!(reformat_legacy("55天 15小时", Language::En), "55 days 15 hours");
        assert_eq!(reformat_legacy("1天", Language::En), "1 day");
        assert_eq!(reformat_legacy("2天 0小时", Language::Zh), "2天");
        assert_eq!(reformat_legacy("15小时", Language::En), "15 hours");
        assert_eq!(reformat_legacy("1小时", Language::En), "1 hour");
        assert_eq!(reformat_legacy("30分钟", Language::En), "30 minutes");
        assert_eq!(reformat_legacy("1分钟", Language::En), "1 minute");
    }

    #[test]
    fn test_legacy_passthrough() {
        assert_eq!(reformat_legacy("Due tomorrow", Language::Zh), "Due tomorrow");
        assert_eq!(reformat_legacy("", Language::En), "");
    }

    #[test]
    fn test_relative_time() {
        let now = Utc.with_ymd_and_hms(2025, 9, 19, 0, 0, 0).unwrap();
        assert_eq!(relative_time(now + Duration::days(3), now, Language::En), "in 3 days");
        assert_eq!(relative_time(now + Duration::days(3), now, Language::Zh), "3 天后");
        assert_eq!(relative_time(now - Duration::minutes(5), now, Language::En), "5 minutes ago");
        assert_eq!(relative_time(now - Duration::minutes(5), now, Language::Zh), "5 分钟前");
        assert_eq!(relative_time(now - Duration::hours(2), now, Language::En), "about 2 hours ago");
        assert_eq!(relative_time(now + Duration::seconds(10), now, Language::En), "in less than a minute");
        assert_eq!(relative_time(now + Duration::days(40), now, Language::En), "in about 1 month");
        assert_eq!(relative_time(now - Duration::days(800), now, Language::En), "about 2 years ago");
    }
}
