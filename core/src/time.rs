use chrono::{
    DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
    Weekday,
};
use anyhow::{anyhow, Result};

use crate::error::CountdownError;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parses a stored ISO-8601 deadline.
///
/// Accepts RFC 3339 with an offset, naive date-times (read as UTC) and bare
/// dates (midnight UTC).
pub fn parse_deadline(value: &str) -> Result<DateTime<Utc>, CountdownError> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    Err(CountdownError::InvalidDeadline {
        value: value.to_string(),
    })
}

/// Splits `3d` or `2小时` into its leading digits and the unit after them.
fn split_quantity(input: &str) -> Option<(&str, &str)> {
    let at = input.find(|c: char| !c.is_ascii_digit())?;
    if at == 0 {
        return None;
    }
    Some(input.split_at(at))
}

/// Parses `45m`, `2h`, `1d`, `1w` or their Chinese forms (`45分钟`, `2小时`, `1天`, `1周`).
pub fn parse_duration(input: &str) -> Result<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(anyhow!("Empty duration string"));
    }

    let (num_str, unit) =
        split_quantity(input).ok_or_else(|| anyhow!("Invalid duration: {}", input))?;
    let num: i64 = num_str.parse().map_err(|_| anyhow!("Invalid duration number"))?;

    match unit.to_lowercase().as_str() {
        "m" | "分钟" | "分" => Ok(Duration::minutes(num)),
        "h" | "小时" | "时" => Ok(Duration::hours(num)),
        "d" | "天" => Ok(Duration::days(num)),
        "w" | "周" => Ok(Duration::weeks(num)),
        _ => Err(anyhow!("Unknown duration unit: {}", unit)),
    }
}

/// Turns user input such as `tomorrow`, `+3d`, `2:fri` or `2025-11-13 18:00`
/// into a deadline instant, relative to `now` in the user's time zone.
pub fn parse_human_date<Tz: TimeZone>(input: &str, now: &DateTime<Tz>) -> Result<DateTime<Utc>> {
    let tz = now.timezone();
    let today = now.date_naive();
    let lowered = input.trim().to_lowercase();

    // 1. Reserved keywords
    match lowered.as_str() {
        "today" | "tod" => return end_of_day(&tz, today),
        "tomorrow" | "tom" => return end_of_day(&tz, today + Duration::days(1)),
        "eow" => {
            // End of week (Sunday)
            let days_to_sunday = (7 - today.weekday().num_days_from_sunday() as i64) % 7;
            return end_of_day(&tz, today + Duration::days(days_to_sunday));
        }
        "eom" => {
            let first_of_month = today
                .with_day(1)
                .ok_or_else(|| anyhow!("Invalid date: {}", today))?;
            let next_month = first_of_month
                .checked_add_months(Months::new(1))
                .ok_or_else(|| anyhow!("Date out of range"))?;
            return end_of_day(&tz, next_month - Duration::days(1));
        }
        _ => {}
    }

    // 2. Relative format (+Nd, +Nw, +Nm, or +N天/周/月)
    if let Some(rest) = lowered.strip_prefix('+') {
        let (num_str, unit) =
            split_quantity(rest).ok_or_else(|| anyhow!("Invalid relative format: {}", input))?;
        let count: u32 = num_str.parse().map_err(|_| anyhow!("Invalid relative format"))?;

        let target = match unit {
            "d" | "天" => today + Duration::days(count as i64),
            "w" | "周" => today + Duration::weeks(count as i64),
            // Clamps to the end of shorter months (Jan 31 + 1m -> Feb 28).
            "m" | "月" | "个月" => today
                .checked_add_months(Months::new(count))
                .ok_or_else(|| anyhow!("Date out of range"))?,
            _ => return Err(anyhow!("Unknown unit in relative time: {}", unit)),
        };
        return end_of_day(&tz, target);
    }

    // 3. Weekday format (fri, 2:fri)
    if let Some((count, day_str)) = parse_weekday_token(&lowered) {
        if let Ok(target_weekday) = parse_weekday_str(day_str) {
            let mut days_needed = target_weekday.num_days_from_sunday() as i64
                - today.weekday().num_days_from_sunday() as i64;
            if days_needed <= 0 {
                days_needed += 7;
            }
            // count = 1 means next X (e.g. next Friday), count = 2 the one after that.
            days_needed += (count - 1) * 7;

            return end_of_day(&tz, today + Duration::days(days_needed));
        }
    }

    // 4. Fallback to standard formats
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input.trim(), format) {
            return to_utc(&tz, dt);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d") {
        return end_of_day(&tz, d);
    }

    Err(anyhow!("Could not parse date: {}", input))
}

fn end_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Result<DateTime<Utc>> {
    let local_dt = date
        .and_hms_opt(23, 59, 59)
        .ok_or_else(|| anyhow!("Invalid date: {}", date))?;
    to_utc(tz, local_dt)
}

fn to_utc<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> Result<DateTime<Utc>> {
    tz.from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| anyhow!("Local time {} does not exist in this time zone", local))
}

fn parse_weekday_token(input: &str) -> Option<(i64, &str)> {
    if input.contains(':') {
        let parts: Vec<&str> = input.split(':').collect();
        if parts.len() == 2 {
            if let Ok(count) = parts[0].parse::<i64>() {
                if count >= 1 {
                    return Some((count, parts[1]));
                }
            }
        }
    } else {
        // Just "fri" means 1:fri
        return Some((1, input));
    }
    None
}

fn parse_weekday_str(s: &str) -> Result<Weekday> {
    match s.to_lowercase().as_str() {
        "mon" | "monday" => Ok(Weekday::Mon),
        "tue" | "tuesday" => Ok(Weekday::Tue),
        "wed" | "wednesday" => Ok(Weekday::Wed),
        "thu" | "thursday" => Ok(Weekday::Thu),
        "fri" | "friday" => Ok(Weekday::Fri),
        "sat" | "saturday" => Ok(Weekday::Sat),
        "sun" | "sunday" => Ok(Weekday::Sun),
        _ => Err(anyhow!("Invalid weekday")),
    }
}
