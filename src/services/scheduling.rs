use chrono::{Days, NaiveDate};
use serde::Serialize;

pub const BOOKING_WINDOW_DAYS: u64 = 14;
pub const FIRST_SLOT_HOUR: u32 = 8;
pub const LAST_SLOT_END_HOUR: u32 = 18;
pub const SLOT_MINUTES: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateChoice {
    /// ISO calendar date, the value stored in the form.
    pub value: String,
    pub label: String,
}

/// The next fourteen calendar days, starting the day after `today`.
pub fn available_dates(today: NaiveDate) -> Vec<NaiveDate> {
    (1..=BOOKING_WINDOW_DAYS)
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .collect()
}

pub fn date_choices(today: NaiveDate) -> Vec<DateChoice> {
    available_dates(today)
        .into_iter()
        .map(|date| DateChoice {
            value: date.format("%Y-%m-%d").to_string(),
            label: date_label(date),
        })
        .collect()
}

/// Short display form such as "Tue 2 Jan".
pub fn date_label(date: NaiveDate) -> String {
    date.format("%a %-d %b").to_string()
}

/// Half-hour slot starts from 8:00 up to, not including, 18:00. Hours are not
/// zero-padded.
pub fn time_slots() -> Vec<String> {
    let mut slots = Vec::new();
    for hour in FIRST_SLOT_HOUR..LAST_SLOT_END_HOUR {
        for minute in (0..60).step_by(SLOT_MINUTES as usize) {
            slots.push(format!("{hour}:{minute:02}"));
        }
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_fourteen_days_after_today() {
        let dates = date_choices(date("2024-01-01"));
        assert_eq!(dates.len(), 14);
        assert_eq!(dates[0].value, "2024-01-02");
        assert_eq!(dates[13].value, "2024-01-15");
        for d in &dates {
            assert!(NaiveDate::parse_from_str(&d.value, "%Y-%m-%d").is_ok());
        }
    }

    #[test]
    fn test_dates_cross_month_and_leap_day() {
        let dates = available_dates(date("2024-02-20"));
        assert_eq!(dates[8], date("2024-02-29"));
        assert_eq!(dates[9], date("2024-03-01"));
        assert_eq!(*dates.last().unwrap(), date("2024-03-05"));
    }

    #[test]
    fn test_date_label_does_not_change_value() {
        let choices = date_choices(date("2024-01-01"));
        assert_eq!(choices[0].label, "Tue 2 Jan");
        assert_eq!(choices[0].value, "2024-01-02");
    }

    #[test]
    fn test_twenty_half_hour_slots() {
        let slots = time_slots();
        assert_eq!(slots.len(), 20);
        assert_eq!(slots.first().unwrap(), "8:00");
        assert_eq!(slots[1], "8:30");
        assert_eq!(slots.last().unwrap(), "17:30");

        let minutes: Vec<u32> = slots
            .iter()
            .map(|s| {
                let (h, m) = s.split_once(':').unwrap();
                h.parse::<u32>().unwrap() * 60 + m.parse::<u32>().unwrap()
            })
            .collect();
        for pair in minutes.windows(2) {
            assert_eq!(pair[1] - pair[0], 30);
        }
    }
}
