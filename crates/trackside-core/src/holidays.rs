//! US federal holiday rules.
//!
//! Fixed-date holidays move to the nearest weekday when they land on a weekend
//! (Saturday to Friday, Sunday to Monday) and are dropped if that move leaves
//! the requested year. Floating holidays are defined by weekday rules and are
//! never shifted.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use smallvec::SmallVec;

pub const FEDERAL_HOLIDAY_COUNT: usize = 11;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: &'static str,
    /// True when the date was moved off a weekend.
    pub observed: bool,
}

pub type HolidayList = SmallVec<[Holiday; FEDERAL_HOLIDAY_COUNT]>;

#[derive(Clone, Copy, Debug)]
enum Rule {
    Fixed { month: u32, day: u32 },
    Nth { month: u32, weekday: Weekday, nth: u32 },
    Last { month: u32, weekday: Weekday },
}

const RULES: [(&str, Rule); FEDERAL_HOLIDAY_COUNT] = [
    ("New Year's Day", Rule::Fixed { month: 1, day: 1 }),
    (
        "Birthday of Martin Luther King, Jr.",
        Rule::Nth { month: 1, weekday: Weekday::Mon, nth: 3 },
    ),
    (
        "Washington's Birthday",
        Rule::Nth { month: 2, weekday: Weekday::Mon, nth: 3 },
    ),
    ("Memorial Day", Rule::Last { month: 5, weekday: Weekday::Mon }),
    (
        "Juneteenth National Independence Day",
        Rule::Fixed { month: 6, day: 19 },
    ),
    ("Independence Day", Rule::Fixed { month: 7, day: 4 }),
    ("Labor Day", Rule::Nth { month: 9, weekday: Weekday::Mon, nth: 1 }),
    ("Columbus Day", Rule::Nth { month: 10, weekday: Weekday::Mon, nth: 2 }),
    ("Veterans Day", Rule::Fixed { month: 11, day: 11 }),
    (
        "Thanksgiving Day",
        Rule::Nth { month: 11, weekday: Weekday::Thu, nth: 4 },
    ),
    ("Christmas Day", Rule::Fixed { month: 12, day: 25 }),
];

/// Federal holidays for `year`, in calendar order.
///
/// Returns fewer than [`FEDERAL_HOLIDAY_COUNT`] entries only when a fixed-date
/// holiday is observed in the neighbouring year (New Year's Day on a Saturday).
pub fn federal_holidays(year: i32) -> HolidayList {
    let mut out = HolidayList::new();
    for (name, rule) in RULES {
        let resolved = match rule {
            Rule::Fixed { month, day } => NaiveDate::from_ymd_opt(year, month, day)
                .map(observed_date)
                .filter(|(date, _)| date.year() == year),
            Rule::Nth { month, weekday, nth } => {
                nth_weekday_of_month(year, month, weekday, nth).map(|d| (d, false))
            }
            Rule::Last { month, weekday } => {
                last_weekday_of_month(year, month, weekday).map(|d| (d, false))
            }
        };
        if let Some((date, observed)) = resolved {
            out.push(Holiday {
                date,
                name,
                observed,
            });
        }
    }
    out
}

/// Move a weekend date to the nearest weekday.
pub fn observed_date(date: NaiveDate) -> (NaiveDate, bool) {
    match date.weekday() {
        Weekday::Sat => (date.pred_opt().unwrap_or(date), true),
        Weekday::Sun => (date.succ_opt().unwrap_or(date), true),
        _ => (date, false),
    }
}

/// `nth` (1-based) occurrence of `weekday` in `month` (1..=12).
pub fn nth_weekday_of_month(year: i32, month: u32, weekday: Weekday, nth: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let offset = (weekday.num_days_from_sunday() + 7 - first.weekday().num_days_from_sunday()) % 7;
    let day = nth.checked_sub(1)?.checked_mul(7)?.checked_add(1 + offset)?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Last occurrence of `weekday` in `month`, scanning back from month end.
pub fn last_weekday_of_month(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let last = last_day_of_month(year, month)?;
    let offset = (last.weekday().num_days_from_sunday() + 7 - weekday.num_days_from_sunday()) % 7;
    last.checked_sub_signed(Duration::days(offset as i64))
}

pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (ny, nm) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month.checked_add(1)?)
    };
    NaiveDate::from_ymd_opt(ny, nm, 1).and_then(|d| d.pred_opt())
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    last_day_of_month(year, month).map(|d| d.day()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn saturday_moves_to_friday_sunday_to_monday() {
        // 2026-07-04 is a Saturday
        assert_eq!(observed_date(ymd(2026, 7, 4)), (ymd(2026, 7, 3), true));
        // 2027-07-04 is a Sunday
        assert_eq!(observed_date(ymd(2027, 7, 4)), (ymd(2027, 7, 5), true));
        assert_eq!(observed_date(ymd(2026, 7, 6)), (ymd(2026, 7, 6), false));
    }

    #[test]
    fn nth_weekday_handles_month_starting_on_target() {
        // June 2026 starts on a Monday
        assert_eq!(nth_weekday_of_month(2026, 6, Weekday::Mon, 1), Some(ymd(2026, 6, 1)));
        assert_eq!(nth_weekday_of_month(2026, 6, Weekday::Mon, 5), Some(ymd(2026, 6, 29)));
        assert_eq!(nth_weekday_of_month(2026, 6, Weekday::Mon, 6), None);
    }

    #[test]
    fn days_in_february() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2026, 2), 28);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
    }

    #[test]
    fn out_of_range_inputs_yield_none() {
        assert_eq!(last_day_of_month(i32::MAX, 12), None);
        assert_eq!(days_in_month(i32::MAX, 12), 0);
        assert_eq!(last_day_of_month(2026, u32::MAX), None);
        assert_eq!(nth_weekday_of_month(2026, 1, Weekday::Mon, u32::MAX), None);
        assert_eq!(nth_weekday_of_month(2026, 1, Weekday::Mon, 0), None);
        assert_eq!(last_weekday_of_month(i32::MAX, 12, Weekday::Mon), None);
    }
}
