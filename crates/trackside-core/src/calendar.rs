//! Month grids, initial-month heuristic and selection state for the race calendar.

use crate::events::RaceEvent;
use crate::holidays::{days_in_month, federal_holidays, Holiday};
use chrono::{Datelike, NaiveDate};
use fnv::FnvHashMap;

pub const MONTHS_PER_YEAR: usize = 12;
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
pub const DETAIL_PROMPT: &str = "Click an event date to view details.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellTone {
    Event,
    Holiday,
    Plain,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DayCell {
    pub day: u32,
    pub date: NaiveDate,
    pub event: Option<RaceEvent>,
    pub holiday: Option<Holiday>,
}

impl DayCell {
    pub fn tone(&self) -> CellTone {
        match (&self.event, &self.holiday) {
            (Some(_), _) => CellTone::Event,
            (None, Some(_)) => CellTone::Holiday,
            (None, None) => CellTone::Plain,
        }
    }

    /// An event falls on a holiday.
    pub fn is_overlap(&self) -> bool {
        self.event.is_some() && self.holiday.is_some()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CalendarCell {
    Blank,
    Day(DayCell),
}

impl CalendarCell {
    pub fn as_day(&self) -> Option<&DayCell> {
        match self {
            CalendarCell::Day(d) => Some(d),
            CalendarCell::Blank => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonthGrid {
    pub year: i32,
    /// 0-based month index (January = 0).
    pub month_index: usize,
    /// `YYYY-MM`
    pub key: String,
    /// Long label such as "March 2026".
    pub label: String,
    pub cells: Vec<CalendarCell>,
}

impl MonthGrid {
    pub fn day_cells(&self) -> impl Iterator<Item = &DayCell> {
        self.cells.iter().filter_map(CalendarCell::as_day)
    }

    pub fn weeks(&self) -> std::slice::Chunks<'_, CalendarCell> {
        self.cells.chunks(WEEKDAY_LABELS.len())
    }

    pub fn cell_for(&self, date: NaiveDate) -> Option<&DayCell> {
        self.day_cells().find(|c| c.date == date)
    }
}

type EventIndex<'a> = FnvHashMap<NaiveDate, &'a RaceEvent>;
type HolidayIndex = FnvHashMap<NaiveDate, Holiday>;

fn index_events(events: &[RaceEvent]) -> EventIndex<'_> {
    // later entries win when two events share a date
    events.iter().map(|e| (e.date, e)).collect()
}

fn index_holidays(year: i32) -> HolidayIndex {
    federal_holidays(year)
        .into_iter()
        .map(|h| (h.date, h))
        .collect()
}

fn build_month(
    year: i32,
    month_index: usize,
    events: &EventIndex<'_>,
    holidays: &HolidayIndex,
) -> MonthGrid {
    let month = month_index as u32 + 1;
    let mut cells = Vec::with_capacity(42);
    if let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) {
        let lead = first.weekday().num_days_from_sunday() as usize;
        cells.extend(std::iter::repeat(CalendarCell::Blank).take(lead));
        for day in 1..=days_in_month(year, month) {
            let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                continue;
            };
            cells.push(CalendarCell::Day(DayCell {
                day,
                date,
                event: events.get(&date).map(|e| (*e).clone()),
                holiday: holidays.get(&date).cloned(),
            }));
        }
    }
    while cells.len() % WEEKDAY_LABELS.len() != 0 {
        cells.push(CalendarCell::Blank);
    }
    MonthGrid {
        year,
        month_index,
        key: format!("{:04}-{:02}", year, month),
        label: month_label(year, month_index),
        cells,
    }
}

/// One padded grid for `month_index` (0-based) of `year`.
pub fn month_grid(year: i32, month_index: usize, events: &[RaceEvent]) -> MonthGrid {
    build_month(year, month_index, &index_events(events), &index_holidays(year))
}

/// Twelve padded grids for `year` with events and holidays bound by date.
pub fn build_year_months(year: i32, events: &[RaceEvent]) -> Vec<MonthGrid> {
    let by_date = index_events(events);
    let holidays = index_holidays(year);
    (0..MONTHS_PER_YEAR)
        .map(|m| build_month(year, m, &by_date, &holidays))
        .collect()
}

/// Month to open on: next same-year event on or after `today`, else today's
/// month when `today` is in `year`, else January.
pub fn initial_month_index(year: i32, events: &[RaceEvent], today: NaiveDate) -> usize {
    let next = events
        .iter()
        .map(|e| e.date)
        .filter(|d| d.year() == year && *d >= today)
        .min();
    match next {
        Some(d) => d.month0() as usize,
        None if today.year() == year => today.month0() as usize,
        None => 0,
    }
}

/// Explicit year, else the first event's year, else `today`'s year.
pub fn calendar_year(explicit: Option<i32>, events: &[RaceEvent], today: NaiveDate) -> i32 {
    explicit
        .or_else(|| events.first().map(|e| e.date.year()))
        .unwrap_or_else(|| today.year())
}

pub fn month_label(year: i32, month_index: usize) -> String {
    NaiveDate::from_ymd_opt(year, month_index as u32 + 1, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_default()
}

pub fn month_short_label(month_index: usize) -> &'static str {
    const SHORT: [&str; MONTHS_PER_YEAR] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    SHORT.get(month_index).copied().unwrap_or("")
}

/// Long form such as "May 30, 2026".
pub fn full_date_label(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Detail panel content for the current selection.
#[derive(Clone, Debug, PartialEq)]
pub enum EventDetail<'a> {
    Prompt,
    Event {
        event: &'a RaceEvent,
        date_label: String,
        badge: &'static str,
    },
}

/// Navigable calendar for one year with a single selected date.
#[derive(Clone, Debug)]
pub struct RaceCalendar {
    year: i32,
    events: Vec<RaceEvent>,
    months: Vec<MonthGrid>,
    month_index: usize,
    selected: Option<NaiveDate>,
}

impl RaceCalendar {
    pub fn new(events: Vec<RaceEvent>, year: Option<i32>, today: NaiveDate) -> Self {
        let year = calendar_year(year, &events, today);
        let months = build_year_months(year, &events);
        let month_index = initial_month_index(year, &events, today);
        let mut cal = Self {
            year,
            events,
            months,
            month_index,
            selected: None,
        };
        cal.reset_selection();
        log::info!(
            "[calendar] year={} events={} opening on {}",
            cal.year,
            cal.events.len(),
            cal.month().label
        );
        cal
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month_index(&self) -> usize {
        self.month_index
    }

    pub fn months(&self) -> &[MonthGrid] {
        &self.months
    }

    pub fn month(&self) -> &MonthGrid {
        &self.months[self.month_index]
    }

    /// Events of the visible month in calendar order.
    pub fn month_events(&self) -> Vec<&RaceEvent> {
        let mut list: Vec<&RaceEvent> = self
            .events
            .iter()
            .filter(|e| e.date.year() == self.year && e.date.month0() as usize == self.month_index)
            .collect();
        list.sort_by_key(|e| e.date);
        list
    }

    pub fn prev(&mut self) {
        let idx = if self.month_index == 0 {
            self.months.len() - 1
        } else {
            self.month_index - 1
        };
        self.set_month(idx);
    }

    pub fn next(&mut self) {
        let idx = if self.month_index + 1 == self.months.len() {
            0
        } else {
            self.month_index + 1
        };
        self.set_month(idx);
    }

    /// Jump straight to a month; out-of-range indices are ignored.
    pub fn select_month(&mut self, month_index: usize) -> bool {
        if month_index >= self.months.len() {
            return false;
        }
        self.set_month(month_index);
        true
    }

    /// Select an event date in the visible month. Dates without an event are ignored.
    pub fn select_date(&mut self, date: NaiveDate) -> bool {
        if self.month_events().iter().any(|e| e.date == date) {
            self.selected = Some(date);
            true
        } else {
            false
        }
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected
    }

    /// The event bound to the selected cell, so the detail view and the grid agree.
    pub fn selected_event(&self) -> Option<&RaceEvent> {
        self.month().cell_for(self.selected?)?.event.as_ref()
    }

    pub fn detail(&self) -> EventDetail<'_> {
        match self.selected_event() {
            Some(event) => EventDetail::Event {
                event,
                date_label: full_date_label(event.date),
                badge: event.status.badge_label(),
            },
            None => EventDetail::Prompt,
        }
    }

    pub fn is_selected(&self, cell: &DayCell) -> bool {
        cell.event.is_some() && self.selected == Some(cell.date)
    }

    fn set_month(&mut self, month_index: usize) {
        let changed = month_index != self.month_index;
        self.month_index = month_index;
        if changed {
            self.reset_selection();
        }
    }

    fn reset_selection(&mut self) {
        self.selected = self.month_events().first().map(|e| e.date);
    }
}
