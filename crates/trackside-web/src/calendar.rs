use crate::dom::{self, Listener};
use chrono::NaiveDate;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use trackside_core::schedule::season_events;
use trackside_core::{
    events_from_json, month_short_label, parse_date_key, CalendarCell, CellTone, DayCell,
    EventDetail, RaceCalendar, RaceEvent, StatusStyling, MONTHS_PER_YEAR, WEEKDAY_LABELS,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

const ROOT_CLASS: &str = "race-calendar";

/// Today's local calendar date from the JS clock.
fn today() -> NaiveDate {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(now.get_full_year() as i32, now.get_month() + 1, now.get_date())
        .unwrap_or_default()
}

fn load_events(events_json: Option<String>) -> Vec<RaceEvent> {
    let Some(json) = events_json else {
        return season_events();
    };
    match events_from_json(&json) {
        Ok(events) => events,
        Err(e) => {
            log::error!("[calendar] bad events JSON, using built-in season: {}", e);
            season_events()
        }
    }
}

fn load_styling(json: Option<String>) -> StatusStyling {
    match json.as_deref().map(StatusStyling::from_json) {
        Some(Ok(styling)) => styling,
        Some(Err(e)) => {
            log::error!("[calendar] bad status styling JSON, ignoring: {}", e);
            StatusStyling::default()
        }
        None => StatusStyling::default(),
    }
}

struct CalendarView {
    calendar: RaceCalendar,
    styling: StatusStyling,
    document: web::Document,
    root: web::HtmlElement,
}

impl CalendarView {
    fn el(&self, tag: &str, class: &str, text: &str) -> anyhow::Result<web::HtmlElement> {
        let el = dom::create(&self.document, tag, class)
            .ok_or_else(|| anyhow::anyhow!("cannot create <{}>", tag))?;
        if !text.is_empty() {
            el.set_text_content(Some(text));
        }
        Ok(el)
    }

    fn append(parent: &web::Element, child: &web::Element) -> anyhow::Result<()> {
        parent
            .append_child(child)
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("append failed: {:?}", e))
    }

    fn render(&self) {
        self.root.set_inner_html("");
        if let Err(e) = self.render_into() {
            log::error!("[calendar] render failed: {:?}", e);
        }
    }

    fn render_into(&self) -> anyhow::Result<()> {
        let root: &web::Element = &self.root;
        Self::append(root, &self.header()?)?;
        Self::append(root, &self.month_strip()?)?;

        let weekdays = self.el("div", "race-calendar__weekdays", "")?;
        for label in WEEKDAY_LABELS {
            Self::append(&weekdays, &self.el("p", "", label)?)?;
        }
        Self::append(root, &weekdays)?;

        let grid = self.el("div", "race-calendar__grid", "")?;
        for cell in &self.calendar.month().cells {
            let node = match cell {
                CalendarCell::Blank => self.el("div", "race-calendar__cell is-blank", "")?,
                CalendarCell::Day(day) => self.day_cell(day)?,
            };
            Self::append(&grid, &node)?;
        }
        Self::append(root, &grid)?;
        Self::append(root, &self.detail()?)
    }

    fn header(&self) -> anyhow::Result<web::HtmlElement> {
        let header = self.el("div", "race-calendar__header", "")?;
        let title = self.el("p", "race-calendar__month", &self.calendar.month().label)?;
        Self::append(&header, &title)?;

        let nav = self.el("div", "race-calendar__nav", "")?;
        for (action, text, aria) in [("prev", "Prev", "Previous month"), ("next", "Next", "Next month")] {
            let b = dom::button(&self.document, "race-calendar__nav-button", text)
                .ok_or_else(|| anyhow::anyhow!("cannot create button"))?;
            _ = b.set_attribute("data-action", action);
            _ = b.set_attribute("aria-label", aria);
            Self::append(&nav, &b)?;
        }
        Self::append(&header, &nav)?;
        Ok(header)
    }

    fn month_strip(&self) -> anyhow::Result<web::HtmlElement> {
        let strip = self.el("div", "race-calendar__months", "")?;
        for i in 0..MONTHS_PER_YEAR {
            let label = month_short_label(i);
            let b = dom::button(&self.document, "race-calendar__month-button", label)
                .ok_or_else(|| anyhow::anyhow!("cannot create button"))?;
            _ = b.set_attribute("data-action", "month");
            _ = b.set_attribute("data-month", &i.to_string());
            _ = b.set_attribute("aria-label", &format!("Show {}", label));
            dom::set_class(&b, "is-active", i == self.calendar.month_index());
            Self::append(&strip, &b)?;
        }
        Ok(strip)
    }

    fn day_cell(&self, cell: &DayCell) -> anyhow::Result<web::HtmlElement> {
        let tone = match cell.tone() {
            CellTone::Event => "is-event",
            CellTone::Holiday => "is-holiday",
            CellTone::Plain => "is-plain",
        };
        let node = self.el("div", &format!("race-calendar__cell {}", tone), "")?;
        dom::set_class(&node, "is-overlap", cell.is_overlap());
        let selected = self.calendar.is_selected(cell);
        dom::set_class(&node, "is-selected", selected);

        let day_text = cell.day.to_string();
        let Some(event) = &cell.event else {
            Self::append(&node, &self.el("p", "race-calendar__day", &day_text)?)?;
            if let Some(holiday) = &cell.holiday {
                Self::append(&node, &self.holiday_badge(holiday.name)?)?;
            }
            return Ok(node);
        };

        let b = dom::button(&self.document, "race-calendar__event", "")
            .ok_or_else(|| anyhow::anyhow!("cannot create button"))?;
        _ = b.set_attribute("data-action", "date");
        _ = b.set_attribute("data-date", &event.date_key());
        _ = b.set_attribute("aria-pressed", if selected { "true" } else { "false" });
        Self::append(&b, &self.el("p", "race-calendar__day", &day_text)?)?;
        Self::append(&b, &self.el("p", "race-calendar__title", &event.title)?)?;
        Self::append(&b, &self.el("p", "race-calendar__track", &event.track)?)?;
        let badges = self.el("div", "race-calendar__badges", "")?;
        Self::append(&badges, &self.status_badge(event)?)?;
        if let Some(holiday) = &cell.holiday {
            Self::append(&badges, &self.holiday_badge(holiday.name)?)?;
        }
        Self::append(&b, &badges)?;
        Self::append(&node, &b)?;
        Ok(node)
    }

    fn status_badge(&self, event: &RaceEvent) -> anyhow::Result<web::HtmlElement> {
        let class = format!(
            "race-calendar__badge {}",
            self.styling.token(event.status)
        );
        self.el("span", class.trim_end(), event.status.badge_label())
    }

    fn holiday_badge(&self, name: &str) -> anyhow::Result<web::HtmlElement> {
        let badge = self.el("span", "race-calendar__badge is-holiday", "Holiday")?;
        _ = badge.set_attribute("title", name);
        Ok(badge)
    }

    fn detail(&self) -> anyhow::Result<web::HtmlElement> {
        let panel = self.el("div", "race-calendar__detail", "")?;
        Self::append(&panel, &self.el("p", "race-calendar__detail-heading", "Event Details")?)?;
        match self.calendar.detail() {
            EventDetail::Prompt => {
                let prompt = self.el("p", "race-calendar__prompt", trackside_core::DETAIL_PROMPT)?;
                Self::append(&panel, &prompt)?;
            }
            EventDetail::Event {
                event, date_label, ..
            } => {
                Self::append(&panel, &self.el("p", "race-calendar__title", &event.title)?)?;
                Self::append(&panel, &self.el("p", "race-calendar__track", &event.track)?)?;
                Self::append(&panel, &self.el("p", "race-calendar__date", &date_label)?)?;
                Self::append(&panel, &self.status_badge(event)?)?;
                Self::append(&panel, &self.el("span", "race-calendar__result", &event.result)?)?;
            }
        }
        Ok(panel)
    }

    /// Apply a delegated click on an element carrying `data-action`.
    fn on_action(&mut self, target: &web::Element) {
        let changed = match target.get_attribute("data-action").as_deref() {
            Some("prev") => {
                self.calendar.prev();
                true
            }
            Some("next") => {
                self.calendar.next();
                true
            }
            Some("month") => target
                .get_attribute("data-month")
                .and_then(|m| m.parse::<usize>().ok())
                .is_some_and(|m| self.calendar.select_month(m)),
            Some("date") => target
                .get_attribute("data-date")
                .and_then(|d| parse_date_key(&d).ok())
                .is_some_and(|d| self.calendar.select_date(d)),
            _ => false,
        };
        if changed {
            self.render();
        }
    }
}

fn click_listener(view: Weak<RefCell<CalendarView>>) -> Closure<dyn FnMut(web::MouseEvent)> {
    Closure::wrap(Box::new(move |ev: web::MouseEvent| {
        let Some(view) = view.upgrade() else {
            return;
        };
        let action = ev
            .target()
            .and_then(|t| t.dyn_into::<web::Element>().ok())
            .and_then(|el| el.closest("[data-action]").ok().flatten());
        if let Some(el) = action {
            view.borrow_mut().on_action(&el);
        }
    }) as Box<dyn FnMut(web::MouseEvent)>)
}

/// Month-by-month race calendar rendered into a host element.
#[wasm_bindgen]
pub struct RaceCalendarWidget {
    view: Rc<RefCell<CalendarView>>,
    click: Option<Listener<dyn FnMut(web::MouseEvent)>>,
}

fn mount_view(
    container: &web::HtmlElement,
    events: Vec<RaceEvent>,
    year: Option<i32>,
    styling: StatusStyling,
) -> anyhow::Result<CalendarView> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let root = dom::create(&document, "div", ROOT_CLASS)
        .ok_or_else(|| anyhow::anyhow!("cannot create calendar root"))?;
    container
        .append_child(&root)
        .map_err(|e| anyhow::anyhow!("append failed: {:?}", e))?;
    Ok(CalendarView {
        calendar: RaceCalendar::new(events, year, today()),
        styling,
        document,
        root,
    })
}

#[wasm_bindgen]
impl RaceCalendarWidget {
    /// Render the calendar into `container`. `events_json` is a JSON array of
    /// events; without it the built-in season is shown.
    pub fn mount(
        container: web::HtmlElement,
        events_json: Option<String>,
        year: Option<i32>,
        status_styling_json: Option<String>,
    ) -> Result<RaceCalendarWidget, JsValue> {
        let events = load_events(events_json);
        let styling = load_styling(status_styling_json);
        let view = mount_view(&container, events, year, styling)
            .map_err(|e| JsValue::from_str(&format!("{:?}", e)))?;
        view.render();
        let root: web::EventTarget = view.root.clone().into();
        let view = Rc::new(RefCell::new(view));
        let click = Listener::attach(&root, "click", click_listener(Rc::downgrade(&view)));
        Ok(RaceCalendarWidget {
            view,
            click: Some(click),
        })
    }

    pub fn prev(&mut self) {
        let mut v = self.view.borrow_mut();
        v.calendar.prev();
        v.render();
    }

    pub fn next(&mut self) {
        let mut v = self.view.borrow_mut();
        v.calendar.next();
        v.render();
    }

    pub fn select_month(&mut self, month_index: usize) -> bool {
        let mut v = self.view.borrow_mut();
        let changed = v.calendar.select_month(month_index);
        if changed {
            v.render();
        }
        changed
    }

    /// Select the event on `date` (`YYYY-MM-DD`) in the visible month.
    pub fn select_date(&mut self, date: &str) -> bool {
        let Ok(date) = parse_date_key(date) else {
            return false;
        };
        let mut v = self.view.borrow_mut();
        let changed = v.calendar.select_date(date);
        if changed {
            v.render();
        }
        changed
    }

    #[wasm_bindgen(getter)]
    pub fn year(&self) -> i32 {
        self.view.borrow().calendar.year()
    }

    #[wasm_bindgen(getter)]
    pub fn month_index(&self) -> usize {
        self.view.borrow().calendar.month_index()
    }

    #[wasm_bindgen(getter)]
    pub fn selected_date(&self) -> Option<String> {
        self.view
            .borrow()
            .calendar
            .selected_date()
            .map(trackside_core::date_key)
    }

    pub fn unmount(&mut self) {
        if let Some(mut click) = self.click.take() {
            click.detach();
            self.view.borrow().root.remove();
            log::info!("[calendar] unmounted");
        }
    }
}
