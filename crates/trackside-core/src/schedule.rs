//! Built-in season schedule used when the page supplies no event list.

use crate::events::{RaceEvent, RaceStatus};
use chrono::NaiveDate;

const SEASON_2026: [(i32, u32, u32, &str, &str, &str, RaceStatus); 5] = [
    (
        2026,
        2,
        14,
        "Daytona Endurance Weekend",
        "Daytona International Speedway",
        "P2 Class",
        RaceStatus::Complete,
    ),
    (
        2026,
        3,
        28,
        "Spring Test and Tune",
        "Sebring International Raceway",
        "Data Session",
        RaceStatus::Testing,
    ),
    (
        2026,
        5,
        30,
        "Sebring Race Weekend",
        "Sebring International Raceway",
        "Next",
        RaceStatus::Upcoming,
    ),
    (
        2026,
        7,
        18,
        "Summer Enduro",
        "Road Atlanta",
        "TBD",
        RaceStatus::Upcoming,
    ),
    (
        2026,
        9,
        12,
        "Night Event",
        "Virginia International Raceway",
        "TBD",
        RaceStatus::Upcoming,
    ),
];

pub fn season_events() -> Vec<RaceEvent> {
    SEASON_2026
        .iter()
        .filter_map(|&(y, m, d, title, track, result, status)| {
            Some(RaceEvent {
                date: NaiveDate::from_ymd_opt(y, m, d)?,
                title: title.to_string(),
                track: track.to_string(),
                result: result.to_string(),
                status,
            })
        })
        .collect()
}
