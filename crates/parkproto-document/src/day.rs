use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Day tokens used by `days` / `validDays`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
    DayBeforeRedDay,
    Holiday,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown day token `{0}`")]
pub struct UnknownDay(pub String);

impl Day {
    pub const ALL: [Day; 9] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
        Day::DayBeforeRedDay,
        Day::Holiday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Day::Monday => "MONDAY",
            Day::Tuesday => "TUESDAY",
            Day::Wednesday => "WEDNESDAY",
            Day::Thursday => "THURSDAY",
            Day::Friday => "FRIDAY",
            Day::Saturday => "SATURDAY",
            Day::Sunday => "SUNDAY",
            Day::DayBeforeRedDay => "DAY_BEFORE_RED_DAY",
            Day::Holiday => "HOLIDAY",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Day {
    type Err = UnknownDay;

    /// Case-insensitive; spaces and dashes count as underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        Day::ALL
            .into_iter()
            .find(|day| day.as_str() == normalized)
            .ok_or_else(|| UnknownDay(s.to_string()))
    }
}
