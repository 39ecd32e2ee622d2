use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

/// How long after posting a user wants to be nudged to rate a plate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReminderFreq {
    #[serde(rename = "45min")]
    FortyFiveMinutes,
    #[default]
    #[serde(rename = "1day")]
    OneDay,
    #[serde(rename = "1week")]
    OneWeek,
    #[serde(rename = "none")]
    Never,
}

impl ReminderFreq {
    pub fn as_str(self) -> &'static str {
        match self {
            ReminderFreq::FortyFiveMinutes => "45min",
            ReminderFreq::OneDay => "1day",
            ReminderFreq::OneWeek => "1week",
            ReminderFreq::Never => "none",
        }
    }

    /// Point-in-time check against the elapsed time since the plate was posted.
    ///
    /// Windows are narrow on purpose: `45min` fires strictly between 44 and 46
    /// minutes, `1day` and `1week` fire while the truncated day count equals 1
    /// or 7. Nothing records a sent reminder, so a job polling inside a window
    /// more than once sends more than once.
    pub fn is_due(self, elapsed: Duration) -> bool {
        let minutes = elapsed.as_seconds_f64() / 60.0;
        let days = elapsed.whole_days();
        match self {
            ReminderFreq::FortyFiveMinutes => minutes > 44.0 && minutes < 46.0,
            ReminderFreq::OneDay => days == 1,
            ReminderFreq::OneWeek => days == 7,
            ReminderFreq::Never => false,
        }
    }

    pub fn is_due_at(self, created_at: OffsetDateTime, now: OffsetDateTime) -> bool {
        self.is_due(now - created_at)
    }
}

impl fmt::Display for ReminderFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown reminder frequency {0:?}")]
pub struct UnknownFreq(pub String);

impl FromStr for ReminderFreq {
    type Err = UnknownFreq;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "45min" => Ok(ReminderFreq::FortyFiveMinutes),
            "1day" => Ok(ReminderFreq::OneDay),
            "1week" => Ok(ReminderFreq::OneWeek),
            "none" => Ok(ReminderFreq::Never),
            other => Err(UnknownFreq(other.to_string())),
        }
    }
}
