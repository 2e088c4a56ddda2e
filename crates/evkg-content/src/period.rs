//! Calendar bucketing for temporal aggregation.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Bucket size for temporal aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// Calendar months, keyed by their first day.
    #[default]
    Month,
    /// Weeks running Monday to Sunday, keyed by the Monday.
    Week,
}

impl Granularity {
    /// First day of the bucket containing `date`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use evkg_content::Granularity;
    ///
    /// let d = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap(); // a Thursday
    /// assert_eq!(Granularity::Month.period_start(d), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    /// assert_eq!(Granularity::Week.period_start(d), NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
    /// ```
    pub fn period_start(self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Month => date.with_day(1).unwrap_or(date),
            Self::Week => {
                let offset = u64::from(date.weekday().num_days_from_monday());
                date.checked_sub_days(Days::new(offset)).unwrap_or(date)
            }
        }
    }

    /// Suffix used in chart titles ("per Month").
    pub fn per_label(self) -> &'static str {
        match self {
            Self::Month => "per Month",
            Self::Week => "per Week",
        }
    }

    /// Adjective used in chart titles ("Monthly").
    pub fn adjective(self) -> &'static str {
        match self {
            Self::Month => "Monthly",
            Self::Week => "Weekly",
        }
    }

    /// Name as used in configuration and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::Week => "week",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Granularity {
    type Err = evkg_core::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "month" | "monthly" | "m" => Ok(Self::Month),
            "week" | "weekly" | "w" => Ok(Self::Week),
            other => Err(evkg_core::Error::config(format!(
                "Unknown granularity '{other}' (expected 'month' or 'week')"
            ))),
        }
    }
}
