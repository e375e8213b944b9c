//! Reporting period
//!
//! An inclusive date range inside a single fiscal year. The fiscal year is
//! the calendar year.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive date range used to restrict balance queries and reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    /// Create a period, rejecting an end before the start
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        if end < start {
            return Err(PeriodError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// January 1 to December 31 of `year`
    pub fn fiscal_year(year: i32) -> Result<Self, PeriodError> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(PeriodError::InvalidYear(year))?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31).ok_or(PeriodError::InvalidYear(year))?;
        Ok(Self { start, end })
    }

    /// Resolve optional bounds against a fiscal year
    ///
    /// Missing bounds default to the year's first/last day; both bounds must
    /// lie in `year`.
    pub fn within_year(
        year: i32,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self, PeriodError> {
        let full = Self::fiscal_year(year)?;
        let start = start.unwrap_or(full.start);
        let end = end.unwrap_or(full.end);

        if start.year() != year || end.year() != year {
            return Err(PeriodError::OutsideYear { year });
        }

        Self::new(start, end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

/// Errors building a period
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    OutsideYear { year: i32 },
    InvalidYear(i32),
}

impl fmt::Display for PeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndBeforeStart { start, end } => {
                write!(f, "Period end {} is before start {}", end, start)
            }
            Self::OutsideYear { year } => write!(f, "Start or end is not in year {}", year),
            Self::InvalidYear(year) => write!(f, "Invalid year: {}", year),
        }
    }
}

impl std::error::Error for PeriodError {}

impl From<PeriodError> for crate::error::LedgerError {
    fn from(err: PeriodError) -> Self {
        Self::OutOfRange(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fiscal_year() {
        let period = Period::fiscal_year(2024).unwrap();
        assert_eq!(period.start, date(2024, 1, 1));
        assert_eq!(period.end, date(2024, 12, 31));
        assert!(period.contains(date(2024, 6, 30)));
        assert!(!period.contains(date(2025, 1, 1)));
    }

    #[test]
    fn test_within_year_defaults() {
        let period = Period::within_year(2024, Some(date(2024, 4, 1)), None).unwrap();
        assert_eq!(period.start, date(2024, 4, 1));
        assert_eq!(period.end, date(2024, 12, 31));
    }

    #[test]
    fn test_within_year_rejects_other_year() {
        assert_eq!(
            Period::within_year(2024, Some(date(2023, 12, 31)), None),
            Err(PeriodError::OutsideYear { year: 2024 })
        );
    }

    #[test]
    fn test_end_before_start() {
        assert!(matches!(
            Period::within_year(2024, Some(date(2024, 5, 1)), Some(date(2024, 4, 1))),
            Err(PeriodError::EndBeforeStart { .. })
        ));
    }

    #[test]
    fn test_display() {
        let period = Period::fiscal_year(2024).unwrap();
        assert_eq!(period.to_string(), "2024-01-01 - 2024-12-31");
    }
}
