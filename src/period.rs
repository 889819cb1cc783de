//! Inclusive calendar date ranges
//!
//! Service periods, station assignments and hazard activity windows are all
//! whole-day ranges where both endpoints count. Overlap arithmetic lives here
//! so the checklist engine and the hazard matcher agree on day counts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Average Gregorian year length used to convert day counts to years.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Inclusive `[start, end]` date range.
///
/// Deserialization does not reject inverted ranges; callers that accept
/// external input check [`DateRange::is_ordered`] during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range without checking ordering
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Create a range, returning `None` when `end` precedes `start`
    pub fn ordered(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        let range = Self::new(start, end);
        range.is_ordered().then_some(range)
    }

    /// Whether `start <= end`
    pub fn is_ordered(&self) -> bool {
        self.start <= self.end
    }

    /// Inclusive day count. Inverted ranges have zero days.
    pub fn days(&self) -> u32 {
        if !self.is_ordered() {
            return 0;
        }
        let span = (self.end - self.start).num_days() + 1;
        u32::try_from(span).unwrap_or(u32::MAX)
    }

    /// Elapsed years between the endpoints: `(end - start)` days / 365.25.
    ///
    /// Measured on the exclusive span, so 2000-01-01..2009-12-31 is just
    /// under ten years rather than ten years and a day.
    pub fn years(&self) -> f64 {
        if !self.is_ordered() {
            return 0.0;
        }
        (self.end - self.start).num_days() as f64 / DAYS_PER_YEAR
    }

    /// The common sub-range of two ranges, if any
    pub fn intersection(&self, other: &DateRange) -> Option<DateRange> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        DateRange::ordered(start, end)
    }

    /// Inclusive day count of the intersection (0 when disjoint)
    pub fn overlap_days(&self, other: &DateRange) -> u32 {
        self.intersection(other).map_or(0, |r| r.days())
    }

    /// Whether the two ranges share at least one day
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.intersection(other).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_single_day_range_has_one_day() {
        let r = DateRange::new(date(2010, 5, 1), date(2010, 5, 1));
        assert_eq!(r.days(), 1);
    }

    #[test]
    fn test_inverted_range_has_zero_days() {
        let r = DateRange::new(date(2010, 5, 2), date(2010, 5, 1));
        assert!(!r.is_ordered());
        assert_eq!(r.days(), 0);
        assert!(DateRange::ordered(r.start, r.end).is_none());
    }

    #[test]
    fn test_full_year_inside_active_window() {
        let station = DateRange::new(date(2005, 1, 1), date(2005, 12, 31));
        let hazard = DateRange::new(date(2003, 1, 1), date(2011, 12, 31));
        assert_eq!(station.overlap_days(&hazard), 365);
        assert_eq!(hazard.overlap_days(&station), 365);
    }

    #[test]
    fn test_disjoint_ranges_do_not_overlap() {
        let a = DateRange::new(date(2001, 1, 1), date(2001, 6, 30));
        let b = DateRange::new(date(2001, 7, 1), date(2001, 12, 31));
        assert_eq!(a.overlap_days(&b), 0);
        assert!(!a.overlaps(&b));
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    fn test_partial_overlap_is_symmetric() {
        let a = DateRange::new(date(2004, 3, 1), date(2004, 3, 20));
        let b = DateRange::new(date(2004, 3, 11), date(2004, 4, 30));
        assert_eq!(a.overlap_days(&b), 10);
        assert_eq!(b.overlap_days(&a), 10);
    }

    #[test]
    fn test_whole_calendar_years_stay_under_boundary() {
        let ten = DateRange::new(date(2000, 1, 1), date(2009, 12, 31));
        assert!(ten.years() < 10.0);
        assert!(ten.years() > 9.99);

        let five = DateRange::new(date(2000, 1, 1), date(2004, 12, 31));
        assert!(five.years() < 5.0);

        let single = DateRange::new(date(2000, 1, 1), date(2000, 1, 1));
        assert_eq!(single.years(), 0.0);
        assert_eq!(DateRange::new(date(2001, 1, 1), date(2000, 1, 1)).years(), 0.0);
    }
}
