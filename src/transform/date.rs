//! Calendar dates written in page text.

use core::{cmp::Ordering, fmt};
use time::{Date, OffsetDateTime, PrimitiveDateTime, macros::format_description};

/// The current local date and time. Falls back to UTC if the local offset
/// cannot be determined.
pub fn local_now() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    PrimitiveDateTime::new(now.date(), now.time())
}

/// Parses a complete date written as `TT.MM.JJJJ`. Day and month may omit
/// the leading zero.
pub fn parse_date(text: &str) -> Option<Date> {
    Date::parse(
        text.trim(),
        format_description!("[day padding:none].[month padding:none].[year]"),
    )
    .ok()
}

/// A date where any of the parts may be unknown.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PartialDate {
    /// The day of the month.
    pub day: Option<u8>,
    /// The month, starting from 1.
    pub month: Option<u8>,
    /// The year.
    pub year: Option<i32>,
}

impl PartialDate {
    /// Parses one of `TT.MM.JJJJ`, `TT.MM.`, `MM.JJJJ`, `MM.`, or `JJJJ`.
    /// Leading spaces are skipped and everything after the next space, like
    /// a time of day, is ignored.
    ///
    /// The numbers are not range checked.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim_start_matches(' ');
        let text = text.split(' ').next().unwrap_or_default();

        let parts = text.splitn(3, '.').collect::<Vec<_>>();
        let (day, month, year) = match parts[..] {
            [day, month, year] => (Some(day.parse().ok()?), Some(month.parse().ok()?), year),
            [month, year] => (None, Some(month.parse().ok()?), year),
            [year] => (None, None, year),
            _ => return None,
        };
        let year = if year.is_empty() {
            None
        } else {
            Some(year.parse().ok()?)
        };

        Some(Self { day, month, year })
    }

    /// The same day and month in another year.
    #[must_use]
    pub fn with_year(self, year: i32) -> Self {
        Self {
            year: Some(year),
            ..self
        }
    }

    /// Compares two dates. Years are only compared if both are known, and a
    /// missing day or month counts as the first.
    ///
    /// This is only a total order for dates which all have a year.
    pub fn compare(&self, other: &Self) -> Ordering {
        if let (Some(year), Some(other_year)) = (self.year, other.year)
            && year != other_year
        {
            return year.cmp(&other_year);
        }
        let key = |date: &Self| (date.month.unwrap_or(1), date.day.unwrap_or(1));
        key(self).cmp(&key(other))
    }
}

impl From<Date> for PartialDate {
    fn from(date: Date) -> Self {
        Self {
            day: Some(date.day()),
            month: Some(date.month().into()),
            year: Some(date.year()),
        }
    }
}

impl fmt::Display for PartialDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(day) = self.day {
            write!(f, "{day:02}.")?;
        }
        if let Some(month) = self.month {
            write!(f, "{month:02}.")?;
        }
        if let Some(year) = self.year {
            write!(f, "{year}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn partial(day: Option<u8>, month: Option<u8>, year: Option<i32>) -> PartialDate {
        PartialDate { day, month, year }
    }

    #[test]
    fn parse_partial() {
        assert_eq!(
            PartialDate::parse("7.3.1980"),
            Some(partial(Some(7), Some(3), Some(1980)))
        );
        assert_eq!(
            PartialDate::parse("  24.12. 18:00"),
            Some(partial(Some(24), Some(12), None))
        );
        assert_eq!(PartialDate::parse("05.2024"), Some(partial(None, Some(5), Some(2024))));
        assert_eq!(PartialDate::parse("11."), Some(partial(None, Some(11), None)));
        assert_eq!(PartialDate::parse("1999"), Some(partial(None, None, Some(1999))));
        assert_eq!(PartialDate::parse(""), Some(PartialDate::default()));
        assert_eq!(PartialDate::parse("morgen"), None);
        assert_eq!(PartialDate::parse(".5."), None);
        assert_eq!(PartialDate::parse("1.2.3.4"), None);
    }

    #[test]
    fn display() {
        assert_eq!(partial(Some(7), Some(3), Some(1980)).to_string(), "07.03.1980");
        assert_eq!(partial(None, Some(11), None).to_string(), "11.");
        assert_eq!(partial(None, None, Some(1999)).to_string(), "1999");
        assert_eq!(PartialDate::from(date!(2024 - 03 - 15)).to_string(), "15.03.2024");
    }

    #[test]
    fn compare() {
        let march = partial(None, Some(3), None);
        let first_of_march = partial(Some(1), Some(3), Some(1990));
        assert_eq!(march.compare(&first_of_march), Ordering::Equal);
        assert_eq!(
            partial(Some(31), Some(12), Some(2023)).compare(&partial(Some(1), Some(1), Some(2024))),
            Ordering::Less
        );
        assert_eq!(
            partial(Some(2), Some(1), None).compare(&partial(Some(1), Some(1), Some(2024))),
            Ordering::Greater
        );
        assert_eq!(
            first_of_march.with_year(2024).compare(&partial(Some(1), Some(3), Some(2024))),
            Ordering::Equal
        );
    }

    #[test]
    fn full_dates() {
        assert_eq!(parse_date("15.03.1980"), Some(date!(1980 - 03 - 15)));
        assert_eq!(parse_date(" 1.2.2000 "), Some(date!(2000 - 02 - 01)));
        assert_eq!(parse_date("31.02.2000"), None);
        assert_eq!(parse_date("03.1980"), None);
    }
}
