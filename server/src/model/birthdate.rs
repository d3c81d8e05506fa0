// Truthful
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! The `Birthdate` data type.

use time::macros::format_description;
use time::{Date, Month};
use truthful_core::model::{ModelError, ModelResult};

/// Minimum age, in years, that a user must have to register.
const MIN_AGE_YEARS: i32 = 13;

/// A calendar date on which a user was born.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Birthdate(Date);

impl Birthdate {
    /// Parses a birthdate in `YYYY-MM-DD` form and checks that it belongs to someone who is at
    /// least 13 years old as of `today`.
    pub(crate) fn new<S: AsRef<str>>(s: S, today: Date) -> ModelResult<Self> {
        let format = format_description!("[year]-[month]-[day]");
        let date = Date::parse(s.as_ref(), format).map_err(|_| {
            ModelError("birthdate must be a valid date in the YYYY-MM-DD format".to_owned())
        })?;

        if date > today {
            return Err(ModelError("birthdate cannot be in the future".to_owned()));
        }
        if date > years_before(today, MIN_AGE_YEARS) {
            return Err(ModelError(format!(
                "birthdate must be more than {} years ago",
                MIN_AGE_YEARS
            )));
        }

        Ok(Self(date))
    }

    /// Formats the birthdate for storage.
    pub(crate) fn to_db_string(self) -> String {
        let (year, month, day) = self.0.to_calendar_date();
        format!("{:04}-{:02}-{:02}", year, u8::from(month), day)
    }
}

/// Computes the date `years` before `date`.  February 29th rolls over to March 1st when the
/// target year is not a leap year.
fn years_before(date: Date, years: i32) -> Date {
    let year = date.year() - years;
    match Date::from_calendar_date(year, date.month(), date.day()) {
        Ok(d) => d,
        Err(_) => Date::from_calendar_date(year, Month::March, 1).unwrap_or(Date::MIN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_birthdate_ok() {
        let birthdate = Birthdate::new("2000-01-01", date!(2023 - 06 - 15)).unwrap();
        assert_eq!("2000-01-01", birthdate.to_db_string());
    }

    #[test]
    fn test_birthdate_exactly_thirteen_years() {
        let today = date!(2023 - 06 - 15);
        Birthdate::new("2010-06-15", today).unwrap();
        assert_eq!(
            ModelError("birthdate must be more than 13 years ago".to_owned()),
            Birthdate::new("2010-06-16", today).unwrap_err()
        );
    }

    #[test]
    fn test_birthdate_leap_day() {
        let today = date!(2024 - 02 - 29);
        Birthdate::new("2011-02-28", today).unwrap();
        Birthdate::new("2011-03-01", today).unwrap();
        assert_eq!(
            ModelError("birthdate must be more than 13 years ago".to_owned()),
            Birthdate::new("2011-03-02", today).unwrap_err()
        );
    }

    #[test]
    fn test_years_before_leap_day() {
        assert_eq!(date!(2011 - 03 - 01), years_before(date!(2024 - 02 - 29), 13));
        assert_eq!(date!(2012 - 02 - 29), years_before(date!(2024 - 02 - 29), 12));
        assert_eq!(date!(2010 - 06 - 15), years_before(date!(2023 - 06 - 15), 13));
    }

    #[test]
    fn test_birthdate_future() {
        assert_eq!(
            ModelError("birthdate cannot be in the future".to_owned()),
            Birthdate::new("2030-01-01", date!(2023 - 06 - 15)).unwrap_err()
        );
    }

    #[test]
    fn test_birthdate_bad_format() {
        for raw in ["", "2000/01/01", "01-01-2000", "2000-13-01", "2001-02-29", "yesterday"] {
            match Birthdate::new(raw, date!(2023 - 06 - 15)) {
                Err(e) => assert!(e.0.contains("YYYY-MM-DD"), "{}", e),
                Ok(_) => panic!("Birthdate {} should have been rejected", raw),
            }
        }
    }
}
