//! # cruak-calendar
//!
//! Gregorian month arithmetic for monthly climate archives.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["year"] -->|"canonical_date()"| B["NaiveDate (Dec 15)"]
//!     B -->|"add_years()"| B
//!     B -->|"MonthKey::from_date()"| C["MonthKey"]
//!     C -->|".shift()"| C
//!     B -->|"trailing_months()"| D["[MonthKey; n], oldest first"]
//!     C -->|".last_day()"| E["NaiveDate"]
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use cruak_calendar::{MonthKey, add_years, canonical_date, trailing_months};
//!
//! let first = canonical_date(1902).unwrap();
//! assert_eq!(first.to_string(), "1902-12-15");
//!
//! let later = add_years(first, 10).unwrap();
//! assert_eq!(later.to_string(), "1912-12-15");
//!
//! let window = trailing_months(first, 12);
//! assert_eq!(window[0], MonthKey::new(1902, 1).unwrap());
//! assert_eq!(window[11], MonthKey::new(1902, 12).unwrap());
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `month` | Month key newtype and month-length lookup |
//! | `date` | Year/month shifts, canonical date, `YYYY-MM-DD` parsing |
//! | `window` | Trailing month windows |
//! | `error` | Error types |

mod date;
mod error;
mod month;
mod window;

pub use date::{
    CANONICAL_DAY, CANONICAL_MONTH, add_months, add_years, canonical_date, parse_ymd, year_delta,
};
pub use error::CalendarError;
pub use month::{MonthKey, days_in_month};
pub use window::trailing_months;
