//! Strict date formats for `date` columns.
//!
//! A value must have exactly the pattern's length, digits where the pattern
//! has digits, the pattern's separators, and name a real calendar day.

use chrono::NaiveDate;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    YyyyMmDd,
    DdMmYyyy,
    MmDdYyyy,
    DashedYyyyMmDd,
    DashedDdMmYyyy,
}

struct Layout {
    shape: &'static str,
    year: Range<usize>,
    month: Range<usize>,
    day: Range<usize>,
}

impl DateFormat {
    pub const ALL: [DateFormat; 5] = [
        Self::YyyyMmDd,
        Self::DdMmYyyy,
        Self::MmDdYyyy,
        Self::DashedYyyyMmDd,
        Self::DashedDdMmYyyy,
    ];

    /// Resolves a rule's format token, ignoring ASCII case.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.token().eq_ignore_ascii_case(token))
    }

    pub const fn token(self) -> &'static str {
        match self {
            Self::YyyyMmDd => "yyyymmdd",
            Self::DdMmYyyy => "ddmmyyyy",
            Self::MmDdYyyy => "mmddyyyy",
            Self::DashedYyyyMmDd => "yyyy-mm-dd",
            Self::DashedDdMmYyyy => "dd-mm-yyyy",
        }
    }

    fn layout(self) -> Layout {
        match self {
            Self::YyyyMmDd => Layout {
                shape: "########",
                year: 0..4,
                month: 4..6,
                day: 6..8,
            },
            Self::DdMmYyyy => Layout {
                shape: "########",
                year: 4..8,
                month: 2..4,
                day: 0..2,
            },
            Self::MmDdYyyy => Layout {
                shape: "########",
                year: 4..8,
                month: 0..2,
                day: 2..4,
            },
            Self::DashedYyyyMmDd => Layout {
                shape: "####-##-##",
                year: 0..4,
                month: 5..7,
                day: 8..10,
            },
            Self::DashedDdMmYyyy => Layout {
                shape: "##-##-####",
                year: 6..10,
                month: 3..5,
                day: 0..2,
            },
        }
    }

    /// Parses `value` strictly; `None` when it does not match exactly.
    pub fn parse(self, value: &str) -> Option<NaiveDate> {
        let layout = self.layout();
        if !matches_shape(value, layout.shape) {
            return None;
        }
        // Shape guarantees ASCII digits in every field.
        let year: i32 = value[layout.year].parse().ok()?;
        let month: u32 = value[layout.month].parse().ok()?;
        let day: u32 = value[layout.day].parse().ok()?;
        if year < 1 {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month, day)
    }
}

fn matches_shape(value: &str, shape: &str) -> bool {
    value.len() == shape.len()
        && value
            .bytes()
            .zip(shape.bytes())
            .all(|(actual, expected)| match expected {
                b'#' => actual.is_ascii_digit(),
                sep => actual == sep,
            })
}
