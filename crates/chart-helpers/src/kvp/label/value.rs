use std::{fmt::Display, ops::Deref, str::FromStr};

use snafu::{Snafu, ensure};

use crate::naming::MAX_NAME_LEN;

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum LabelValueError {
    #[snafu(display("label value is {length} bytes long, at most {MAX_NAME_LEN} are allowed"))]
    TooLong { length: usize },

    /// Derived names still contain characters like `+` or `/` when the chart
    /// inputs do.
    #[snafu(display(
        "label value contains {character:?}, only ASCII alphanumerics, '-', '_' and '.' are allowed"
    ))]
    InvalidCharacter { character: char },

    #[snafu(display("label value must start and end with an ASCII alphanumeric character"))]
    InvalidBoundary,
}

/// A label value in the Kubernetes format.
///
/// Values are empty, or at most 63 bytes of ASCII alphanumerics, `-`, `_` and
/// `.` which start and end with an alphanumeric.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct LabelValue(String);

impl FromStr for LabelValue {
    type Err = LabelValueError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        ensure!(
            input.len() <= MAX_NAME_LEN,
            TooLongSnafu {
                length: input.len()
            }
        );

        if let Some(character) = input
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return InvalidCharacterSnafu { character }.fail();
        }

        let alphanumeric = |c: Option<char>| c.is_none_or(|c| c.is_ascii_alphanumeric());
        ensure!(
            alphanumeric(input.chars().next()) && alphanumeric(input.chars().next_back()),
            InvalidBoundarySnafu
        );

        Ok(Self(input.to_owned()))
    }
}

impl Deref for LabelValue {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for LabelValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
