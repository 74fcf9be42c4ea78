use std::fmt::Display;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeArgument {
    OriginalStart,
    OriginalEnd,
    NewStart,
    NewEnd,
    Value,
}

impl Display for RangeArgument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::OriginalStart => "original range start",
            Self::OriginalEnd => "original range end",
            Self::NewStart => "new range start",
            Self::NewEnd => "new range end",
            Self::Value => "value",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    #[error("Expected {0} to be a number")]
    NotANumber(RangeArgument),

    #[error("Cannot map a value from an empty range")]
    EmptyRange,
}

pub type RangeResult<T> = Result<T, RangeError>;

/// Map `value` from the range `original_start..=original_end` onto
/// `new_start..=new_end`.
///
/// The input is clamped to the original range before mapping, so the result
/// never leaves the new range.
#[allow(clippy::suboptimal_flops)]
pub fn map_value_range(
    original_start: f64,
    original_end: f64,
    new_start: f64,
    new_end: f64,
    value: f64,
) -> RangeResult<f64> {
    let args = [
        (original_start, RangeArgument::OriginalStart),
        (original_end, RangeArgument::OriginalEnd),
        (new_start, RangeArgument::NewStart),
        (new_end, RangeArgument::NewEnd),
        (value, RangeArgument::Value),
    ];

    if let Some((_, arg)) = args.iter().find(|(num, _)| !num.is_finite()) {
        return Err(RangeError::NotANumber(*arg));
    }

    #[allow(clippy::float_cmp)]
    if original_start == original_end {
        return Err(RangeError::EmptyRange);
    }

    let clamped = value.max(original_start).min(original_end);

    Ok(new_start
        + ((new_end - new_start) / (original_end - original_start)) * (clamped - original_start))
}

#[cfg(test)]
mod tests {
    use crate::range::{RangeArgument, RangeError, map_value_range};
    use crate::{compare, compare_float};

    #[test]
    fn map_midpoint() {
        assert_eq!(map_value_range(0.0, 100.0, 0.0, 1.0, 50.0), Ok(0.5));
    }

    #[test]
    fn map_clamps_above() {
        assert_eq!(map_value_range(0.0, 100.0, 0.0, 1.0, 150.0), Ok(1.0));
    }

    #[test]
    fn map_clamps_below() {
        assert_eq!(map_value_range(0.0, 100.0, 0.0, 1.0, -10.0), Ok(0.0));
    }

    #[test]
    fn map_to_device_range() {
        compare!(map_value_range(0.0, 1.0, 0.0, 254.0, 0.5).unwrap(), 127.0);
        compare!(map_value_range(0.0, 1.0, 153.0, 500.0, 1.0).unwrap(), 500.0);
        compare!(map_value_range(153.0, 500.0, 0.0, 1.0, 153.0).unwrap(), 0.0);
    }

    #[test]
    fn map_reports_bad_argument() {
        assert_eq!(
            map_value_range(f64::NAN, 100.0, 0.0, 1.0, 1.0),
            Err(RangeError::NotANumber(RangeArgument::OriginalStart))
        );
        assert_eq!(
            map_value_range(0.0, 100.0, 0.0, f64::INFINITY, 1.0),
            Err(RangeError::NotANumber(RangeArgument::NewEnd))
        );
        assert_eq!(
            map_value_range(0.0, 100.0, 0.0, 1.0, f64::NAN),
            Err(RangeError::NotANumber(RangeArgument::Value))
        );
    }

    #[test]
    fn map_empty_range() {
        assert_eq!(
            map_value_range(1.0, 1.0, 0.0, 1.0, 1.0),
            Err(RangeError::EmptyRange)
        );
    }

    #[test]
    fn argument_names() {
        assert_eq!(
            RangeError::NotANumber(RangeArgument::NewStart).to_string(),
            "Expected new range start to be a number"
        );
    }
}
