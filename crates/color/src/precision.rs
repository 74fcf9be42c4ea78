use std::collections::BTreeMap;

/// Describes how many decimals a number should be rounded to.
///
/// A plain integer is a fixed number of decimals. A threshold table maps the
/// lower bound of a value range to the decimals used for values at or above
/// that bound; the largest matching bound wins.
pub trait Precision {
    fn decimals_for(&self, number: f64) -> Option<i32>;
}

impl Precision for i32 {
    fn decimals_for(&self, _number: f64) -> Option<i32> {
        Some(*self)
    }
}

impl Precision for BTreeMap<i64, i32> {
    #[allow(clippy::cast_precision_loss)]
    fn decimals_for(&self, number: f64) -> Option<i32> {
        self.iter()
            .rev()
            .find(|(threshold, _)| number >= **threshold as f64)
            .map(|(_, decimals)| *decimals)
    }
}

impl Precision for [(f64, i32)] {
    fn decimals_for(&self, number: f64) -> Option<i32> {
        let mut thresholds: Vec<_> = self.iter().filter(|(t, _)| !t.is_nan()).collect();
        thresholds.sort_by(|a, b| b.0.total_cmp(&a.0));
        thresholds
            .into_iter()
            .find(|(threshold, _)| number >= *threshold)
            .map(|(_, decimals)| *decimals)
    }
}

impl<P: Precision + ?Sized> Precision for &P {
    fn decimals_for(&self, number: f64) -> Option<i32> {
        (**self).decimals_for(number)
    }
}

/// Round `number` to the precision selected by `precision`.
///
/// Halves round towards positive infinity. Numbers below every threshold
/// are returned unchanged.
#[must_use]
pub fn precision_round(number: f64, precision: impl Precision) -> f64 {
    let Some(decimals) = precision.decimals_for(number) else {
        return number;
    };
    let factor = 10f64.powi(decimals);
    (number * factor + 0.5).floor() / factor
}

#[cfg(test)]
mod tests {
    use maplit::btreemap;

    use crate::precision::precision_round;

    #[test]
    fn round_fixed_decimals() {
        assert_eq!(precision_round(1.2345, 2), 1.23);
        assert_eq!(precision_round(2.5, 0), 3.0);
        assert_eq!(precision_round(-2.5, 0), -2.0);
    }

    #[test]
    fn round_with_thresholds() {
        let thresholds = btreemap! { 0 => 2, 10 => 0 };
        assert_eq!(precision_round(15.4, &thresholds), 15.0);
        assert_eq!(precision_round(15.0, &thresholds), 15.0);
        assert_eq!(precision_round(5.0, &thresholds), 5.0);
        assert_eq!(precision_round(5.678, &thresholds), 5.68);
    }

    #[test]
    fn round_below_all_thresholds() {
        let thresholds = btreemap! { 0 => 2, 10 => 0 };
        assert_eq!(precision_round(-1.2345, &thresholds), -1.2345);
    }

    #[test]
    fn round_with_fractional_thresholds() {
        let thresholds: &[(f64, i32)] = &[(0.5, 1), (f64::NAN, 5), (0.0, 3)];
        assert_eq!(precision_round(0.75, thresholds), 0.8);
        assert_eq!(precision_round(0.1234, thresholds), 0.123);
    }
}
