//! Cost samples and their NaN-tolerant median.

use std::fmt;

use serde::{Serialize, Serializer};

/// Outcome of evaluating one method for one error split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CostSample {
    /// A finite gate count.
    Finite(f64),
    /// No meaningful value for this split.
    Undefined,
}

impl CostSample {
    /// Wrap a raw value; NaN and ±∞ become [`CostSample::Undefined`].
    pub fn from_value(value: f64) -> Self {
        if value.is_finite() {
            CostSample::Finite(value)
        } else {
            CostSample::Undefined
        }
    }

    /// The finite value, if any.
    pub fn value(self) -> Option<f64> {
        match self {
            CostSample::Finite(v) => Some(v),
            CostSample::Undefined => None,
        }
    }
}

/// Representative cost of one (molecule, method) cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aggregate {
    /// Median of the finite samples.
    Median(f64),
    /// No finite sample.
    Undefined,
}

impl Aggregate {
    /// The median, if defined.
    pub fn value(self) -> Option<f64> {
        match self {
            Aggregate::Median(v) => Some(v),
            Aggregate::Undefined => None,
        }
    }
}

/// `2.91e+10` style: two decimals, signed exponent of at least two digits.
pub fn format_scientific(value: f64) -> String {
    let raw = format!("{value:.2e}");
    match raw.split_once('e') {
        Some((mantissa, exp)) => match exp.parse::<i32>() {
            Ok(exp) => {
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{mantissa}e{sign}{:02}", exp.abs())
            }
            Err(_) => raw,
        },
        None => raw,
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregate::Median(v) => f.write_str(&format_scientific(*v)),
            Aggregate::Undefined => f.write_str("nan"),
        }
    }
}

impl Serialize for Aggregate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Aggregate::Median(v) => serializer.serialize_f64(*v),
            Aggregate::Undefined => serializer.serialize_none(),
        }
    }
}

/// Median of the finite samples; the mean of the middle pair for even counts.
pub fn aggregate(samples: &[CostSample]) -> Aggregate {
    let mut finite: Vec<f64> = samples.iter().filter_map(|s| s.value()).collect();
    if finite.is_empty() {
        return Aggregate::Undefined;
    }
    finite.sort_by(f64::total_cmp);
    let mid = finite.len() / 2;
    let median = if finite.len() % 2 == 0 {
        0.5 * (finite[mid - 1] + finite[mid])
    } else {
        finite[mid]
    };
    Aggregate::Median(median)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(values: &[f64]) -> Vec<CostSample> {
        values.iter().copied().map(CostSample::from_value).collect()
    }

    #[test]
    fn test_median_skips_non_finite() {
        let agg = aggregate(&samples(&[1.0, 2.0, f64::NAN, f64::INFINITY]));
        assert_eq!(agg, Aggregate::Median(1.5));
    }

    #[test]
    fn test_all_non_finite_is_undefined() {
        assert_eq!(aggregate(&samples(&[f64::NAN, f64::INFINITY])), Aggregate::Undefined);
        assert_eq!(aggregate(&[]), Aggregate::Undefined);
    }

    #[test]
    fn test_odd_count_median() {
        assert_eq!(aggregate(&samples(&[5.0, 1.0, 3.0])), Aggregate::Median(3.0));
    }

    #[test]
    fn test_format() {
        assert_eq!(Aggregate::Median(2.9071e10).to_string(), "2.91e+10");
        assert_eq!(Aggregate::Median(0.00123).to_string(), "1.23e-03");
        assert_eq!(Aggregate::Median(5.0).to_string(), "5.00e+00");
        assert_eq!(Aggregate::Undefined.to_string(), "nan");
    }

    proptest::proptest! {
        #[test]
        fn prop_median_bounded_and_order_free(
            values in proptest::collection::vec(1.0f64..1e12, 1..40),
            undefined in 0usize..5,
        ) {
            let mut mixed = samples(&values);
            mixed.extend(std::iter::repeat_n(CostSample::Undefined, undefined));
            let forward = aggregate(&mixed);
            mixed.reverse();
            proptest::prop_assert_eq!(forward, aggregate(&mixed));

            let median = forward.value().unwrap();
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(0.0, f64::max);
            proptest::prop_assert!(min <= median && median <= max);
        }
    }

    #[test]
    fn test_non_finite_value_is_undefined() {
        assert_eq!(CostSample::from_value(f64::NEG_INFINITY), CostSample::Undefined);
        assert_eq!(CostSample::from_value(f64::NAN), CostSample::Undefined);
        assert_eq!(CostSample::from_value(4.0), CostSample::Finite(4.0));
    }
}
