use crate::prelude::{StatsError, StatsResult};

/// Buckets scalars by ascending upper bounds.
///
/// `N - 1` bounds define `N` buckets: bucket `i` takes values in
/// `[bounds[i - 1], bounds[i])`, and the last bucket takes everything at or
/// above the last bound (NaN included).
#[derive(Debug, Clone, PartialEq)]
pub struct RangeBinner {
    bounds: Vec<f64>,
}

impl RangeBinner {
    pub fn new(bounds: Vec<f64>) -> StatsResult<Self> {
        if bounds.is_empty() {
            return Err(StatsError::PreconditionViolation(
                "range bounds must not be empty".into(),
            ));
        }
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(StatsError::PreconditionViolation(
                "range bounds must be finite".into(),
            ));
        }
        if let Some(pair) = bounds.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(StatsError::PreconditionViolation(format!(
                "range bounds must be strictly ascending ({} >= {})",
                pair[0], pair[1]
            )));
        }
        Ok(Self { bounds })
    }

    pub fn bucket_count(&self) -> usize {
        self.bounds.len() + 1
    }

    pub fn bucket_index(&self, value: f64) -> usize {
        self.bounds
            .iter()
            .position(|&bound| value < bound)
            .unwrap_or(self.bounds.len())
    }

    pub fn counts<I>(&self, values: I) -> Vec<u32>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut counts = vec![0; self.bucket_count()];
        for value in values {
            counts[self.bucket_index(value)] += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_above_last_bound_clamp_into_final_bucket() {
        let binner = RangeBinner::new(vec![100.0, 300.0]).unwrap();
        assert_eq!(binner.counts([50.0, 150.0, 400.0]), vec![1, 1, 1]);
    }

    #[test]
    fn bound_itself_belongs_to_the_next_bucket() {
        let binner = RangeBinner::new(vec![100.0, 300.0]).unwrap();
        assert_eq!(binner.bucket_index(99.999), 0);
        assert_eq!(binner.bucket_index(100.0), 1);
        assert_eq!(binner.bucket_index(300.0), 2);
    }

    #[test]
    fn bucket_index_is_monotonic() {
        let binner = RangeBinner::new(vec![-5.0, 0.5, 2.0, 17.0, 400.0]).unwrap();
        let mut previous = 0;
        for step in 0..5000 {
            let value = -50.0 + step as f64 * 0.1;
            let index = binner.bucket_index(value);
            assert!(index >= previous, "index dropped at {}", value);
            previous = index;
        }
        assert_eq!(previous, binner.bucket_count() - 1);
    }

    #[test]
    fn counts_sum_to_input_length() {
        let binner = RangeBinner::new(vec![1.0, 2.0, 4.0]).unwrap();
        let values = [0.0, 0.9, 1.0, 3.9, 4.0, 12.0, f64::NAN];
        let counts = binner.counts(values);
        assert_eq!(counts.iter().sum::<u32>() as usize, values.len());
        assert_eq!(counts, vec![2, 1, 1, 3]);
    }

    #[test]
    fn rejects_invalid_bounds() {
        assert!(matches!(
            RangeBinner::new(vec![]),
            Err(StatsError::PreconditionViolation(_))
        ));
        assert!(matches!(
            RangeBinner::new(vec![3.0, 3.0]),
            Err(StatsError::PreconditionViolation(_))
        ));
        assert!(matches!(
            RangeBinner::new(vec![5.0, 1.0]),
            Err(StatsError::PreconditionViolation(_))
        ));
        assert!(RangeBinner::new(vec![1.0, f64::INFINITY]).is_err());
    }
}
