pub struct StatsHelper;

impl StatsHelper {
    /// Arithmetic mean; an empty sequence averages to zero.
    pub fn mean<I>(values: I) -> f64
    where
        I: IntoIterator<Item = f64>,
    {
        let (sum, count) = values
            .into_iter()
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
        if count == 0 {
            return 0.0;
        }
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_sequence_is_zero() {
        assert_eq!(StatsHelper::mean(std::iter::empty()), 0.0);
    }

    #[test]
    fn mean_of_values() {
        assert_eq!(StatsHelper::mean([2.0, 4.0, 9.0]), 5.0);
    }
}
