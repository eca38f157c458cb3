//! # The trial result table
//!
//! Immutable collection of scored [`Trial`]s – the sufficient statistic for
//! the asymptote estimator. Row order carries no meaning, which is what
//! lets the orchestrator collect trials from parallel workers without
//! coordination.

use camino::Utf8Path;
use itertools::Itertools;

use crate::reprange_errors::RepRangeError;
use crate::resampling::trial::Trial;

/// All trials of one orchestration run.
#[derive(Debug, Clone, Default)]
pub struct TrialTable {
    trials: Vec<Trial>,
}

impl TrialTable {
    pub fn from_trials(trials: Vec<Trial>) -> Self {
        TrialTable { trials }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.trials.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trial> {
        self.trials.iter()
    }

    /// Largest sample size present in the table.
    pub fn max_sample_size(&self) -> Option<usize> {
        self.trials.iter().map(|t| t.sample_size).max()
    }

    /// Mean inclusion across the iterations of one sample size, or `None`
    /// when the size is absent.
    pub fn mean_inclusion_for(&self, sample_size: usize) -> Option<f64> {
        let mut sum = 0.0;
        let mut count = 0usize;
        for t in &self.trials {
            if t.sample_size == sample_size {
                sum += t.inclusion;
                count += 1;
            }
        }
        (count > 0).then(|| sum / count as f64)
    }

    /// `(sample_size, mean inclusion)` for every size present, ascending.
    pub fn mean_by_size(&self) -> Vec<(usize, f64)> {
        self.sizes()
            .into_iter()
            .map(|n| (n, self.mean_inclusion_for(n).unwrap()))
            .collect()
    }

    /// `(sample_size, standard deviation of inclusion)` for every size
    /// present, ascending. Population standard deviation; a size with one
    /// iteration has zero spread.
    pub fn std_by_size(&self) -> Vec<(usize, f64)> {
        self.sizes()
            .into_iter()
            .map(|n| {
                let scores: Vec<f64> = self
                    .trials
                    .iter()
                    .filter(|t| t.sample_size == n)
                    .map(|t| t.inclusion)
                    .collect();
                let mean = scores.iter().sum::<f64>() / scores.len() as f64;
                let var =
                    scores.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>() / scores.len() as f64;
                (n, var.sqrt())
            })
            .collect()
    }

    fn sizes(&self) -> Vec<usize> {
        self.trials
            .iter()
            .map(|t| t.sample_size)
            .sorted_unstable()
            .dedup()
            .collect()
    }

    /// Serialize the raw table to a delimited file, one row per trial with
    /// a `sample_size,iteration,inclusion` header.
    ///
    /// This is the optional persistence side channel: writing (or failing
    /// to write) the file has no effect on the numeric outcome of a run.
    pub fn write_csv(&self, path: &Utf8Path) -> Result<(), RepRangeError> {
        let mut writer = csv::Writer::from_path(path.as_std_path())?;
        for trial in &self.trials {
            writer.serialize(trial)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod table_tests {
    use super::*;

    fn table() -> TrialTable {
        TrialTable::from_trials(vec![
            Trial { sample_size: 1, iteration: 1, inclusion: 0.2 },
            Trial { sample_size: 1, iteration: 2, inclusion: 0.4 },
            Trial { sample_size: 2, iteration: 1, inclusion: 0.5 },
            Trial { sample_size: 2, iteration: 2, inclusion: 0.7 },
        ])
    }

    #[test]
    fn test_mean_by_size() {
        let means = table().mean_by_size();
        assert_eq!(means.len(), 2);
        assert_eq!(means[0].0, 1);
        assert!((means[0].1 - 0.3).abs() < 1e-12);
        assert!((means[1].1 - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_std_by_size() {
        let stds = table().std_by_size();
        assert!((stds[0].1 - 0.1).abs() < 1e-12);
        assert!((stds[1].1 - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_max_sample_size_and_missing_size() {
        let t = table();
        assert_eq!(t.max_sample_size(), Some(2));
        assert_eq!(t.mean_inclusion_for(9), None);
        assert_eq!(TrialTable::default().max_sample_size(), None);
    }
}
