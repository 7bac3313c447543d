//! Statistics Calculator Module
//! Handles descriptive statistics, per-species means and Pearson correlation.

use crate::data::{Feature, SampleTable, Species};
use polars::prelude::*;
use serde::Serialize;
use statrs::statistics::Statistics;

/// Descriptive statistics for a single feature.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureSummary {
    pub feature: Feature,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Mean of every feature for one species.
#[derive(Debug, Clone, Serialize)]
pub struct GroupMeans {
    pub species: Species,
    pub means: [f64; 4],
}

impl GroupMeans {
    pub fn mean(&self, feature: Feature) -> f64 {
        self.means[feature.index()]
    }
}

/// Symmetric Pearson correlation matrix over `Feature::ALL`.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub features: [Feature; 4],
    pub values: [[f64; 4]; 4],
}

impl CorrelationMatrix {
    pub fn get(&self, a: Feature, b: Feature) -> f64 {
        self.values[a.index()][b.index()]
    }
}

/// Handles statistical calculations over a sample table.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute count, mean, sample std, min, quartiles and max.
    pub fn compute_descriptive_stats(feature: Feature, values: &[f64]) -> FeatureSummary {
        let n = values.len();
        if n == 0 {
            return FeatureSummary {
                feature,
                count: 0,
                mean: f64::NAN,
                std: f64::NAN,
                min: f64::NAN,
                q25: f64::NAN,
                median: f64::NAN,
                q75: f64::NAN,
                max: f64::NAN,
            };
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        // statrs uses the N-1 denominator; a single sample has no spread.
        let std = if n > 1 { values.std_dev() } else { f64::NAN };

        FeatureSummary {
            feature,
            count: n,
            mean: values.mean(),
            std,
            min: sorted[0],
            q25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            q75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Pearson correlation coefficient from sample covariance.
    ///
    /// Returns NaN when the inputs differ in length, have fewer than two
    /// values, or either side has zero variance.
    pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
        if x.len() != y.len() || x.len() < 2 {
            return f64::NAN;
        }
        let sx = x.std_dev();
        let sy = y.std_dev();
        if sx == 0.0 || sy == 0.0 {
            return f64::NAN;
        }
        (x.covariance(y) / (sx * sy)).clamp(-1.0, 1.0)
    }

    /// Descriptive statistics for every feature, over all records.
    pub fn describe(table: &SampleTable) -> Vec<FeatureSummary> {
        Feature::ALL
            .iter()
            .map(|&feature| Self::compute_descriptive_stats(feature, table.feature(feature)))
            .collect()
    }

    /// Mean of every feature grouped by species, sorted alphabetically.
    pub fn grouped_means(table: &SampleTable) -> PolarsResult<Vec<GroupMeans>> {
        let aggs: Vec<Expr> = Feature::ALL
            .iter()
            .map(|feature| col(feature.column_name()).mean())
            .collect();

        let grouped = table
            .frame()
            .clone()
            .lazy()
            .group_by([col("species")])
            .agg(aggs)
            .sort(["species"], SortMultipleOptions::default())
            .collect()?;

        Self::means_from_grouped(&grouped)
    }

    /// One `GroupMeans` per row of an aggregated frame.
    fn means_from_grouped(grouped: &DataFrame) -> PolarsResult<Vec<GroupMeans>> {
        let labels = grouped.column("species")?.str()?;
        let mut rows = Vec::with_capacity(grouped.height());
        for (i, label) in labels.into_iter().enumerate() {
            let species = label
                .and_then(|l| l.parse::<Species>().ok())
                .ok_or_else(|| {
                    PolarsError::ComputeError(
                        format!("unexpected species label {label:?} in group {i}").into(),
                    )
                })?;
            let mut means = [f64::NAN; 4];
            for feature in Feature::ALL {
                means[feature.index()] = grouped
                    .column(feature.column_name())?
                    .f64()?
                    .get(i)
                    .unwrap_or(f64::NAN);
            }
            rows.push(GroupMeans { species, means });
        }
        Ok(rows)
    }

    /// Pairwise Pearson correlation between all features.
    pub fn correlation_matrix(table: &SampleTable) -> CorrelationMatrix {
        let mut values = [[f64::NAN; 4]; 4];
        for (i, &a) in Feature::ALL.iter().enumerate() {
            values[i][i] = 1.0;
            for (j, &b) in Feature::ALL.iter().enumerate().skip(i + 1) {
                let r = Self::pearson(table.feature(a), table.feature(b));
                values[i][j] = r;
                values[j][i] = r;
            }
        }
        CorrelationMatrix {
            features: Feature::ALL,
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DatasetSource;

    const EPS: f64 = 1e-6;

    fn iris() -> SampleTable {
        SampleTable::load(&DatasetSource::Bundled).unwrap()
    }

    #[test]
    fn test_percentile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(StatsCalculator::percentile(&sorted, 0.0), 1.0);
        assert_eq!(StatsCalculator::percentile(&sorted, 100.0), 4.0);
        assert!((StatsCalculator::percentile(&sorted, 25.0) - 1.75).abs() < EPS);
        assert!((StatsCalculator::percentile(&sorted, 50.0) - 2.5).abs() < EPS);
        assert!(StatsCalculator::percentile(&[], 50.0).is_nan());
    }

    #[test]
    fn test_descriptive_stats_small_sample() {
        let s = StatsCalculator::compute_descriptive_stats(
            Feature::SepalLength,
            &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0],
        );
        assert_eq!(s.count, 8);
        assert!((s.mean - 5.0).abs() < EPS);
        // sample variance = 32 / 7
        assert!((s.std - (32.0f64 / 7.0).sqrt()).abs() < EPS);
        assert_eq!(s.min, 2.0);
        assert_eq!(s.max, 9.0);
        assert!((s.median - 4.5).abs() < EPS);
    }

    #[test]
    fn test_descriptive_stats_empty() {
        let s = StatsCalculator::compute_descriptive_stats(Feature::PetalWidth, &[]);
        assert_eq!(s.count, 0);
        assert!(s.mean.is_nan());
        assert!(s.max.is_nan());
    }

    #[test]
    fn test_describe_iris() {
        let summary = StatsCalculator::describe(&iris());
        assert_eq!(summary.len(), 4);

        let sepal_length = &summary[0];
        assert_eq!(sepal_length.feature, Feature::SepalLength);
        assert_eq!(sepal_length.count, 150);
        assert!((sepal_length.mean - 5.843333).abs() < 1e-5);
        assert!((sepal_length.std - 0.828066).abs() < 1e-5);
        assert_eq!(sepal_length.min, 4.3);
        assert!((sepal_length.q25 - 5.1).abs() < EPS);
        assert!((sepal_length.median - 5.8).abs() < EPS);
        assert!((sepal_length.q75 - 6.4).abs() < EPS);
        assert_eq!(sepal_length.max, 7.9);

        let petal_length = &summary[2];
        assert!((petal_length.mean - 3.758).abs() < EPS);
        assert!((petal_length.std - 1.765298).abs() < 1e-5);
        assert!((petal_length.median - 4.35).abs() < EPS);
    }

    #[test]
    fn test_unknown_group_label_is_an_error() {
        let grouped = polars::df!(
            "species" => ["setosa", "rosa"],
            "sepal length (cm)" => [5.0, 6.0],
            "sepal width (cm)" => [3.4, 2.9],
            "petal length (cm)" => [1.5, 4.5],
            "petal width (cm)" => [0.2, 1.4],
        )
        .unwrap();
        let err = StatsCalculator::means_from_grouped(&grouped).unwrap_err();
        assert!(err.to_string().contains("rosa"), "{err}");
    }

    #[test]
    fn test_grouped_means_one_row_per_species() {
        let table = iris();
        let rows = StatsCalculator::grouped_means(&table).unwrap();
        let order: Vec<Species> = rows.iter().map(|r| r.species).collect();
        assert_eq!(order, Species::ALL.to_vec());

        for row in &rows {
            for feature in Feature::ALL {
                let values = table.values_for(feature, row.species);
                let expected = values.iter().sum::<f64>() / values.len() as f64;
                assert!(
                    (row.mean(feature) - expected).abs() < 1e-9,
                    "{} {:?}: {} != {expected}",
                    row.species,
                    feature,
                    row.mean(feature),
                );
            }
        }
        assert!((rows[0].mean(Feature::PetalLength) - 1.462).abs() < EPS);
        assert!((rows[1].mean(Feature::SepalWidth) - 2.770).abs() < EPS);
        assert!((rows[2].mean(Feature::PetalWidth) - 2.026).abs() < EPS);
    }

    #[test]
    fn test_pearson_extremes() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let up = [2.0, 4.0, 6.0, 8.0];
        let down = [8.0, 6.0, 4.0, 2.0];
        assert!((StatsCalculator::pearson(&x, &up) - 1.0).abs() < EPS);
        assert!((StatsCalculator::pearson(&x, &down) + 1.0).abs() < EPS);
        assert!(StatsCalculator::pearson(&x, &[3.0; 4]).is_nan());
        assert!(StatsCalculator::pearson(&x, &up[..3]).is_nan());
    }

    #[test]
    fn test_correlation_matrix_properties() {
        let matrix = StatsCalculator::correlation_matrix(&iris());
        for i in 0..4 {
            assert!((matrix.values[i][i] - 1.0).abs() < 1e-12);
            for j in 0..4 {
                let r = matrix.values[i][j];
                assert!((-1.0..=1.0).contains(&r), "r[{i}][{j}] = {r}");
                assert_eq!(r, matrix.values[j][i]);
            }
        }
        let r = |a, b| matrix.get(a, b);
        assert!((r(Feature::SepalLength, Feature::SepalWidth) + 0.117570).abs() < 1e-5);
        assert!((r(Feature::SepalLength, Feature::PetalLength) - 0.871754).abs() < 1e-5);
        assert!((r(Feature::PetalLength, Feature::PetalWidth) - 0.962865).abs() < 1e-5);
        assert!((r(Feature::SepalWidth, Feature::PetalLength) + 0.428440).abs() < 1e-5);
    }
}
