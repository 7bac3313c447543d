//! Sample Table Module
//! Typed view over the iris measurements: species labels, feature columns and
//! the validated table itself.

use polars::prelude::*;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Name of the label column.
pub const SPECIES_COLUMN: &str = "species";

/// Species label of a record. Variant order is alphabetical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Setosa,
    Versicolor,
    Virginica,
}

impl Species {
    pub const ALL: [Species; 3] = [Species::Setosa, Species::Versicolor, Species::Virginica];

    pub fn as_str(self) -> &'static str {
        match self {
            Species::Setosa => "setosa",
            Species::Versicolor => "versicolor",
            Species::Virginica => "virginica",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Species::ALL
            .into_iter()
            .find(|species| species.as_str() == s.trim())
            .ok_or_else(|| s.to_string())
    }
}

/// One of the four numeric measurement columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Feature {
    #[serde(rename = "sepal length (cm)")]
    SepalLength,
    #[serde(rename = "sepal width (cm)")]
    SepalWidth,
    #[serde(rename = "petal length (cm)")]
    PetalLength,
    #[serde(rename = "petal width (cm)")]
    PetalWidth,
}

impl Feature {
    pub const ALL: [Feature; 4] = [
        Feature::SepalLength,
        Feature::SepalWidth,
        Feature::PetalLength,
        Feature::PetalWidth,
    ];

    /// Column name in the dataset header.
    pub fn column_name(self) -> &'static str {
        match self {
            Feature::SepalLength => "sepal length (cm)",
            Feature::SepalWidth => "sepal width (cm)",
            Feature::PetalLength => "petal length (cm)",
            Feature::PetalWidth => "petal width (cm)",
        }
    }

    /// Axis label used by the charts.
    pub fn axis_label(self) -> &'static str {
        match self {
            Feature::SepalLength => "Sepal Length (cm)",
            Feature::SepalWidth => "Sepal Width (cm)",
            Feature::PetalLength => "Petal Length (cm)",
            Feature::PetalWidth => "Petal Width (cm)",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Validated, read-only table of iris samples.
///
/// Holds both the polars frame (for display and grouped aggregation) and
/// typed copies of every column, so readers never deal with nulls.
#[derive(Debug, Clone)]
pub struct SampleTable {
    frame: DataFrame,
    features: [Vec<f64>; 4],
    species: Vec<Species>,
}

impl SampleTable {
    /// Assemble a table from columns that already satisfy the dataset
    /// invariants. Only the loader calls this.
    pub(crate) fn from_validated(
        features: [Vec<f64>; 4],
        species: Vec<Species>,
    ) -> PolarsResult<Self> {
        let mut columns: Vec<Column> = Feature::ALL
            .iter()
            .map(|feature| {
                Column::new(
                    feature.column_name().into(),
                    features[feature.index()].clone(),
                )
            })
            .collect();
        let labels: Vec<&str> = species.iter().map(|s| s.as_str()).collect();
        columns.push(Column::new(SPECIES_COLUMN.into(), labels));

        Ok(Self {
            frame: DataFrame::new(columns)?,
            features,
            species,
        })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.species.len()
    }

    /// Values of one feature in record order.
    pub fn feature(&self, feature: Feature) -> &[f64] {
        &self.features[feature.index()]
    }

    /// Labels in record order.
    pub fn species(&self) -> &[Species] {
        &self.species
    }

    /// Distinct labels in order of first appearance.
    pub fn species_in_order(&self) -> Vec<Species> {
        let mut seen = Vec::new();
        for &species in &self.species {
            if !seen.contains(&species) {
                seen.push(species);
            }
        }
        seen
    }

    /// `(record index, value)` pairs of one feature restricted to one label.
    pub fn indexed_values_for(&self, feature: Feature, species: Species) -> Vec<(usize, f64)> {
        self.feature(feature)
            .iter()
            .zip(self.species())
            .enumerate()
            .filter(|(_, (_, s))| **s == species)
            .map(|(i, (v, _))| (i, *v))
            .collect()
    }

    /// Values of one feature restricted to one label.
    pub fn values_for(&self, feature: Feature, species: Species) -> Vec<f64> {
        self.indexed_values_for(feature, species)
            .into_iter()
            .map(|(_, v)| v)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_table() -> SampleTable {
        SampleTable::from_validated(
            [
                vec![5.1, 7.0, 4.9],
                vec![3.5, 3.2, 3.0],
                vec![1.4, 4.7, 1.3],
                vec![0.2, 1.4, 0.2],
            ],
            vec![Species::Setosa, Species::Versicolor, Species::Setosa],
        )
        .unwrap()
    }

    #[test]
    fn test_species_round_trip_names() {
        for species in Species::ALL {
            assert_eq!(species.as_str().parse::<Species>(), Ok(species));
        }
        assert_eq!(" virginica ".parse::<Species>(), Ok(Species::Virginica));
        assert!("iris".parse::<Species>().is_err());
    }

    #[test]
    fn test_species_order_is_alphabetical() {
        let mut names: Vec<&str> = Species::ALL.iter().map(|s| s.as_str()).collect();
        names.sort_unstable();
        let ordered: Vec<&str> = Species::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(names, ordered);
        assert!(Species::Setosa < Species::Virginica);
    }

    #[test]
    fn test_frame_columns() {
        let table = tiny_table();
        let names: Vec<String> = table
            .frame()
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            names,
            [
                "sepal length (cm)",
                "sepal width (cm)",
                "petal length (cm)",
                "petal width (cm)",
                "species"
            ]
        );
        assert_eq!(table.frame().height(), 3);
    }

    #[test]
    fn test_filtered_accessors() {
        let table = tiny_table();
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.indexed_values_for(Feature::SepalLength, Species::Setosa),
            vec![(0, 5.1), (2, 4.9)]
        );
        assert_eq!(
            table.values_for(Feature::PetalLength, Species::Versicolor),
            vec![4.7]
        );
        assert!(table
            .values_for(Feature::PetalLength, Species::Virginica)
            .is_empty());
        assert_eq!(
            table.species_in_order(),
            vec![Species::Setosa, Species::Versicolor]
        );
    }
}
