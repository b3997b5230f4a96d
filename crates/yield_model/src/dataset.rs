//! CSV dataset loading
//!
//! Reads historical yield observations. Columns are matched by header name,
//! so column order does not matter and extra columns are ignored.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

use crate::errors::DatasetError;

/// Predictor columns, in the order the model consumes them.
pub const FEATURE_COLUMNS: [&str; 3] = ["Rainfall_mm", "Temperature_C", "Soil_Nitrogen_mgkg"];

/// Target column.
pub const TARGET_COLUMN: &str = "Yield_tons_ha";

/// Number of model inputs.
pub const FEATURE_COUNT: usize = FEATURE_COLUMNS.len();

/// One historical yield record.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(rename(deserialize = "Rainfall_mm"))]
    pub rainfall_mm: f64,
    #[serde(rename(deserialize = "Temperature_C"))]
    pub temperature_c: f64,
    #[serde(rename(deserialize = "Soil_Nitrogen_mgkg"))]
    pub soil_nitrogen_mgkg: f64,
    #[serde(rename(deserialize = "Yield_tons_ha"))]
    pub yield_tons_ha: f64,
}

impl Observation {
    pub fn features(&self) -> [f64; FEATURE_COUNT] {
        [self.rainfall_mm, self.temperature_c, self.soil_nitrogen_mgkg]
    }

    fn first_non_finite(&self) -> Option<&'static str> {
        let values = [
            (FEATURE_COLUMNS[0], self.rainfall_mm),
            (FEATURE_COLUMNS[1], self.temperature_c),
            (FEATURE_COLUMNS[2], self.soil_nitrogen_mgkg),
            (TARGET_COLUMN, self.yield_tons_ha),
        ];
        values
            .iter()
            .find(|(_, value)| !value.is_finite())
            .map(|(column, _)| *column)
    }
}

/// Immutable training set.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    observations: Vec<Observation>,
}

impl Dataset {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    /// Load dataset from a CSV file with a header row.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let reader = Self::builder()
            .from_path(path)
            .map_err(|source| DatasetError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        Self::load(reader)
    }

    /// Load dataset from any reader yielding CSV text.
    pub fn from_reader<R: io::Read>(rdr: R) -> Result<Self, DatasetError> {
        Self::load(Self::builder().from_reader(rdr))
    }

    fn builder() -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder.trim(csv::Trim::All);
        builder
    }

    fn load<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Self, DatasetError> {
        let headers = reader.headers().map_err(DatasetError::Header)?.clone();
        for column in FEATURE_COLUMNS.iter().chain(std::iter::once(&TARGET_COLUMN)) {
            if !headers.iter().any(|h| h == *column) {
                return Err(DatasetError::MissingColumn(*column));
            }
        }

        let mut observations = Vec::new();
        for (idx, record) in reader.deserialize::<Observation>().enumerate() {
            let row = idx + 1;
            let observation = record.map_err(|source| DatasetError::Record { row, source })?;
            if let Some(column) = observation.first_non_finite() {
                return Err(DatasetError::NonFinite { row, column });
            }
            observations.push(observation);
        }

        Ok(Self { observations })
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Feature rows in `FEATURE_COLUMNS` order.
    pub fn features(&self) -> Vec<[f64; FEATURE_COUNT]> {
        self.observations.iter().map(Observation::features).collect()
    }

    pub fn targets(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.yield_tons_ha).collect()
    }

    /// Get number of samples
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Check if dataset is empty
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Per-feature (min, max), used for startup logging.
    pub fn feature_stats(&self) -> [(f64, f64); FEATURE_COUNT] {
        let mut stats = [(f64::INFINITY, f64::NEG_INFINITY); FEATURE_COUNT];

        for row in self.observations.iter().map(Observation::features) {
            for (i, &val) in row.iter().enumerate() {
                stats[i].0 = stats[i].0.min(val);
                stats[i].1 = stats[i].1.max(val);
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
Rainfall_mm,Temperature_C,Soil_Nitrogen_mgkg,Yield_tons_ha
400,22.5,25,3.1
650,24.0,31,4.2
820,26.3,36,4.6
";

    fn create_test_csv(content: &str) -> anyhow::Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        write!(file, "{content}")?;
        file.flush()?;
        Ok(file)
    }

    #[test]
    fn test_load_csv() -> anyhow::Result<()> {
        let file = create_test_csv(SAMPLE)?;
        let dataset = Dataset::from_csv(file.path())?;

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.features()[0], [400.0, 22.5, 25.0]);
        assert_eq!(dataset.targets()[1], 4.2);

        Ok(())
    }

    #[test]
    fn test_columns_matched_by_name() -> anyhow::Result<()> {
        let content = "\
Region,Yield_tons_ha,Soil_Nitrogen_mgkg,Temperature_C,Rainfall_mm
north,3.9,28,23.1,510
";
        let dataset = Dataset::from_reader(content.as_bytes())?;

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.features()[0], [510.0, 23.1, 28.0]);
        assert_eq!(dataset.targets()[0], 3.9);

        Ok(())
    }

    #[test]
    fn test_hash_prefixed_rows_are_data() -> anyhow::Result<()> {
        let content = "\
Plot,Rainfall_mm,Temperature_C,Soil_Nitrogen_mgkg,Yield_tons_ha
#12,500,24.0,30,3.5
#13,610,25.2,33,4.1
";
        let dataset = Dataset::from_reader(content.as_bytes())?;

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.features()[1], [610.0, 25.2, 33.0]);

        Ok(())
    }

    #[test]
    fn test_missing_column_rejected() {
        let content = "Rainfall_mm,Temperature_C,Yield_tons_ha\n500,24.0,3.5\n";
        let err = Dataset::from_reader(content.as_bytes()).unwrap_err();

        assert!(matches!(
            err,
            DatasetError::MissingColumn("Soil_Nitrogen_mgkg")
        ));
    }

    #[test]
    fn test_malformed_value_reports_row() {
        let content = "\
Rainfall_mm,Temperature_C,Soil_Nitrogen_mgkg,Yield_tons_ha
500,24.0,30,3.5
500,warm,30,3.5
";
        let err = Dataset::from_reader(content.as_bytes()).unwrap_err();

        assert!(matches!(err, DatasetError::Record { row: 2, .. }));
    }

    #[test]
    fn test_non_finite_rejected() {
        let content = "\
Rainfall_mm,Temperature_C,Soil_Nitrogen_mgkg,Yield_tons_ha
500,24.0,30,NaN
";
        let err = Dataset::from_reader(content.as_bytes()).unwrap_err();

        assert!(matches!(
            err,
            DatasetError::NonFinite {
                row: 1,
                column: "Yield_tons_ha"
            }
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = Dataset::from_csv("/nonexistent/wheat_yield_data.csv").unwrap_err();
        assert!(matches!(err, DatasetError::Open { .. }));
    }

    #[test]
    fn test_feature_stats() -> anyhow::Result<()> {
        let dataset = Dataset::from_reader(SAMPLE.as_bytes())?;

        let stats = dataset.feature_stats();
        assert_eq!(stats[0], (400.0, 820.0));
        assert_eq!(stats[1], (22.5, 26.3));
        assert_eq!(stats[2], (25.0, 36.0));

        Ok(())
    }
}
