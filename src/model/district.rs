//! District map
//!
//! Population weights and the base travel matrix, validated once and then
//! treated as immutable configuration.

use serde::Serialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictMap {
    populations: Vec<f64>,
    /// Base travel minutes, `base_minutes[from][to]`. May be asymmetric.
    base_minutes: Vec<Vec<f64>>,
}

impl DistrictMap {
    pub fn new(populations: Vec<f64>, base_minutes: Vec<Vec<f64>>) -> Result<Self, ConfigError> {
        let n = populations.len();
        if n == 0 {
            return Err(ConfigError::NoDistricts);
        }
        if populations.iter().any(|p| !p.is_finite() || *p < 0.0)
            || populations.iter().all(|p| *p == 0.0)
        {
            return Err(ConfigError::InvalidPopulation);
        }
        if base_minutes.len() != n {
            return Err(ConfigError::MatrixRows {
                rows: base_minutes.len(),
                districts: n,
            });
        }
        for (row, entries) in base_minutes.iter().enumerate() {
            if entries.len() != n {
                return Err(ConfigError::MatrixShape {
                    districts: n,
                    row,
                    len: entries.len(),
                });
            }
            if let Some((to, &minutes)) = entries
                .iter()
                .enumerate()
                .find(|(_, m)| !m.is_finite() || **m < 0.0)
            {
                return Err(ConfigError::InvalidTravelTime {
                    from: row,
                    to,
                    minutes,
                });
            }
        }
        Ok(Self {
            populations,
            base_minutes,
        })
    }

    pub fn len(&self) -> usize {
        self.populations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.populations.is_empty()
    }

    pub fn populations(&self) -> &[f64] {
        &self.populations
    }

    pub fn base_minutes(&self) -> &[Vec<f64>] {
        &self.base_minutes
    }
}

impl Default for DistrictMap {
    /// The ten-district reference city.
    fn default() -> Self {
        let populations = [
            10_000.0, 35_000.0, 25_000.0, 25_000.0, 15_000.0, 20_000.0, 45_000.0, 40_000.0,
            15_000.0, 35_000.0,
        ];
        let minutes: [[u8; 10]; 10] = [
            [3, 6, 5, 8, 8, 4, 6, 8, 10, 12],
            [6, 4, 5, 8, 14, 6, 4, 10, 7, 6],
            [5, 5, 3, 6, 10, 8, 8, 12, 12, 7],
            [8, 8, 6, 5, 6, 10, 13, 9, 10, 11],
            [8, 14, 10, 6, 5, 7, 9, 7, 10, 20],
            [4, 6, 8, 10, 7, 3, 5, 5, 9, 17],
            [6, 4, 8, 13, 9, 5, 3, 10, 7, 10],
            [8, 10, 12, 9, 7, 5, 10, 5, 14, 20],
            [10, 7, 12, 10, 10, 9, 7, 14, 7, 14],
            [12, 6, 7, 11, 20, 17, 10, 20, 14, 6],
        ];
        Self {
            populations: populations.to_vec(),
            base_minutes: minutes
                .iter()
                .map(|row| row.iter().map(|&m| f64::from(m)).collect())
                .collect(),
        }
    }
}
