use crate::models::Coordinates;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

const BUNDLED_DATASET: &str = include_str!("../../data/geo.json");

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("failed to read geo dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse geo dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A `{code, label}` pair for a dropdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub code: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl City {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subdivision {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub cities: Vec<City>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Country {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub states: Vec<Subdivision>,
}

/// Static, in-memory country → subdivision → city reference data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoDataset {
    countries: Vec<Country>,
}

impl GeoDataset {
    /// Dataset compiled into the binary
    pub fn bundled() -> Result<Self, GeoError> {
        Self::from_json(BUNDLED_DATASET)
    }

    pub fn from_json(json: &str) -> Result<Self, GeoError> {
        let dataset: Self = serde_json::from_str(json)?;
        debug!("Loaded geo dataset with {} countries", dataset.countries.len());
        Ok(dataset)
    }

    pub fn from_path(path: &Path) -> Result<Self, GeoError> {
        let json = std::fs::read_to_string(path).map_err(|source| GeoError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn countries(&self) -> Vec<SelectOption> {
        self.countries
            .iter()
            .map(|c| SelectOption {
                code: c.code.clone(),
                label: c.name.clone(),
            })
            .collect()
    }

    /// Subdivisions of `country` in dataset order; empty for unknown codes
    pub fn subdivisions(&self, country: &str) -> Vec<SelectOption> {
        self.country(country)
            .map(|c| {
                c.states
                    .iter()
                    .map(|s| SelectOption {
                        code: s.code.clone(),
                        label: subdivision_label(&s.name).to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn cities(&self, country: &str, subdivision: &str) -> Vec<City> {
        self.subdivision(country, subdivision)
            .map(|s| s.cities.clone())
            .unwrap_or_default()
    }

    pub fn find_city(&self, country: &str, subdivision: &str, city: &str) -> Option<&City> {
        self.subdivision(country, subdivision)?
            .cities
            .iter()
            .find(|c| c.name == city)
    }

    pub fn resolve(&self, country: &str, subdivision: &str, city: &str) -> Option<Coordinates> {
        self.find_city(country, subdivision, city).map(City::coordinates)
    }

    fn country(&self, code: &str) -> Option<&Country> {
        self.countries.iter().find(|c| c.code == code)
    }

    fn subdivision(&self, country: &str, code: &str) -> Option<&Subdivision> {
        self.country(country)?.states.iter().find(|s| s.code == code)
    }
}

/// Strip a trailing " County" or " Province" from a subdivision name
fn subdivision_label(name: &str) -> &str {
    name.strip_suffix(" County")
        .or_else(|| name.strip_suffix(" Province"))
        .unwrap_or(name)
}
