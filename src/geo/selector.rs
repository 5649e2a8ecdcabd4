use crate::geo::dataset::{City, GeoDataset, SelectOption};
use crate::models::Coordinates;
use tracing::debug;

/// Cascading country → subdivision → city selection over a [`GeoDataset`].
///
/// Changing a parent selection clears every dependent selection and option
/// list. Coordinates are recomputed on each city change and are `None`
/// whenever the triple is incomplete or unknown.
#[derive(Debug, Clone)]
pub struct GeoSelector<'a> {
    dataset: &'a GeoDataset,
    country: String,
    county: String,
    city: String,
    county_options: Vec<SelectOption>,
    city_options: Vec<City>,
    coordinates: Option<Coordinates>,
}

impl<'a> GeoSelector<'a> {
    pub fn new(dataset: &'a GeoDataset) -> Self {
        Self {
            dataset,
            country: String::new(),
            county: String::new(),
            city: String::new(),
            county_options: Vec::new(),
            city_options: Vec::new(),
            coordinates: None,
        }
    }

    pub fn country_options(&self) -> Vec<SelectOption> {
        self.dataset.countries()
    }

    pub fn select_country(&mut self, code: &str) {
        debug!("Country selected: {}", code);
        self.country = code.to_string();
        self.county.clear();
        self.city.clear();
        self.city_options.clear();
        self.coordinates = None;
        self.county_options = if code.is_empty() {
            Vec::new()
        } else {
            self.dataset.subdivisions(code)
        };
    }

    pub fn select_county(&mut self, code: &str) {
        debug!("County selected: {}", code);
        self.county = code.to_string();
        self.city.clear();
        self.coordinates = None;
        self.city_options = if code.is_empty() {
            Vec::new()
        } else {
            self.dataset.cities(&self.country, code)
        };
    }

    pub fn select_city(&mut self, name: &str) {
        self.city = name.to_string();
        self.coordinates = self
            .city_options
            .iter()
            .find(|c| c.name == name)
            .map(City::coordinates);
        debug!("City selected: {} -> {:?}", name, self.coordinates);
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn county(&self) -> &str {
        &self.county
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn county_options(&self) -> &[SelectOption] {
        &self.county_options
    }

    pub fn city_options(&self) -> &[City] {
        &self.city_options
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }
}
