pub mod constants;

use crate::models::{PlanetPosition, ReadingResult};
use constants::{planet_rank, planet_symbol, zodiac_symbol, HOUSES, NORTH_NODE, SIGNS, SOUTH_NODE};
use serde::Serialize;
use std::fmt;
use tracing::warn;

/// One rendered table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartRow {
    pub planet: String,
    pub symbol: Option<&'static str>,
    pub sign: String,
    pub sign_symbol: Option<&'static str>,
    pub house: String,
    /// True for the client-derived South Node
    pub derived: bool,
}

impl ChartRow {
    fn from_position(position: PlanetPosition, derived: bool) -> Self {
        Self {
            symbol: planet_symbol(&position.planet),
            sign_symbol: zodiac_symbol(&position.sign),
            planet: position.planet,
            sign: position.sign,
            house: position.house,
            derived,
        }
    }

    /// Planet cell text, glyph first when one exists
    pub fn planet_label(&self) -> String {
        match self.symbol {
            Some(symbol) => format!("{} {}", symbol, self.planet),
            None => self.planet.clone(),
        }
    }
}

impl fmt::Display for ChartRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} — {} — {}", self.planet_label(), self.sign, self.house)
    }
}

/// Sorted chart ready for display or export
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Chart {
    pub rows: Vec<ChartRow>,
}

impl Chart {
    /// Sort the API positions into canonical order and add the South Node.
    ///
    /// Planets outside the canonical list keep their API order after all
    /// canonical ones. A South Node sent by the API is discarded in favour
    /// of the derived one.
    pub fn from_result(result: &ReadingResult) -> Self {
        let positions: Vec<PlanetPosition> = result
            .dynamic_texts
            .iter()
            .filter(|p| p.planet != SOUTH_NODE)
            .cloned()
            .collect();

        let south = positions
            .iter()
            .find(|p| p.planet == NORTH_NODE)
            .and_then(|north| {
                let derived = south_node(&north.sign, &north.house);
                if derived.is_none() {
                    warn!(
                        "North Node has unknown sign/house ({}, {}); omitting South Node",
                        north.sign, north.house
                    );
                }
                derived
            });

        let mut rows: Vec<ChartRow> = positions
            .into_iter()
            .map(|p| ChartRow::from_position(p, false))
            .collect();
        if let Some(south) = south {
            rows.push(ChartRow::from_position(south, true));
        }

        sort_canonical(&mut rows);
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, planet: &str) -> Option<&ChartRow> {
        self.rows.iter().find(|r| r.planet == planet)
    }
}

impl fmt::Display for Chart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

/// Stable sort by canonical rank, unknown planets last.
fn sort_canonical(rows: &mut [ChartRow]) {
    rows.sort_by_key(|r| planet_rank(&r.planet).unwrap_or(usize::MAX));
}

/// Opposition point of the North Node: six steps round both 12-circles.
/// `None` if either input is not one of the canonical names.
pub fn south_node(north_sign: &str, north_house: &str) -> Option<PlanetPosition> {
    let sign = SIGNS.iter().position(|s| *s == north_sign)?;
    let house = HOUSES.iter().position(|h| *h == north_house)?;
    Some(PlanetPosition::new(
        SOUTH_NODE,
        SIGNS[(sign + 6) % 12],
        HOUSES[(house + 6) % 12],
    ))
}
