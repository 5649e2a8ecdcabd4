//! Fixed astrological reference tables.

pub const NORTH_NODE: &str = "Nodul Nord";
pub const SOUTH_NODE: &str = "Nodul Sud";

/// Display order for chart rows
pub const PLANET_ORDER: [&str; 15] = [
    "Sun",
    "Moon",
    "Mercury",
    "Venus",
    "Mars",
    "Jupiter",
    "Saturn",
    "Uranus",
    "Neptune",
    "Pluto",
    "Ascendant",
    "Lilith",
    "Chiron",
    NORTH_NODE,
    SOUTH_NODE,
];

pub const SIGNS: [&str; 12] = [
    "Aries",
    "Taurus",
    "Gemini",
    "Cancer",
    "Leo",
    "Virgo",
    "Libra",
    "Scorpio",
    "Sagittarius",
    "Capricorn",
    "Aquarius",
    "Pisces",
];

pub const HOUSES: [&str; 12] = [
    "House 1", "House 2", "House 3", "House 4", "House 5", "House 6", "House 7", "House 8",
    "House 9", "House 10", "House 11", "House 12",
];

pub fn planet_symbol(planet: &str) -> Option<&'static str> {
    let symbol = match planet {
        "Sun" => "☉",
        "Moon" => "☽",
        "Mercury" => "☿",
        "Venus" => "♀",
        "Mars" => "♂",
        "Jupiter" => "♃",
        "Saturn" => "♄",
        "Uranus" => "♅",
        "Neptune" => "♆",
        "Pluto" => "♇",
        "Ascendant" => "↑",
        "Lilith" => "⚸",
        "Chiron" => "⚷",
        NORTH_NODE => "☊",
        SOUTH_NODE => "☋",
        _ => return None,
    };
    Some(symbol)
}

pub fn zodiac_symbol(sign: &str) -> Option<&'static str> {
    let symbol = match sign {
        "Aries" => "♈",
        "Taurus" => "♉",
        "Gemini" => "♊",
        "Cancer" => "♋",
        "Leo" => "♌",
        "Virgo" => "♍",
        "Libra" => "♎",
        "Scorpio" => "♏",
        "Sagittarius" => "♐",
        "Capricorn" => "♑",
        "Aquarius" => "♒",
        "Pisces" => "♓",
        _ => return None,
    };
    Some(symbol)
}

pub fn planet_rank(planet: &str) -> Option<usize> {
    PLANET_ORDER.iter().position(|p| *p == planet)
}
