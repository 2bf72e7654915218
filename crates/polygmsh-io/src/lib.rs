pub mod geo;
pub mod parse;

pub use geo::{DEFAULT_SCRIPT_NAME, GeoDisplay, export_geo, to_geo_string, write_geo};
pub use parse::{GeoParseError, GeoScript, parse_geo};
