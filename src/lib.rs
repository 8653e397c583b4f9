//! # skyfile
//!
//! Reading, editing and writing the indented data files that describe a
//! space game's star map, plus a procedural star-system generator.
//!
//! ## What is in a data file?
//!
//! Each line is a list of whitespace-separated tokens; indentation makes a
//! line the child of the line above. Systems, planets, and everything else
//! in the map are trees of such lines. See [`format`] for the details.
//!
//! ## Key Features
//!
//! - **Lossless**: nodes the editor does not understand are carried through
//!   load and save unchanged
//! - **Round-trip stable**: saving a file you just loaded reproduces it
//!   (comments are gathered at the top)
//! - **Layout-aware generator**: stars, planets and moons are placed with
//!   minimum gaps, and edits shift neighbours to keep them
//! - **Reproducible**: every random operation takes the caller's RNG
//!
//! ## Quick Start
//!
//! ```rust
//! use skyfile::{from_str, to_string};
//!
//! let text = "system Sol\n\tpos 0 0\n\tlink \"Alpha Centauri\"\n";
//! let mut map = from_str(text);
//! map.system_mut("Sol").unwrap().set_government("Republic");
//!
//! assert_eq!(
//!     to_string(&map),
//!     "system Sol\n\tpos 0 0\n\tgovernment Republic\n\tlink \"Alpha Centauri\"\n"
//! );
//! ```
//!
//! ### Working with Nodes
//!
//! ```rust
//! use skyfile::{node, DataFile, DataWriter, WriterOptions};
//!
//! let file = DataFile::parse("fleet \"Small Pirates\"\n\tgovernment Pirate\n");
//! let fleet = &file.root().children()[0];
//! assert_eq!(fleet.token(1), "Small Pirates");
//!
//! let mut out = DataWriter::new(WriterOptions::default());
//! out.write_node(&node!["fleet", "Small Pirates"; node!["government", "Pirate"]]);
//! assert_eq!(out.into_inner(), "fleet \"Small Pirates\"\n\tgovernment Pirate\n");
//! ```
//!
//! ### Generating a System
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand_chacha::ChaChaRng;
//! use skyfile::{Point, System};
//!
//! let mut rng = ChaChaRng::seed_from_u64(42);
//! let mut system = System::generate("Nova", Point::new(100., -40.), &mut rng);
//!
//! let planet = system.objects().iter().position(|it| it.is_root() && !it.is_star()).unwrap();
//! system.move_object(planet, 200., 0.);
//! system.change_sprite(planet, &mut rng);
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (mostly `debug` and `trace`) and never
//! installs a subscriber.

pub mod catalog;
pub mod editing;
pub mod error;
pub mod format;
pub mod generator;
pub mod macros;
pub mod map;
pub mod name;
pub mod node;
pub mod options;
pub mod parser;
pub mod planet;
pub mod stellar;
pub mod system;
pub mod writer;

pub use catalog::{BodyKind, StarType};
pub use editing::{
    EditOutcome, Entry, EntryList, Minable, MinableField, PeriodicEvent, PeriodicField,
    RaidField, RaidFleet, TributeFleet, TributeField,
};
pub use error::{Error, Result};
pub use generator::{HABITABLE_SCALE, MIN_GAP, MIN_MOON_GAP};
pub use map::{MapData, Named, Registry};
pub use name::EntityName;
pub use node::{is_number, parse_number, DataNode};
pub use options::{GeneratorOptions, Indent, WriterOptions};
pub use parser::{tokenize, DataFile};
pub use planet::{Paragraph, Planet};
pub use stellar::{Point, StellarObject};
pub use system::{Asteroid, Belt, Ramscoop, System};
pub use writer::{format_compact_period, format_number, DataWriter, Token};

use std::io;

/// Parses map text into a [`MapData`].
///
/// Parsing never fails; unreadable lines become passthrough nodes.
#[must_use]
pub fn from_str(s: &str) -> MapData {
    MapData::parse(s)
}

/// Reads a whole map from an I/O stream.
///
/// # Examples
///
/// ```rust
/// use skyfile::from_reader;
/// use std::io::Cursor;
///
/// let map = from_reader(Cursor::new(b"planet Earth\n")).unwrap();
/// assert!(map.planet("Earth").is_some());
/// ```
///
/// # Errors
///
/// Returns an error if reading fails or the input is not UTF-8.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R>(mut reader: R) -> Result<MapData>
where
    R: io::Read,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(from_str(&string))
}

/// Parses map text from bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice(v: &[u8]) -> Result<MapData> {
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    Ok(from_str(s))
}

/// Writes a map with tab indentation and full-precision numbers.
#[must_use]
pub fn to_string(map: &MapData) -> String {
    to_string_with_options(map, &WriterOptions::default())
}

/// Writes a map with custom options.
///
/// # Examples
///
/// ```rust
/// use skyfile::{from_str, to_string_with_options, Indent, WriterOptions};
///
/// let map = from_str("system Sol\n\tpos 0 0\n");
/// let options = WriterOptions::new().with_indent(Indent::Spaces(2));
/// assert_eq!(to_string_with_options(&map, &options), "system Sol\n  pos 0 0\n");
/// ```
#[must_use]
pub fn to_string_with_options(map: &MapData, options: &WriterOptions) -> String {
    map.save(options)
}

/// Writes a map to an I/O stream.
///
/// # Errors
///
/// Returns an error if writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(writer: W, map: &MapData) -> Result<()>
where
    W: io::Write,
{
    to_writer_with_options(writer, map, &WriterOptions::default())
}

/// Writes a map to an I/O stream with custom options.
///
/// # Errors
///
/// Returns an error if writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W>(mut writer: W, map: &MapData, options: &WriterOptions) -> Result<()>
where
    W: io::Write,
{
    writer
        .write_all(to_string_with_options(map, options).as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = "\
system Sol
\tpos 0 0
\tgovernment Republic
\tlink Alpha
planet Earth
\tshipyard \"Basic Ships\"
";

    #[test]
    fn test_string_round_trip() {
        let map = from_str(MAP);
        assert_eq!(to_string(&map), MAP);
    }

    #[test]
    fn test_writer_round_trip() {
        let map = from_str(MAP);
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &map).unwrap();
        let back = from_reader(buffer.as_slice()).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_invalid_utf8() {
        let err = from_slice(&[0x73, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, Error::Custom(_)));
    }

    #[test]
    fn test_compact_periods_option() {
        let map = from_str("system A\n\tobject\n\t\tsprite planet/earth\n\t\tperiod 365.2563789\n");
        let options = WriterOptions::new().with_compact_periods(true);
        assert!(to_string_with_options(&map, &options).contains("\tperiod 365.256\n"));
        assert!(to_string(&map).contains("\tperiod 365.2563789\n"));
    }

    #[test]
    fn test_snapshot_through_serde() {
        let map = from_str(MAP);
        let sol = map.system("Sol").unwrap();
        let json = serde_json::to_string(sol).unwrap();
        let back: System = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, sol);
    }
}
