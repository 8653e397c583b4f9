//! Data File Format
//!
//! This module documents the text format read by [`crate::DataFile`] and
//! written by [`crate::DataWriter`], and the shape of the `system` and
//! `planet` nodes the map types understand.
//!
//! # Lines and Tokens
//!
//! Every non-blank line is one node. A line is split into tokens at runs of
//! spaces and tabs:
//!
//! ```text
//! pos -12.5 300
//! government "Free Worlds"
//! description `The "cradle" of humanity.`
//! ```
//!
//! **Rules**:
//! - `"` starts a token that runs to the next `"`; the quotes are not part of it
//! - `` ` `` does the same, for tokens that contain `"`
//! - An unterminated quote runs to the end of the line
//! - There are no escape sequences
//! - Numbers are tokens too; they are interpreted only when read as a value,
//!   and anything that is not a decimal number reads as `0`
//!
//! # Nesting
//!
//! A line indented deeper than the line above it is that line's child. Lines
//! at equal indentation are siblings. Tabs and spaces both count one column;
//! only the comparison between lines matters.
//!
//! ```text
//! system Sol
//! 	arrival
//! 		link 500
//! 		jump 300
//! 	link "Alpha Centauri"
//! ```
//!
//! # Comments
//!
//! A line whose first non-blank character is `#` is a comment. Comments are
//! collected separately and never appear in the tree. A `#` later on a line
//! is an ordinary token.
//!
//! # Writing
//!
//! | Value | Written as |
//! |-------|-----------|
//! | Plain token | as is |
//! | Token with whitespace, empty, or starting with `#` or `` ` `` | `"quoted"` |
//! | Token containing `"` | `` `backticked` `` |
//! | Number | shortest text that reads back to the same value (`500`, `0.3`) |
//! | Negative zero | `0` |
//!
//! Children are indented one tab per level unless [`crate::WriterOptions`]
//! asks for spaces. Periods may optionally use the short legacy form
//! ([`crate::format_compact_period`]).
//!
//! # Systems
//!
//! Recognized children of `system <name>`, written back in this order:
//!
//! ```text
//! hidden | shrouded | inaccessible
//! pos <x> <y>
//! "display name" <name>
//! government <name>
//! attributes <attribute>...
//! arrival <distance>            or   arrival / link <d> / jump <d>
//! departure <distance>          or   departure / link <d> / jump <d>
//! ramscoop / universal <0|1> / addend <n> / multiplier <n>
//! habitable <distance>
//! belt <radius> [<weight>]
//! "invisible fence" <radius>
//! "jump range" <distance>
//! haze <sprite>
//! "starfield density" <n>
//! music <track>
//! link <system>
//! asteroids <type> <count> <energy>
//! minables <type> <count> <energy>
//! trade <commodity> <price>
//! fleet <name> <period>
//! hazard <name> <period>
//! "no raids"
//! raid <fleet> [<min> [<max>]]
//! object [<planet>]
//! 	sprite <path>
//! 	distance <d>
//! 	period <days>
//! 	offset <degrees>
//! 	object ...
//! ```
//!
//! Anything else is kept verbatim and written after the recognized fields,
//! before the objects.
//!
//! # Planets
//!
//! ```text
//! planet <name>
//! 	"display name" <name>
//! 	attributes <attribute>...
//! 	landscape <sprite>
//! 	music <track>
//! 	description <paragraph>
//! 	spaceport <paragraph>
//! 	shipyard <name>
//! 	outfitter <name>
//! 	government <name>
//! 	"required reputation" <n>
//! 	bribe <n>
//! 	security <n>
//! 	tribute <n>
//! 		threshold <n>
//! 		fleet <name> [<count>]
//! ```
