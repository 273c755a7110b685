//! Entity structs for the rows lobprobe writes.
//!
//! Each entity maps to a table created by the schema bootstrap in `lob-db`.

mod payload;
mod point;
mod source;
mod tag;

pub use payload::PayloadRow;
pub use point::Point;
pub use source::Source;
pub use tag::Tag;
