//! Turns uploaded spreadsheet bytes into typed [`webprice_core::ProductRecord`]s.
//!
//! Stages run in order: [`decode`] picks a text encoding, [`locate`] finds the
//! separator and header row, [`read_table`] splits cells, [`map_columns`] ties
//! header labels to canonical fields and [`materialize`] normalizes each row.

pub mod decode;
pub mod error;
pub mod locate;
pub mod mapping;
pub mod materialize;
pub mod number;
pub(crate) mod text;

pub use decode::{decode, Decoded, Encoding};
pub use error::{ErrorKind, IngestError};
pub use locate::{locate, read_table, RawTable, Separator, Structure};
pub use mapping::{map_columns, ColumnMapping, MappedColumn};
pub use materialize::materialize;
pub use number::{parse_number, parse_ranking};
