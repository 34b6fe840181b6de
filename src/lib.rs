//! Fault-tolerant parsing of MARC binary bibliographic records.
//!
//! Library catalogs exchange records in ISO 2709 framing: a 5-digit
//! decimal length prefix, a fixed 24-byte leader, a directory of field
//! locations, and variable fields separated by control bytes. Decades of
//! legacy export tools left the wild full of records that are truncated,
//! off by a byte in their directory offsets, or encoded in MARC8 instead
//! of Unicode. This crate recovers bibliographic facts from such records
//! anyway, one [`Edition`] per accepted record.
//!
//! The pipeline is a chain of pure transformations:
//! framing ([`framing`]) → directory and tag-line resolution ([`record`])
//! → subfield splitting ([`subfields`]) → character decoding
//! ([`charset`]) → per-tag extraction ([`extract`]) → edition assembly
//! and book classification ([`assemble`]). No stage keeps state across
//! records, so records may be processed in parallel once framed.

pub mod assemble;
pub mod charset;
pub mod edition;
pub mod error;
pub mod extract;
pub mod framing;
pub mod isbn;
pub mod record;
pub mod subfields;

pub use assemble::read_edition;
pub use edition::{Edition, NameRecord};
pub use error::{MarcError, MarcResult};
pub use framing::RecordFramer;

/// Terminates every variable field and the directory.
pub const FIELD_TERMINATOR: u8 = 0x1E;
/// Last byte of a well-formed record.
pub const RECORD_TERMINATOR: u8 = 0x1D;
/// Introduces each subfield inside a data field.
pub const SUBFIELD_DELIMITER: u8 = 0x1F;
