//! Two storage strategies for semi-structured key/value data over one
//! relational store:
//!
//! - [`blob`]: the whole map serialized into a single text column by a
//!   [`codec::ValueCodec`].
//! - [`inverted`]: one child row per key, joined to a parent set, with an
//!   in-memory upsert-by-name.
//!
//! Stores are plain objects taking a `DatabaseConnection` per call; there is
//! no ambient handle. Single-process, single-writer access is assumed.

pub mod blob;
pub mod codec;
pub mod errors;
pub mod inverted;

#[cfg(test)]
pub mod test_support;
