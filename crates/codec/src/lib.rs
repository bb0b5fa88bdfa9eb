#![warn(missing_docs)]
//! Fixed-width binary record codec and legacy text encoding.
//!
//! The legacy file set stores everything as little-endian integers and
//! fixed-length space-padded strings, validated by simple additive byte
//! checksums. This crate provides the building blocks: an in-memory record
//! writer/reader pair, the checksum, the single-byte game charset, and the
//! add-13 message cipher.

mod encoding;
mod record;

pub use encoding::{
    decipher_message, encipher_message, from_game_charset, to_game_charset, CIPHER_NEWLINE,
};
pub use record::{byte_checksum, CodecError, RecordReader, RecordWriter};
