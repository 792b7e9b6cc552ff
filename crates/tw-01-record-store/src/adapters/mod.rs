//! Adapters for the Record Store subsystem.

pub mod serializer;

pub use serializer::{decode_record, encode_record};
