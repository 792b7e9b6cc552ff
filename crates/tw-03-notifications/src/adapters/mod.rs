pub mod serializer;

pub use serializer::{decode_event, encode_event};
