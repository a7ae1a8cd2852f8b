pub mod record;
pub mod value;
pub mod varint;
