/// I/O operations for reading and writing DMS archives

/// Archive reader
pub mod reader;
/// Archive writer
pub mod writer;

pub use reader::{parse_archive, read_dms};
pub use writer::{pack_archive, write_dms, PackOptions};
