//! Reader and writer for version 30 BSP map files.

pub use self::error::{BspError, CorruptionError, FormatError, ParseError};
pub use self::lump::{Lump, LumpLimits, LumpType, LUMP_COUNT};
pub use self::lump_data::*;
pub use self::map::BspFile;
pub use self::map_header::{MapHeader, BSP_VERSION, HEADER_SIZE};
pub use self::tree::BspTree;

mod error;
mod lump;
mod lump_data;
mod map;
mod map_header;
mod tree;

pub(crate) use io_util::{PrimitiveRead, PrimitiveWrite, RawDataRead, StringRead};
