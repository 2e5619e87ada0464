//! Block name ↔ id table
//!
//! Loaded once from the embedded `data/blocks.json` and never modified.

use crate::table::NameTable;
use std::sync::LazyLock;

/// Numeric block type as used on the wire.
pub type BlockId = u32;

/// Returned by [`name`] when no block has the requested id.
pub const NOT_FOUND: &str = "Not Found";

static BLOCKS: LazyLock<NameTable> = LazyLock::new(|| {
    NameTable::from_json(include_str!("../data/blocks.json"))
        .expect("embedded blocks.json is a flat name/id map")
});

/// The full block table.
pub fn table() -> &'static NameTable {
    &BLOCKS
}

/// Look up a block id by name, e.g. `"STONE"`.
pub fn id(name: &str) -> Option<BlockId> {
    BLOCKS.id(name)
}

/// Reverse lookup; the first name in table order wins.
pub fn name(id: BlockId) -> &'static str {
    BLOCKS.name(id).unwrap_or(NOT_FOUND)
}
