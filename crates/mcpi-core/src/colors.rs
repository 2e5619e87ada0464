//! Wool/dye color table, used as the `data` argument of colored blocks.

use crate::table::NameTable;
use std::sync::LazyLock;

pub type ColorId = u32;

static COLORS: LazyLock<NameTable> = LazyLock::new(|| {
    NameTable::from_json(include_str!("../data/colors.json"))
        .expect("embedded colors.json is a flat name/id map")
});

pub fn table() -> &'static NameTable {
    &COLORS
}

pub fn id(name: &str) -> Option<ColorId> {
    COLORS.id(name)
}

pub fn name(id: ColorId) -> Option<&'static str> {
    COLORS.name(id)
}
