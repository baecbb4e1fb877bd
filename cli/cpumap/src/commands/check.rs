//! `cpumap check`: resolve a board description file.

use std::path::Path;

use anyhow::{Context, Result};

use cpumap_boards::load_board_toml;

use super::show;

pub fn run(path: &Path, json: bool) -> Result<()> {
    let shown = path.display();
    let lowered = load_board_toml(path)
        .and_then(|board| board.lower())
        .with_context(|| format!("cannot read board description {shown}"))?;
    let table = lowered
        .resolve()
        .with_context(|| format!("{shown} is not a consistent board"))?;
    tracing::info!(
        board = table.name,
        mcu = table.mcu,
        "board description is consistent"
    );
    show::print(&table, json)
}
