//! TOML loading, serialization and templates for board descriptions.
//!
//! Board descriptions are stored as `.board.toml` files. Keys are kebab-case,
//! pins are written as `P<port><bit>`:
//!
//! ```toml
//! name = "my-shield"
//! mcu = "atmega2560"
//!
//! [pins]
//! x-step = "PA2"
//!
//! [limit-interrupt]
//! trigger = "falling-edge"
//! lines = { x-limit = 5, y-limit = 6, z-limit = 7 }
//! ```

use std::path::Path;

use cpumap_core::TriggerEdge;

use crate::description::BoardDescription;
use crate::error::{BoardError, Result};
use crate::profile::ProfileId;

/// File suffix of board description files.
pub const BOARD_FILE_SUFFIX: &str = ".board.toml";

/// Load a board description from a `.board.toml` file.
pub fn load_board_toml(path: &Path) -> Result<BoardDescription> {
    if !path.exists() {
        return Err(BoardError::NotFound {
            path: path.to_path_buf(),
        });
    }
    tracing::debug!(path = %path.display(), "loading board description");
    let content = std::fs::read_to_string(path)?;
    parse_board_toml(&content)
}

/// Parse a board description from a TOML string.
pub fn parse_board_toml(toml_str: &str) -> Result<BoardDescription> {
    let board: BoardDescription = toml::from_str(toml_str)?;
    Ok(board)
}

/// Serialize a board description to pretty TOML.
pub fn board_to_toml(board: &BoardDescription) -> Result<String> {
    let toml_str = toml::to_string_pretty(board)?;
    Ok(toml_str)
}

/// Generate a `.board.toml` for a new board, seeded from a built-in profile.
pub fn generate_template(name: &str, profile: ProfileId) -> Result<String> {
    let mut board = BoardDescription::from_map(&profile.board_map(TriggerEdge::AnyEdge));
    board.name = name.into();
    board_to_toml(&board)
}
