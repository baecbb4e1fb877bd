//! Concrete boards for the cpumap resource model.
//!
//! - **MCU models:** the ATmega2560 port, interrupt and timer layout
//! - **Profiles:** built-in board maps, one selected per build through Cargo
//!   features and resolved at compile time into [`ACTIVE_TABLE`]
//! - **Board descriptions:** the same maps written as `.board.toml` files and
//!   resolved at load time

pub mod description;
pub mod error;
pub mod mcu;
pub mod mega2560;
pub mod parse;
pub mod profile;

pub use description::{BoardDescription, InterruptDescription, LoweredBoard};
pub use error::{BoardError, Result};
pub use parse::{
    board_to_toml, generate_template, load_board_toml, parse_board_toml, BOARD_FILE_SUFFIX,
};
pub use profile::{
    select_profile, select_trigger, ProfileId, ACTIVE_LIMIT_TRIGGER, ACTIVE_MAP, ACTIVE_PROFILE,
    ACTIVE_TABLE,
};
