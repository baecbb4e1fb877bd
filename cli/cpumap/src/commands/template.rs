//! `cpumap template`: emit a starting `.board.toml`.

use anyhow::Result;

use cpumap_boards::generate_template;

use super::profile_or_active;

pub fn run(name: &str, profile: Option<&str>) -> Result<()> {
    let profile = profile_or_active(profile)?;
    print!("{}", generate_template(name, profile)?);
    Ok(())
}
