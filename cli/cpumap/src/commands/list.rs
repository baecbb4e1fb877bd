//! `cpumap list`: built-in profiles and trigger edges.

use anyhow::Result;

use cpumap_boards::{ProfileId, ACTIVE_LIMIT_TRIGGER, ACTIVE_PROFILE};
use cpumap_core::TriggerEdge;

pub fn run() -> Result<()> {
    println!("Built-in profiles:");
    println!();
    for profile in ProfileId::ALL {
        let marker = if profile == ACTIVE_PROFILE { '*' } else { ' ' };
        println!(
            "  {marker} {:<25} {}",
            profile.name(),
            profile.description()
        );
    }
    println!();
    let edges: Vec<String> = TriggerEdge::ALL
        .iter()
        .map(|t| {
            if *t == ACTIVE_LIMIT_TRIGGER {
                format!("{t} (active)")
            } else {
                t.to_string()
            }
        })
        .collect();
    println!("Limit trigger edges: {}", edges.join(", "));
    println!();
    println!("Use 'cpumap show --profile <name>' for details.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_succeeds() {
        assert!(run().is_ok());
    }
}
