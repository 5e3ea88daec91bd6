use crate::cli::exit_codes;
use crate::harness;

pub(crate) fn list() -> anyhow::Result<i32> {
    let entries = harness::registered_harnesses();
    if entries.is_empty() {
        println!("No registered harnesses found.");
        return Ok(exit_codes::OK);
    }
    for entry in entries {
        println!("{:<12} {}", entry.name, entry.description);
    }
    Ok(exit_codes::OK)
}
