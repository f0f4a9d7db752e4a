use crate::error::{Result, SegregateError};
use crate::target::Target;

/// Check that a target set can be processed.
///
/// Runs before any output is opened, so a bad configuration never leaves
/// partial files behind.
pub fn validate(targets: &[Target], analyzed: bool) -> Result<()> {
    if !analyzed {
        return Err(SegregateError::state(
            "input must be analyzed before validation",
        ));
    }

    if targets.is_empty() {
        return Err(SegregateError::config("no targets"));
    }

    if targets.len() < 2 {
        return Err(SegregateError::config("need at least two targets"));
    }

    let total: u32 = targets.iter().map(|t| u32::from(t.percent)).sum();
    if total != 100 {
        return Err(SegregateError::config("percentages must sum to 100"));
    }

    Ok(())
}
