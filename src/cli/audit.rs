//! Audit CLI command

use super::CommandContext;
use crate::error::MoneyResult;

/// Print the most recent audit entries of the signed-in user
pub fn handle_audit_command(ctx: &CommandContext<'_>, count: usize) -> MoneyResult<()> {
    let Some(log) = ctx.storage.audit_log() else {
        println!("Audit logging is disabled.");
        return Ok(());
    };

    let entries: Vec<_> = log
        .read_all()?
        .into_iter()
        .filter(|e| e.user_id == ctx.user)
        .collect();

    if entries.is_empty() {
        println!("No audit entries.");
        return Ok(());
    }

    let skip = entries.len().saturating_sub(count);
    for entry in &entries[skip..] {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}
