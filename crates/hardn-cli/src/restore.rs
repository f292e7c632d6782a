//! # `hardn restore`
//!
//! Undoes `hardn harden` using the journal: each target goes back to the
//! value it held before the first harden, or is deleted if it was absent.
//! Rules run in reverse catalog order.

use anyhow::Result;
use clap::Args;
use hardn_rules::Session;

use crate::context::RunContext;

/// Arguments for `hardn restore`.
#[derive(Args, Debug, Default)]
pub struct RestoreArgs {
    /// Restore only the named rule. Repeat to select several.
    #[arg(long = "only", value_name = "NAME")]
    pub only: Vec<String>,

    /// Continue with the remaining rules after one fails.
    #[arg(long)]
    pub keep_going: bool,
}

/// Execute `hardn restore`. Returns 1 if any rule failed.
pub fn run_restore(args: &RestoreArgs, ctx: &RunContext) -> Result<u8> {
    let rules = ctx.catalog.select(&args.only, &ctx.config.skip)?;
    let mut journal = ctx.load_journal()?;

    let fingerprint = ctx.catalog.fingerprint();
    if let Some(recorded) = journal.catalog_fingerprint() {
        if recorded != fingerprint {
            tracing::warn!(
                recorded = %recorded,
                current = %fingerprint,
                "journal was written against a different catalog; targets it no longer names stay untouched"
            );
        }
    }
    if journal.is_empty() && journal.catalog_fingerprint().is_none() {
        tracing::warn!("journal is empty; only values still equal to their hardened value will be removed");
    }

    let mut restored = 0usize;
    let mut failures = 0usize;
    let mut session = Session::new(ctx.store(), &mut journal);
    for rule in rules.iter().rev() {
        let outcome = session.restore(*rule);
        ctx.save_journal(session.journal())?;
        match outcome {
            Ok(()) => {
                restored += 1;
                println!("  restored  {:<16} {}", rule.name(), rule.long_name());
            }
            Err(e) => {
                failures += 1;
                let e = anyhow::Error::new(e);
                tracing::error!(rule = %rule.name(), error = %format!("{e:#}"), "restore failed");
                eprintln!("  FAILED    {:<16} {}: {e:#}", rule.name(), rule.long_name());
                if !args.keep_going {
                    break;
                }
            }
        }
    }

    println!();
    println!(
        "{restored} of {} rules restored, {} captured values remain in journal",
        rules.len(),
        session.journal().len()
    );
    Ok(u8::from(failures > 0))
}
