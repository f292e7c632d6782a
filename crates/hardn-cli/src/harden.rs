//! # `hardn harden`
//!
//! Applies the selected rules in catalog order. The journal is written back
//! after every top-level rule, so a run that stops halfway still leaves a
//! journal that `hardn restore` can undo.
//!
//! ```bash
//! hardn harden
//! hardn harden --only OfficeMacros --only OfficeOLE
//! hardn harden --dry-run
//! ```

use anyhow::Result;
use clap::Args;
use hardn_core::Store;
use hardn_rules::{Journal, Rule, RuleReport, Session};

use crate::context::RunContext;

/// Arguments for `hardn harden`.
#[derive(Args, Debug, Default)]
pub struct HardenArgs {
    /// Harden only the named rule. Repeat to select several.
    #[arg(long = "only", value_name = "NAME")]
    pub only: Vec<String>,

    /// Show what would change without writing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Continue with the remaining rules after one fails.
    #[arg(long)]
    pub keep_going: bool,
}

/// Execute `hardn harden`. Returns 1 if any rule failed.
pub fn run_harden(args: &HardenArgs, ctx: &RunContext) -> Result<u8> {
    let rules = ctx.catalog.select(&args.only, &ctx.config.skip)?;
    if args.dry_run {
        preview(&rules, ctx.store());
        return Ok(0);
    }

    let mut journal = ctx.load_journal()?;
    stamp_fingerprint(&mut journal, &ctx.catalog.fingerprint());
    // An unwritable journal must fail the run before any value is overwritten.
    ctx.save_journal(&journal)?;

    let mut applied = 0usize;
    let mut failures = 0usize;
    let mut session = Session::new(ctx.store(), &mut journal);
    for rule in &rules {
        let outcome = session.harden(*rule);
        ctx.save_journal(session.journal())?;
        match outcome {
            Ok(()) => {
                applied += 1;
                println!("  hardened  {:<16} {}", rule.name(), rule.long_name());
            }
            Err(e) => {
                failures += 1;
                let e = anyhow::Error::new(e);
                tracing::error!(rule = %rule.name(), error = %format!("{e:#}"), "hardening failed");
                eprintln!("  FAILED    {:<16} {}: {e:#}", rule.name(), rule.long_name());
                if !args.keep_going {
                    break;
                }
            }
        }
    }

    println!();
    println!(
        "{} of {} rules hardened, {} captured values in journal",
        applied,
        rules.len(),
        session.journal().len()
    );
    Ok(u8::from(failures > 0))
}

/// Record the catalog fingerprint, or warn if the journal was written
/// against a different catalog and still holds entries from it.
fn stamp_fingerprint(journal: &mut Journal, fingerprint: &str) {
    let recorded = journal.catalog_fingerprint().map(str::to_owned);
    match recorded {
        Some(recorded) if recorded != fingerprint && !journal.is_empty() => {
            tracing::warn!(
                recorded = %recorded,
                current = %fingerprint,
                "journal was written against a different catalog"
            );
        }
        _ => journal.set_catalog_fingerprint(fingerprint),
    }
}

fn preview(rules: &[&dyn Rule], store: &dyn Store) {
    for rule in rules {
        let report = RuleReport::inspect(*rule, store);
        if report.hardened {
            println!("  unchanged {:<16} already hardened", report.name);
        } else {
            let pending = report.targets.len();
            println!(
                "  would set {:<16} {pending} targets ({} currently hold a value)",
                report.name,
                report.present_count()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stamped_on_fresh_journal() {
        let mut journal = Journal::new();
        stamp_fingerprint(&mut journal, "abc");
        assert_eq!(journal.catalog_fingerprint(), Some("abc"));
    }

    #[test]
    fn fingerprint_is_replaced_once_journal_is_drained() {
        let mut journal = Journal::new();
        journal.set_catalog_fingerprint("old");
        stamp_fingerprint(&mut journal, "new");
        assert_eq!(journal.catalog_fingerprint(), Some("new"));
    }
}
