//! # `hardn status`
//!
//! Read-only: checks every catalog rule against the store and reports whether
//! it is hardened.

use anyhow::Result;
use clap::Args;
use hardn_rules::RuleReport;

use crate::context::RunContext;

/// Arguments for `hardn status`.
#[derive(Args, Debug, Default)]
pub struct StatusArgs {
    /// Emit JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Include every target and its current value.
    #[arg(long)]
    pub targets: bool,
}

/// Inspect every rule in catalog order.
pub fn collect_status(ctx: &RunContext) -> Vec<RuleReport> {
    ctx.catalog
        .rules()
        .iter()
        .map(|rule| RuleReport::inspect(rule.as_ref(), ctx.store()))
        .collect()
}

/// Execute `hardn status`.
pub fn run_status(args: &StatusArgs, ctx: &RunContext) -> Result<u8> {
    let reports = collect_status(ctx);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(0);
    }

    println!("{:<16} {:<12} {:>8}  {}", "RULE", "STATE", "SET", "NAME");
    for report in &reports {
        let state = if report.hardened { "hardened" } else { "open" };
        let skipped = ctx
            .config
            .skip
            .iter()
            .any(|s| s.eq_ignore_ascii_case(&report.name));
        println!(
            "{:<16} {:<12} {:>8}  {}{}",
            report.name,
            state,
            format!("{}/{}", report.present_count(), report.targets.len()),
            report.long_name,
            if skipped { " (skipped)" } else { "" }
        );
        if args.targets {
            for t in &report.targets {
                let current = t
                    .current
                    .map_or_else(|| "-".to_string(), |v| v.to_string());
                println!("    {current:>10}  {}", t.target);
            }
        }
    }
    Ok(0)
}
