//! # `hardn list`
//!
//! Prints the catalog: every top-level rule with its labels and, on request,
//! the concrete targets it expands to.

use anyhow::Result;
use clap::Args;
use hardn_core::RuleTarget;
use hardn_rules::Rule;
use serde::Serialize;

use crate::context::RunContext;

/// Arguments for `hardn list`.
#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Include every expanded target.
    #[arg(long)]
    pub targets: bool,
}

/// One catalog rule as listed.
#[derive(Debug, Serialize)]
pub struct ListEntry {
    pub name: String,
    pub long_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub target_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<RuleTarget>,
}

impl ListEntry {
    fn from_rule(rule: &dyn Rule, with_targets: bool) -> Self {
        let targets = rule.targets();
        Self {
            name: rule.name().to_string(),
            long_name: rule.long_name().to_string(),
            description: rule.description().to_string(),
            target_count: targets.len(),
            targets: if with_targets { targets } else { Vec::new() },
        }
    }
}

/// Summarise the catalog in order.
pub fn collect_entries(ctx: &RunContext, with_targets: bool) -> Vec<ListEntry> {
    ctx.catalog
        .rules()
        .iter()
        .map(|rule| ListEntry::from_rule(rule.as_ref(), with_targets))
        .collect()
}

/// Execute `hardn list`.
pub fn run_list(args: &ListArgs, ctx: &RunContext) -> Result<u8> {
    let entries = collect_entries(ctx, args.targets);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(0);
    }

    println!("Catalog: {}", ctx.catalog.origin());
    println!();
    for entry in &entries {
        println!(
            "  {:<16} {} ({} targets)",
            entry.name, entry.long_name, entry.target_count
        );
        if !entry.description.is_empty() {
            println!("  {:<16} {}", "", entry.description);
        }
        for target in &entry.targets {
            println!("      {target}");
        }
    }
    println!();
    println!("Total: {} rules", entries.len());
    Ok(0)
}
