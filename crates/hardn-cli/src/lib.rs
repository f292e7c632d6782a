//! # hardn-cli — The `hardn` Command-Line Tool
//!
//! Drives a rule catalog against a store: the live Windows registry, or a
//! JSON file holding a registry image.
//!
//! ## Subcommands
//!
//! - `hardn harden` — apply rules, recording original values in the journal.
//! - `hardn restore` — undo them from the journal, in reverse order.
//! - `hardn status` — report which rules are currently hardened.
//! - `hardn list` — print the catalog and its expanded targets.
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers take parsed args and a
//!   [`context::RunContext`] and return the process exit code.
//! - Handlers delegate to `hardn-rules` and `hardn-catalog`. No rule logic
//!   lives here.
//! - Privilege and elevation checks are left to the operator.

pub mod config;
pub mod context;
pub mod harden;
pub mod list;
pub mod restore;
pub mod status;
