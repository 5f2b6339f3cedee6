//! Provenance commands: `about` (version and store location) and
//! `imprint` (the full origin statement).

use colored::Colorize;
use std::path::Path;

const INTENT: &str = "Make reasoning legible: every conclusion keeps its chain of evidence";
const PROVENANCE: &str = "Hand-built capture tooling; the store is the record of origin";

const IMPRINT_BLOCK: &str = "\
━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
HandshakeOS-E — Imprint & Provenance
━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

Intent:       Make reasoning legible: every conclusion keeps
              its chain of evidence
Provenance:   Hand-built capture tooling; the store is the
              record of origin

Every capture session is one transaction. An intent states the
goal; an observation grounds it; hypotheses compete; a test
decides; an outcome concludes; a pattern seed generalizes.
Nothing is recorded until the whole chain holds.

━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

pub fn run_about(db_path: &Path) {
    println!("{}  {}", "Tool:".bold(), "handshakeos");
    println!("{}  {}", "Version:".bold(), env!("CARGO_PKG_VERSION"));
    println!("{}  {}", "Intent:".bold(), INTENT);
    println!("{}  {}", "Origin:".bold(), PROVENANCE);
    println!("{}  {}", "Database:".bold(), db_path.display());
}

pub fn run_imprint() {
    println!("{}", IMPRINT_BLOCK);
}
