use std::collections::BTreeSet;

use chrono::Utc;
use clap::Parser;
use tacit::PreferenceMemory;

use crate::error::CliResult;
use crate::output::{OutputFormat, format_weight, new_table};

#[derive(Parser)]
pub struct ObserveCommand {
    #[clap(help = "Response text to learn from")]
    pub text: String,
}

impl ObserveCommand {
    pub fn execute(&self, memory: &mut PreferenceMemory, format: OutputFormat) -> CliResult<()> {
        let outcome = memory.process_response(&self.text, Utc::now())?;

        match format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "created": outcome.created,
                    "reinforced": outcome.reinforced,
                    "promoted": outcome.promoted,
                    "evicted": outcome.evicted,
                    "entries": memory.store().len(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                if outcome.is_empty() {
                    println!("No terms learned.");
                    return Ok(());
                }

                let mut table = new_table(["Change", "Terms"]);
                table.add_row(["Created", &join_terms(&outcome.created)]);
                table.add_row(["Reinforced", &join_terms(&outcome.reinforced)]);
                table.add_row(["Promoted", &join_terms(&outcome.promoted)]);
                table.add_row(["Evicted", &join_terms(&outcome.evicted)]);
                println!("{table}");

                let touched = outcome.created.iter().chain(&outcome.reinforced);
                let mut weights = new_table(["Term", "Weight", "Tier"]);
                for term in touched {
                    if let Some(entry) = memory.store().get(term) {
                        weights.add_row([
                            term.clone(),
                            format_weight(entry.weight),
                            entry.tier.to_string(),
                        ]);
                    }
                }
                println!("{weights}");
                println!("\nEntries in memory: {}", memory.store().len());
            }
        }

        Ok(())
    }
}

fn join_terms(terms: &BTreeSet<String>) -> String {
    if terms.is_empty() {
        "-".to_string()
    } else {
        terms.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}
