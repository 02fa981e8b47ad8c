use clap::Parser;
use tacit::PreferenceMemory;

use crate::error::CliResult;
use crate::output::{OutputFormat, format_weight, new_table};

#[derive(Parser)]
pub struct QueryCommand {
    #[clap(help = "Query text")]
    pub text: String,

    #[clap(long, short, help = "Minimum cosine similarity (defaults to the configured threshold)")]
    pub threshold: Option<f32>,
}

impl QueryCommand {
    pub fn execute(&self, memory: &PreferenceMemory, format: OutputFormat) -> CliResult<()> {
        let threshold = self
            .threshold
            .unwrap_or(memory.config().retrieval.threshold);
        let preferences = memory.relevant_preferences(&self.text, threshold)?;

        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&preferences)?);
            }
            OutputFormat::Table => {
                if preferences.is_empty() {
                    println!("No relevant preferences.");
                    return Ok(());
                }

                let mut table = new_table(["Key", "Value", "Similarity", "Weight", "Tier"]);
                for preference in &preferences {
                    table.add_row([
                        preference.key.clone(),
                        preference.value.clone(),
                        format_weight(preference.similarity),
                        format_weight(preference.weight),
                        preference.tier.to_string(),
                    ]);
                }

                println!("{table}");
                println!("\nTotal: {} matches (threshold {threshold})", preferences.len());
            }
        }

        Ok(())
    }
}
