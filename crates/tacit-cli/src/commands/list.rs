use clap::Parser;
use tacit::PreferenceMemory;
use tacit::memory::{MemoryTier, PreferenceEntry};

use crate::error::CliResult;
use crate::output::{OutputFormat, format_timestamp, format_weight, new_table, truncate_string};

#[derive(Parser)]
pub struct ListCommand {
    #[clap(long, help = "Filter by tier (short, long)")]
    pub tier: Option<MemoryTier>,

    #[clap(long, short, default_value = "20", help = "Maximum number of entries to show")]
    pub limit: usize,
}

impl ListCommand {
    pub fn execute(&self, memory: &PreferenceMemory, format: OutputFormat) -> CliResult<()> {
        let entries = self.select(memory);

        match format {
            OutputFormat::Json => {
                let output: Vec<_> = entries
                    .iter()
                    .map(|(key, entry)| {
                        serde_json::json!({
                            "key": key,
                            "value": &entry.value,
                            "weight": entry.weight,
                            "tier": entry.tier,
                            "last_seen": entry.last_seen.to_rfc3339(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                if entries.is_empty() {
                    println!("No preferences found.");
                    return Ok(());
                }

                let mut table = new_table(["Key", "Value", "Weight", "Tier", "Last Seen"]);
                for (key, entry) in &entries {
                    table.add_row([
                        truncate_string(key, 30),
                        truncate_string(&entry.value, 30),
                        format_weight(entry.weight),
                        entry.tier.to_string(),
                        format_timestamp(&entry.last_seen),
                    ]);
                }

                println!("{table}");
                println!(
                    "\nShowing {} of {} entries",
                    entries.len(),
                    memory.store().len()
                );
            }
        }

        Ok(())
    }

    /// Entries matching the tier filter, heaviest first, capped at `limit`
    pub fn select<'a>(&self, memory: &'a PreferenceMemory) -> Vec<(&'a String, &'a PreferenceEntry)> {
        let mut entries: Vec<_> = memory
            .store()
            .iter()
            .filter(|(_, entry)| self.tier.is_none_or(|tier| entry.tier == tier))
            .collect();
        entries.sort_by(|a, b| b.1.weight.total_cmp(&a.1.weight).then_with(|| a.0.cmp(b.0)));
        entries.truncate(self.limit);
        entries
    }
}
