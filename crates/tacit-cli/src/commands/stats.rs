use clap::Parser;
use tacit::PreferenceMemory;
use tacit::memory::MemoryTier;

use crate::error::CliResult;
use crate::output::{OutputFormat, format_weight, new_table};

#[derive(Parser)]
pub struct StatsCommand {}

/// Summary of the memory contents
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryStats {
    pub total: usize,
    pub short_term: usize,
    pub long_term: usize,
    pub mean_weight: f32,
    pub max_weight: f32,
    pub observations: u64,
    pub history_horizon: Option<usize>,
}

impl MemoryStats {
    pub fn collect(memory: &PreferenceMemory) -> Self {
        let store = memory.store();
        let total = store.len();
        let (sum, max) = store.iter().fold((0.0f32, 0.0f32), |(sum, max), (_, entry)| {
            (sum + entry.weight, max.max(entry.weight))
        });

        Self {
            total,
            short_term: store.count_by_tier(MemoryTier::ShortTerm),
            long_term: store.count_by_tier(MemoryTier::LongTerm),
            mean_weight: if total == 0 { 0.0 } else { sum / total as f32 },
            max_weight: max,
            observations: memory.history().len(),
            history_horizon: memory.history().horizon(),
        }
    }
}

impl StatsCommand {
    pub fn execute(&self, memory: &PreferenceMemory, format: OutputFormat) -> CliResult<()> {
        let stats = MemoryStats::collect(memory);
        let state_path = memory.config().state_path();

        match format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "total": stats.total,
                    "short_term": stats.short_term,
                    "long_term": stats.long_term,
                    "mean_weight": stats.mean_weight,
                    "max_weight": stats.max_weight,
                    "observations": stats.observations,
                    "history_horizon": stats.history_horizon,
                    "embedding_model": memory.lookup().model_name(),
                    "embedding_dimension": memory.lookup().dimension(),
                    "state_path": state_path.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                let mut table = new_table(["Metric", "Value"]);
                table.add_row(["Total entries", &stats.total.to_string()]);
                table.add_row(["Short-term", &stats.short_term.to_string()]);
                table.add_row(["Long-term", &stats.long_term.to_string()]);
                table.add_row(["Mean weight", &format_weight(stats.mean_weight)]);
                table.add_row(["Max weight", &format_weight(stats.max_weight)]);
                table.add_row(["Observations", &stats.observations.to_string()]);
                table.add_row([
                    "History horizon",
                    &stats
                        .history_horizon
                        .map_or_else(|| "unbounded".to_string(), |h| h.to_string()),
                ]);
                table.add_row(["Embedding model", memory.lookup().model_name()]);
                table.add_row(["Dimension", &memory.lookup().dimension().to_string()]);
                table.add_row(["State file", &state_path.display().to_string()]);
                println!("{table}");
            }
        }

        Ok(())
    }
}
