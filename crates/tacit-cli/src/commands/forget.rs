use clap::Parser;
use tacit::PreferenceMemory;

use crate::error::CliResult;
use crate::output::OutputFormat;

#[derive(Parser)]
pub struct ForgetCommand {
    #[clap(help = "Term to remove from memory")]
    pub term: String,
}

impl ForgetCommand {
    pub fn execute(&self, memory: &mut PreferenceMemory, format: OutputFormat) -> CliResult<()> {
        let removed = memory.forget(&self.term)?;

        match format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "term": &self.term,
                    "deleted": removed.is_some(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                if removed.is_some() {
                    println!("Forgot: {}", self.term);
                } else {
                    println!("Not in memory: {}", self.term);
                }
            }
        }

        Ok(())
    }
}
