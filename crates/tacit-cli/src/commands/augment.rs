use clap::Parser;
use tacit::PreferenceMemory;

use crate::error::CliResult;
use crate::output::OutputFormat;

#[derive(Parser)]
pub struct AugmentCommand {
    #[clap(help = "Prompt to augment with relevant preferences")]
    pub text: String,
}

impl AugmentCommand {
    pub fn execute(&self, memory: &PreferenceMemory, format: OutputFormat) -> CliResult<()> {
        let augmented = memory.augment_prompt(&self.text)?;

        match format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "prompt": &self.text,
                    "augmented": &augmented,
                    "changed": augmented != self.text,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => println!("{augmented}"),
        }

        Ok(())
    }
}
