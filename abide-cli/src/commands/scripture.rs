use abide_core::scripture::{resolve, BibleResponse};
use abide_core::{FhlClient, ScriptureProvider};
use clap::Args;

use super::{runtime, OutputFormat};
use crate::config::Config;

#[derive(Args)]
pub struct ScriptureCommand {
    /// Book name (e.g. 約翰福音, 約, John)
    pub book: String,

    /// Chapter number
    pub chapter: u32,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl ScriptureCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let book = resolve(&self.book, self.chapter)?;
        let client = FhlClient::new(
            config.scripture.base_url.value.clone(),
            config.scripture.version.value.clone(),
        );

        let verses = runtime()?.block_on(client.fetch_chapter(book.name, self.chapter))?;

        match self.format {
            OutputFormat::Json => {
                let response = BibleResponse::from_verses(book, &verses);
                println!("{}", serde_json::to_string_pretty(&response)?);
            }
            OutputFormat::Text => {
                println!("{} {}", book.name, self.chapter);
                println!();
                for verse in &verses {
                    println!("{:>3} {}", verse.verse_number, verse.text);
                }
            }
        }
        Ok(())
    }
}
