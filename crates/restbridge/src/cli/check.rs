use std::path::Path;

use anyhow::Result;
use clap::Parser;
use console::style;

use restbridge_codegen::ClientGenerator;
use restbridge_core::descriptor::BackendRegistry;
use restbridge_core::Config;

/// Validate configuration and descriptors without writing output.
///
/// Runs the whole pipeline in memory: every configuration error a
/// generation run would hit is reported here first.
#[derive(Parser)]
pub struct CheckCommand {
    /// Configuration file path.
    #[arg(short, long, default_value = "restbridge.toml")]
    pub config: String,

    /// Directory of backend descriptor files (defaults to descriptors).
    #[arg(short, long)]
    pub schema: Option<String>,
}

impl CheckCommand {
    /// Execute the check command.
    pub fn execute(self) -> Result<()> {
        let schema_dir = self.schema.unwrap_or_else(|| "descriptors".to_string());

        let config = Config::from_file(&self.config)?;
        let registry = BackendRegistry::load_dir(Path::new(&schema_dir))?;
        let (generator, modules) = ClientGenerator::from_config(&config)?;
        let rendered = generator.render(&registry, &modules)?;

        println!(
            "  {} {} backend classes, {} enums, {} modules render cleanly",
            style("✓").green(),
            style(registry.classes().len()).cyan(),
            style(registry.enums().len()).cyan(),
            style(rendered.len()).cyan()
        );
        Ok(())
    }
}
