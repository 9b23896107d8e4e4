use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use restbridge_codegen::{ClientGenerator, GenerationSummary};
use restbridge_core::descriptor::BackendRegistry;
use restbridge_core::Config;

/// Generate TypeScript client code.
#[derive(Parser)]
pub struct GenerateCommand {
    /// Configuration file path.
    #[arg(short, long, default_value = "restbridge.toml")]
    pub config: String,

    /// Directory of backend descriptor files (defaults to descriptors).
    #[arg(short, long)]
    pub schema: Option<String>,

    /// Output directory (defaults to the current directory).
    #[arg(short, long)]
    pub output: Option<String>,
}

impl GenerateCommand {
    /// Execute the generate command.
    pub fn execute(self) -> Result<()> {
        let schema_dir = self.schema.unwrap_or_else(|| "descriptors".to_string());
        let output_dir = self
            .output
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let pb = ProgressBar::new(4);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(100));

        pb.set_message("Loading configuration...");
        let config = Config::from_file(&self.config)?;
        pb.inc(1);

        pb.set_message("Loading backend descriptors...");
        let registry = BackendRegistry::load_dir(Path::new(&schema_dir))?;
        pb.inc(1);

        pb.set_message("Converting type model...");
        let (generator, modules) = ClientGenerator::from_config(&config)?;
        pb.inc(1);

        pb.set_message("Writing modules...");
        let summary = generator.generate_to_dir(&registry, &modules, &output_dir)?;
        pb.inc(1);

        pb.finish_with_message("Done!");

        print_summary(&summary, &registry, &output_dir);
        Ok(())
    }
}

fn print_summary(summary: &GenerationSummary, registry: &BackendRegistry, output_dir: &Path) {
    println!();
    println!(
        "  {} Generated {} modules from {} backend classes",
        style("✓").green(),
        style(summary.modules).cyan(),
        style(registry.classes().len()).cyan()
    );
    println!(
        "  {} {} classes, {} enums",
        style("✓").green(),
        style(summary.classes).cyan(),
        style(summary.enums).cyan()
    );
    println!(
        "  {} Output: {}",
        style("📁").dim(),
        style(output_dir.display()).cyan()
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CONFIG: &str = r#"
        [[modules]]
        package = "com.shop.model"
        name = "model"
        path = "sdk/model"

        [[modules]]
        package = "com.shop.ctrl"
        name = "services"
        path = "sdk/services"

        [names]
        rest = { substitute = { from = "Ctrl", to = "Service" } }
    "#;

    const DESCRIPTOR: &str = r#"{
        "classes": [
            {"package": "com.shop.model", "name": "Order",
             "fields": [{"name": "id", "type": "long"}]},
            {"package": "com.shop.ctrl", "name": "OrderCtrl",
             "endpoint": {"paths": ["/orders"]},
             "methods": [
                 {"name": "list",
                  "return_type": "list<com.shop.model.Order>",
                  "endpoint": {"methods": ["GET"], "paths": ["/all"]}}
             ]}
        ]
    }"#;

    #[test]
    fn test_generate_end_to_end() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("restbridge.toml");
        std::fs::write(&config_path, CONFIG).unwrap();
        let schema_dir = dir.path().join("descriptors");
        std::fs::create_dir_all(&schema_dir).unwrap();
        std::fs::write(schema_dir.join("shop.json"), DESCRIPTOR).unwrap();
        let out_dir = dir.path().join("out");

        let cmd = GenerateCommand {
            config: config_path.to_string_lossy().into_owned(),
            schema: Some(schema_dir.to_string_lossy().into_owned()),
            output: Some(out_dir.to_string_lossy().into_owned()),
        };
        cmd.execute().unwrap();

        let services =
            std::fs::read_to_string(out_dir.join("sdk/services/services.ts")).unwrap();
        assert!(services.contains("export class OrderService {"));
        assert!(services.contains("list(): Observable<Order[]> {"));
        assert!(services.contains("request('GET', '/orders/all')"));
        assert!(std::fs::read_to_string(out_dir.join("sdk/model/model.ts"))
            .unwrap()
            .contains("export class Order {"));
    }

    #[test]
    fn test_generate_missing_config_fails() {
        let dir = tempdir().unwrap();
        let cmd = GenerateCommand {
            config: dir
                .path()
                .join("absent.toml")
                .to_string_lossy()
                .into_owned(),
            schema: None,
            output: None,
        };
        assert!(cmd.execute().is_err());
    }
}
