/// AutoFlow Hub: marketplace backend for n8n workflow templates
/// 
/// Main entry point. Serves the REST API by default and exposes the library
/// maintenance commands (import, verify, list).

use anyhow::Result;
use autoflow_hub::{
    catalog::CatalogStorage, config::Config, server, ImportReport, LibraryImporter,
};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "autoflow-hub")]
#[command(about = "AutoFlow Hub marketplace API and workflow library tools")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve,

    /// Import n8n workflow exports from the library directory
    Import {
        /// Library directory (defaults to AUTOFLOW_LIBRARY_DIR)
        #[arg(long)]
        dir: Option<String>,
    },

    /// Report free / paid workflow counts
    Verify,

    /// List workflows by title
    List,
}

/// Application entry point
/// 
/// Loads `.env`, initializes logging and dispatches the selected command.
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    server::init_tracing();

    let cli = Cli::parse();
    let config = Config::default();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => server::start_server(config).await,
        Commands::Import { dir } => {
            let storage = CatalogStorage::connect(&config.database.path).await?;
            let dir = dir.unwrap_or(config.library.dir);
            let importer = LibraryImporter::new(storage.clone(), dir);
            let report = importer.import_all().await?;
            print_import_report(&importer, &report);
            storage.close().await;
            Ok(())
        }
        Commands::Verify => {
            let storage = CatalogStorage::connect(&config.database.path).await?;
            verify(&storage).await?;
            storage.close().await;
            Ok(())
        }
        Commands::List => {
            let storage = CatalogStorage::connect(&config.database.path).await?;
            let entries = storage.list_entries().await?;

            println!("\n=== WORKFLOWS IN DATABASE ===\n");
            for entry in &entries {
                println!("ID: {:>2} | Title: \"{}\"", entry.id, entry.title);
            }
            println!("\nTotal: {} workflows", entries.len());
            storage.close().await;
            Ok(())
        }
    }
}

fn print_import_report(importer: &LibraryImporter, report: &ImportReport) {
    if report.files == 0 {
        println!("ℹ️  No workflow files found in {}", importer.dir().display());
        println!("   Add n8n workflow .json files there and run `autoflow-hub import` again.");
        return;
    }

    println!("=========================================");
    println!("📊 Import Summary:");
    println!("=========================================");
    println!("✅ Success: {}/{}", report.success, report.files);
    println!("   ├─ Created: {}", report.created);
    println!("   └─ Updated: {}", report.updated);

    if report.failed > 0 {
        println!("❌ Failed: {}", report.failed);
        println!();
        println!("Errors:");
        for (file, error) in &report.errors {
            println!("   • {}: {}", file, error);
        }
    }
}

async fn verify(storage: &CatalogStorage) -> Result<()> {
    let counts = storage.counts().await?;

    println!("Total workflows: {}", counts.total);
    println!("Paid workflows: {}", counts.paid);
    println!("Free workflows: {}\n", counts.free);

    if counts.paid > 0 {
        println!("❌ ERROR: Found paid workflows!");
        for entry in storage.list_paid().await? {
            println!("  - {}: ₪{}", entry.title, entry.price);
        }
    } else {
        println!("✅ SUCCESS: All workflows are FREE!");
    }

    Ok(())
}
