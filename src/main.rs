use chrono::Utc;
use clap::{Parser, Subcommand};
use cardpress::{config, output, pipeline, scan};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "cardpress")]
#[command(about = "Static blog builder with card-based index pages")]
#[command(long_about = "\
Static blog builder with card-based index pages

Every article becomes a page and a card on the index. Manually configured
cards (search box, image tile, upcoming events) are mixed in at fixed
positions; sticky cards repeat on every index page.

Working folder structure:

  site/
  ├── config.toml                  # Site config (optional)
  ├── justcopyme/                  # Copied verbatim to the output root
  ├── articles/
  │   └── 100650-agentic-frameworks/
  │       ├── content.json         # Title, description, dates, tags
  │       ├── content.md           # Body (content.html wins if present)
  │       └── media/               # Copied to output media/, with -small variants
  ├── standalones/
  │   └── about/                   # Same layout as an article, no index card
  └── cards/
      ├── 010-search/card.json     # {\"template\": \"search\", \"position\": 0, \"sticky\": true}
      └── 050-upcoming/
          ├── card.json            # {\"template\": \"calendar_events\", \"position\": 4}
          └── events/<id>/event.json

Index pages are written as index.html, index-page-2.html, ...

Run 'cardpress gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Working folder
    #[arg(long, default_value = "site", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the site into the output directory (replacing it)
    Build,
    /// Validate content and report index pagination without writing
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            println!("==> Scanning {}", cli.source.display());
            let inventory = scan::scan(&cli.source)?;
            output::print_scan_output(&inventory);

            println!("==> Building {}", cli.output.display());
            init_thread_pool(&inventory.config.processing);
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_build_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = pipeline::build(&inventory, &cli.output, Some(tx));
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            let summary = result?;

            output::print_build_summary(&summary);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let inventory = scan::scan(&cli.source)?;
            output::print_scan_output(&inventory);
            init_thread_pool(&inventory.config.processing);
            let summary = pipeline::check(&inventory, Utc::now())?;
            output::print_check_output(&summary);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; users can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
