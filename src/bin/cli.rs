//! linebook_cli - Generate coloring book pages from the command line
//!
//! Drives the prompt widget against a running linebookd instance and saves
//! each generated page as a PNG file.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use linebookd::widget::{GenerateOutcome, PromptWidget, MAX_PAGES};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Coloring book page generation client
#[derive(Parser, Debug)]
#[command(
    name = "linebook_cli",
    version,
    about = "Generate coloring book pages via linebookd"
)]
struct Args {
    /// Backend generate endpoint
    #[arg(long, default_value = "http://127.0.0.1:8080/generate")]
    backend: String,

    /// Viewport width in logical pixels (picks the page size)
    #[arg(long, default_value_t = 1024)]
    viewport_width: u32,

    /// Directory to save pages into
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Prompts to generate, one page each (at most three)
    prompts: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linebookd=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    if args.prompts.is_empty() {
        bail!("No prompts given. Describe your image, e.g.: linebook_cli \"a happy dolphin\"");
    }
    if !args.output.is_dir() {
        bail!("Output directory not found: {}", args.output.display());
    }

    let mut widget = PromptWidget::new(args.backend, args.viewport_width);

    for prompt in &args.prompts {
        if !widget.can_generate() {
            println!("You have reached the maximum number of images.");
            break;
        }

        widget.prompt = prompt.clone();
        match widget.generate().await {
            GenerateOutcome::Generated => {
                let page_no = widget.pages().len();
                let path = args.output.join(format!("page_{}.png", page_no));
                widget
                    .pages()
                    .iter()
                    .last()
                    .expect("page was just appended")
                    .save(&path)?;
                println!("Generated page {} of {}: {}", page_no, MAX_PAGES, path.display());
            }
            GenerateOutcome::EmptyPrompt => {
                println!("Please enter a prompt.");
            }
            GenerateOutcome::AtCapacity => {
                println!("You have reached the maximum number of images.");
                break;
            }
            GenerateOutcome::Failed => {
                println!(
                    "Error: {}",
                    widget.last_error().unwrap_or("Failed to generate image")
                );
            }
        }
    }

    if widget.review_ready() {
        // Placeholder actions, matching the product mock-up
        println!("Your coloring book is complete!");
        println!("  [Review]   Reviewing coloring book!");
        println!("  [Purchase] Proceeding to purchase!");
    }

    Ok(())
}
