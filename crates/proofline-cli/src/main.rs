mod display;

use std::io::Read;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use proofline_ai::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use proofline_ai::{GeminiClient, GeminiConfig, RetryPolicy, Reviewer};
use proofline_core::{Language, ReviewRequest};
use proofline_sync::{BatchOptions, SheetClient, SheetConfig, run_sheet_review};
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "proofline",
    about = "Objective typo review for Korean and English passages",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Review one passage given as an argument or on stdin
    Review(ReviewArgs),
    /// Review every requested row of a Google Sheets worksheet
    Sheet(SheetArgs),
}

#[derive(Args)]
struct GeminiArgs {
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    gemini_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,
}

impl GeminiArgs {
    fn config(&self) -> anyhow::Result<GeminiConfig> {
        let api_key = self
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .context("GEMINI_API_KEY is not set (export it or pass --api-key)")?;
        let mut config = GeminiConfig::new(api_key)
            .with_model(&self.model)
            .with_base_url(&self.gemini_url);
        config.timeout = Duration::from_secs(self.timeout_secs);
        Ok(config)
    }
}

#[derive(Args)]
struct ReviewArgs {
    /// Language of the passage: ko or en
    #[arg(long, default_value = "ko")]
    lang: Language,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Include the raw reply and before/after reports
    #[arg(long)]
    debug: bool,

    /// Passage to review; reads stdin when absent or `-`
    text: Option<String>,

    #[command(flatten)]
    gemini: GeminiArgs,
}

#[derive(Args)]
struct SheetArgs {
    #[arg(long, env = "PROOFLINE_SPREADSHEET_ID")]
    spreadsheet_id: String,

    #[arg(long, env = "PROOFLINE_WORKSHEET")]
    worksheet: String,

    /// OAuth access token with the spreadsheets scope
    #[arg(long, env = "GOOGLE_ACCESS_TOKEN", hide_env_values = true)]
    access_token: String,

    /// Print every row's raw reply and final result as JSON
    #[arg(long)]
    collect_raw: bool,

    /// Pause between rows in milliseconds
    #[arg(long, default_value_t = 500)]
    pacing_ms: u64,

    #[command(flatten)]
    gemini: GeminiArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("proofline v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Review(args) => review(args).await,
        Command::Sheet(args) => sheet(args).await,
    }
}

async fn review(args: ReviewArgs) -> anyhow::Result<()> {
    let text = match args.text.as_deref() {
        Some(t) if t != "-" => t.to_string(),
        _ => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("reading passage from stdin")?;
            input
        }
    };
    if text.trim().is_empty() {
        warn!("nothing to review: the passage is empty");
        return Ok(());
    }

    let client = GeminiClient::new(args.gemini.config()?).context("building Gemini client")?;
    let reviewer = Reviewer::new(client, RetryPolicy::single_text());
    let sanitized = reviewer
        .review_request(&ReviewRequest::single(text, args.lang))
        .await;

    if args.json {
        let mut out = serde_json::to_value(&sanitized.result)?;
        if args.debug {
            out["debug"] = serde_json::to_value(&sanitized.debug)?;
        }
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", display::render_review(&sanitized.result));
        if args.debug {
            print!("{}", display::render_debug(&sanitized.debug));
        }
    }
    Ok(())
}

async fn sheet(args: SheetArgs) -> anyhow::Result<()> {
    let client = GeminiClient::new(args.gemini.config()?).context("building Gemini client")?;
    let reviewer = Reviewer::new(client, RetryPolicy::batch());
    let store = SheetClient::new(SheetConfig::new(
        &args.spreadsheet_id,
        &args.worksheet,
        &args.access_token,
    ));
    let options = BatchOptions {
        pacing: Duration::from_millis(args.pacing_ms),
        collect_raw: args.collect_raw,
        ..Default::default()
    };

    eprintln!(
        "Reviewing {} / {} with {}",
        args.spreadsheet_id, args.worksheet, args.gemini.model
    );
    let summary = run_sheet_review(&store, &reviewer, &options, |done, total| {
        eprint!("\r  Reviewed {done}/{total}");
        if done == total {
            eprintln!();
        }
    })
    .await
    .with_context(|| format!("reviewing worksheet {:?}", args.worksheet))?;

    eprint!("{}", display::render_summary(&summary));
    if args.collect_raw {
        let raw = json!({ "raw_results": summary.raw_results });
        println!("{}", serde_json::to_string_pretty(&raw)?);
    }
    Ok(())
}
