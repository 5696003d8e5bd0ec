use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::Context;
use blogld_core::{AnalyzeConfig, FetchConfig, Pipeline, PipelineConfig, PipelineObserver, read_file};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

mod echo;

use echo::{StepReporter, print_banner, print_info, print_success, print_warning};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generate schema.org BlogPosting JSON-LD for a blog post
#[derive(Parser, Debug)]
#[command(name = "blogld")]
#[command(author = "blogld Contributors")]
#[command(version)]
#[command(about = "Generate schema.org BlogPosting JSON-LD for a blog post", long_about = None)]
struct Args {
    /// Absolute URL of the blog post
    #[arg(value_name = "URL", required_unless_present = "completions")]
    url: Option<String>,

    /// API key for AI keyword generation (falls back to GEMINI_API_KEY)
    #[arg(long, env = "BLOGLD_API_KEY", hide_env_values = true, value_name = "KEY")]
    api_key: Option<String>,

    /// Read the page from a local HTML file instead of fetching URL
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the JSON-LD on a single line
    #[arg(long)]
    compact: bool,

    /// Wrap the JSON-LD in a <script type="application/ld+json"> tag
    #[arg(long, conflicts_with = "compact")]
    script_tag: bool,

    /// Page fetch timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Keyword request timeout in seconds
    #[arg(long, default_value = "20", value_name = "SECS")]
    ai_timeout: u64,

    /// Custom User-Agent for the page request
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Model used for keyword generation
    #[arg(long, value_name = "NAME")]
    model: Option<String>,

    /// Base URL of an OpenAI-compatible keyword API
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Maximum number of keywords to keep
    #[arg(long, default_value = "10", value_name = "NUM")]
    max_keywords: usize,

    /// Include articleBody in the output
    #[arg(long)]
    article_body: bool,

    /// Enable debug logging and progress output
    #[arg(short, long)]
    verbose: bool,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL", exclusive = true)]
    completions: Option<Shell>,
}

impl Args {
    fn pipeline_config(&self) -> PipelineConfig {
        let fetch_defaults = FetchConfig::default();
        let analyze_defaults = AnalyzeConfig::default();

        PipelineConfig::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.clone().unwrap_or(fetch_defaults.user_agent))
            .ai_timeout(self.ai_timeout)
            .model(self.model.clone().unwrap_or(analyze_defaults.model))
            .endpoint(self.endpoint.clone().unwrap_or(analyze_defaults.endpoint))
            .max_keywords(self.max_keywords)
            .include_article_body(self.article_body)
            .build()
    }

    fn api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }
}

/// Analysis warnings are printed by `print_warning`, so the core's own
/// warn-level records are hidden unless `--verbose` or `RUST_LOG` asks for them.
fn init_tracing(verbose: bool) {
    let default = if verbose { "warn,blogld_core=debug" } else { "warn,blogld_core=error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).with_target(false).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "blogld", &mut io::stdout());
        return Ok(());
    }

    init_tracing(args.verbose);

    let url = args.url.clone().context("a URL is required")?;

    if args.verbose {
        print_banner();
        print_info("Debug logging enabled");
        eprintln!();
    }

    let pipeline = Pipeline::new(args.pipeline_config());
    let api_key = args.api_key();
    let mut reporter = StepReporter::new(args.verbose);

    let output = match &args.input {
        Some(path) => {
            reporter.start(&path.display().to_string());
            let page = read_file(path, &url).with_context(|| format!("Failed to read {}", path.display()))?;
            reporter.on_fetched(&page);
            pipeline.run_page(&page, api_key.as_deref(), &mut reporter).await
        }
        None => {
            reporter.start(&url);
            pipeline.run(&url, api_key.as_deref(), &mut reporter).await
        }
    }
    .with_context(|| format!("Failed to generate schema for {}", url))?;

    reporter.finish();

    for warning in &output.warnings {
        print_warning(&warning.to_string());
    }

    let rendered = if args.script_tag {
        output.schema.to_script_tag()
    } else {
        output.schema.to_json(!args.compact)
    }
    .context("Failed to serialize schema")?;

    match args.output {
        Some(path) => {
            fs::write(&path, format!("{}\n", rendered))
                .with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            println!("{}", rendered);
        }
    }

    Ok(())
}
