use std::time::{Duration, Instant};

use blogld_core::{AnalysisResult, BlogPostingSchema, ExtractedContent, PipelineObserver, RawPage};
use owo_colors::OwoColorize;

use crate::VERSION;

const TOTAL_STEPS: usize = 4;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!("\n{} {} {}", "blogld".bold().bright_blue(), "v".dimmed(), VERSION.dimmed());
    eprintln!("{}", "Generate BlogPosting JSON-LD from blog posts\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print a labelled detail line under a step
pub fn print_detail(label: &str, value: &str) {
    eprintln!("  {} {}", format!("{}:", label).dimmed(), value.bright_white());
}

/// Print timing information with color coding
pub fn print_timing(label: &str, duration: Duration) {
    let ms = duration.as_secs_f64() * 1000.0;
    let label = format!("{}:", label);

    if ms < 500.0 {
        eprintln!("  {} {:>9.2}ms ({})", label.dimmed(), ms, "fast".dimmed());
    } else if ms < 2000.0 {
        eprintln!("  {} {:>9.2}ms ({})", label.dimmed(), ms, "moderate".bright_yellow());
    } else {
        eprintln!("  {} {:>9.2}ms ({})", label.dimmed(), ms, "slow".bright_red());
    }
}

/// Print timing summary
pub fn print_timing_summary(total: Duration, timings: &[(&str, Duration)]) {
    eprintln!("{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Timing Summary".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());

    for (label, duration) in timings {
        print_timing(label, *duration);
    }

    eprintln!("  {} {:>9.2}ms\n", "Total:".bold().dimmed(), total.as_secs_f64() * 1000.0);
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

fn or_none(value: Option<&str>) -> String {
    value.map_or_else(|| "(none)".to_string(), str::to_string)
}

/// Reports each pipeline stage on stderr as it completes.
///
/// Stage lines and their details are always printed. The timing summary is
/// only shown when `verbose` is set.
pub struct StepReporter {
    verbose: bool,
    started: Instant,
    last: Instant,
    timings: Vec<(&'static str, Duration)>,
}

impl StepReporter {
    pub fn new(verbose: bool) -> Self {
        let now = Instant::now();
        Self { verbose, started: now, last: now, timings: Vec::new() }
    }

    /// Announce the first step before any work starts.
    pub fn start(&self, source: &str) {
        print_step(1, TOTAL_STEPS, &format!("Loading {}", source.bright_white().underline()));
    }

    fn lap(&mut self, label: &'static str) {
        let now = Instant::now();
        self.timings.push((label, now - self.last));
        self.last = now;
    }

    pub fn finish(&self) {
        if self.verbose {
            eprintln!();
            print_timing_summary(self.started.elapsed(), &self.timings);
        }
    }
}

impl PipelineObserver for StepReporter {
    fn on_fetched(&mut self, page: &RawPage) {
        self.lap("Fetch");
        print_detail("Size", &format_size(page.html.len()));
        if page.base_url.as_str() != page.requested_url {
            print_detail("Resolved", page.base_url.as_str());
        }
        eprintln!();
        print_step(2, TOTAL_STEPS, "Extracting fields");
    }

    fn on_extracted(&mut self, content: &ExtractedContent) {
        self.lap("Extract");
        print_detail("Headline", &or_none(content.headline.as_deref()));
        print_detail("Author", &or_none(content.author.as_deref()));
        print_detail("Published", &or_none(content.publish_date.map(|d| d.to_iso8601()).as_deref()));
        print_detail("Image", &or_none(content.image_url.as_deref()));
        eprintln!();
        print_step(3, TOTAL_STEPS, "Analyzing body text");
    }

    fn on_analyzed(&mut self, analysis: &AnalysisResult) {
        self.lap("Analyze");
        print_detail("Words", &analysis.word_count.to_string());
        print_detail("Keywords", &keyword_list(&analysis.keywords));
        eprintln!();
        print_step(4, TOTAL_STEPS, "Building JSON-LD");
    }

    fn on_built(&mut self, schema: &BlogPostingSchema) {
        self.lap("Build");
        print_detail("Type", &schema.kind);
        eprintln!();
    }
}

fn keyword_list(keywords: &[String]) -> String {
    if keywords.is_empty() { "(none)".to_string() } else { keywords.join(", ") }
}
