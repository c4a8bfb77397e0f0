use clap::Args;
use smokefree_core::{Config, SystemClock};

use super::{open_tracker, parse_quit_instant, report_warnings};

#[derive(Args)]
pub struct ResetArgs {
    /// New quit instant (`now`, RFC 3339, or local "YYYY-MM-DD HH:MM")
    #[arg(default_value = "now")]
    pub when: String,
}

pub fn run(args: ResetArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut tracker = open_tracker(&config)?;

    let quit_instant = parse_quit_instant(&args.when, &SystemClock)?;
    let outcome = tracker.reset(quit_instant);
    report_warnings(&outcome.warnings);
    println!("{}", serde_json::to_string_pretty(&outcome.event)?);
    Ok(())
}
