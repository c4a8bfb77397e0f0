use clap::Args;
use smokefree_core::{Config, SystemClock};

use super::{open_tracker, parse_quit_instant, report_warnings};

#[derive(Args)]
pub struct SetupArgs {
    /// When you quit (`now`, RFC 3339, or local "YYYY-MM-DD HH:MM")
    #[arg(default_value = "now")]
    pub when: String,
}

pub fn run(args: SetupArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut tracker = open_tracker(&config)?;
    if tracker.is_configured() {
        return Err("quit date already set; use `smokefree reset` to start over".into());
    }

    let quit_instant = parse_quit_instant(&args.when, &SystemClock)?;
    let outcome = tracker.set_initial_quit_date(quit_instant);
    report_warnings(&outcome.warnings);
    println!("{}", serde_json::to_string_pretty(&outcome.event)?);
    Ok(())
}
