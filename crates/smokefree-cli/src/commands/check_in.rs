use smokefree_core::{Config, Event};

use super::{open_configured_tracker, report_warnings};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut tracker = open_configured_tracker(&config)?;

    let outcome = tracker.check_in();
    report_warnings(&outcome.warnings);
    println!("{}", serde_json::to_string_pretty(&outcome.event)?);

    if let Event::CheckInSkipped { next_eligible: Some(next), .. } = outcome.event {
        let local = next.with_timezone(&chrono::Local);
        eprintln!("next check-in at {}", config.display.format_instant(&local));
    }
    Ok(())
}
