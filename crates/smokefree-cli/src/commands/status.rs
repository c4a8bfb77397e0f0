use chrono::{DateTime, Local, Utc};
use clap::Args;
use smokefree_core::{Config, MilestoneTarget, TrackerSnapshot};

use super::open_configured_tracker;

#[derive(Args)]
pub struct StatusArgs {
    /// Print the full snapshot as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let tracker = open_configured_tracker(&config)?;
    let snapshot = tracker.snapshot();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", render(&snapshot, &config));
    }
    Ok(())
}

fn render(s: &TrackerSnapshot, config: &Config) -> String {
    let fmt = |at: DateTime<Utc>| config.display.format_instant(&at.with_timezone(&Local));
    let mut out = String::new();

    let days_label = if s.elapsed_days == 1 { "day" } else { "days" };
    out.push_str(&format!(
        "Smoke-free since {} ({} {})\n",
        fmt(s.quit_instant),
        s.elapsed_days,
        days_label
    ));
    out.push_str(&format!(
        "Elapsed:   {}h {:02}m {:02}s\n",
        s.elapsed.hours, s.elapsed.minutes, s.elapsed.seconds
    ));

    let check_in = if s.has_checked_in_today {
        "done today".to_string()
    } else if s.can_check_in {
        "available now".to_string()
    } else {
        "not yet".to_string()
    };
    out.push_str(&format!("Check-in:  {check_in}\n"));
    if let Some(next) = s.next_eligible {
        out.push_str(&format!("Next:      {}\n", fmt(next)));
    }
    out.push_str(&format!("Check-ins: {}\n", s.check_in_count));

    let target = match s.milestone.target {
        MilestoneTarget::Days(n) => format!("{n}-day milestone"),
        MilestoneTarget::Years(n) => format!("year {n}"),
    };
    out.push_str(&format!(
        "Progress:  {:.0}% toward {}\n",
        s.milestone.progress * 100.0,
        target
    ));

    if config.display.show_health_benefits {
        out.push_str("Health:\n");
        for benefit in &s.health_benefits {
            out.push_str(&format!("  + {}\n", benefit.description()));
        }
        if let Some(next) = s.next_health_benefit {
            out.push_str(&format!(
                "  next after {} days: {}\n",
                next.threshold_days(),
                next.description()
            ));
        }
    }
    out
}
