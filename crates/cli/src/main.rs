use chrono::{Duration, Local, NaiveDate};
use clap::{Parser, Subcommand};
use shiftcal_core::{
    constants::DEFAULT_WEEKS_AHEAD, generate_calendar, resolve_template_file, CalendarError,
    ShiftId, ShiftTemplate,
};
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shiftcal")]
#[command(about = "Shift calendar feed generator CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an iCalendar feed from a rotation template
    Generate {
        /// Rotation template CSV (searched for when omitted)
        #[arg(long)]
        template: Option<PathBuf>,
        /// Start date, YYYY-MM-DD (default: today)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// End date, YYYY-MM-DD, exclusive (default: --weeks after start)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Horizon in weeks when --to is omitted
        #[arg(long, default_value_t = DEFAULT_WEEKS_AHEAD)]
        weeks: u32,
        /// Restrict the feed to a shift number (repeatable)
        #[arg(long = "shift")]
        shifts: Vec<u8>,
        /// Output file (stdout when omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Validate a rotation template and report its shape
    Validate {
        /// Rotation template CSV (searched for when omitted)
        #[arg(long)]
        template: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Generate {
            template,
            from,
            to,
            weeks,
            shifts,
            output,
        }) => {
            let template_file = resolve_template_file(template)?;
            let from = from.unwrap_or_else(|| Local::now().date_naive());
            let to = match to {
                Some(to) => to,
                None => from + Duration::weeks(i64::from(weeks)),
            };

            let mut selected = BTreeSet::new();
            for number in &shifts {
                selected.insert(ShiftId::new(*number)?);
            }
            let selected = if selected.is_empty() {
                None
            } else {
                Some(&selected)
            };

            match generate_calendar(&template_file, from, to, selected) {
                Ok(calendar) => {
                    let ical = calendar.to_ical();
                    match output {
                        Some(path) => {
                            fs::write(&path, ical).map_err(|source| {
                                CalendarError::CalendarWrite { path, source }
                            })?;
                        }
                        None => print!("{ical}"),
                    }
                }
                Err(e) => eprintln!("Error generating calendar: {e}"),
            }
        }
        Some(Commands::Validate { template }) => {
            let template_file = resolve_template_file(template)?;
            match ShiftTemplate::from_csv_file(&template_file) {
                Ok(template) => println!(
                    "Template OK: {} rotation day(s) in {}",
                    template.cycle_len(),
                    template_file.display()
                ),
                Err(e) => eprintln!("Error validating template: {e}"),
            }
        }
        None => {
            println!("Use 'shiftcal --help' for commands");
        }
    }

    Ok(())
}
