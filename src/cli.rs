use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use timetable::error::AppError;
use timetable::export;
use timetable::models::{EnrollmentDraft, WEEK, day_code};
use timetable::services::{EnrollmentService, ValidationReport};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Personal class enrollments on a weekly grid",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show every enrollment in display order
    List,
    /// Validate and save a new enrollment
    Add(DraftArgs),
    /// Change fields of an existing enrollment; omitted fields keep their value
    Edit {
        id: String,
        #[command(flatten)]
        fields: DraftArgs,
    },
    /// Delete an enrollment
    Remove { id: String },
    /// Validate an enrollment without saving it
    Check(DraftArgs),
    /// Write all enrollments as CSV
    Export {
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Show where each class lands on the week grid
    Week,
}

#[derive(Args, Debug, Default)]
pub struct DraftArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub major: Option<String>,
    #[arg(long)]
    pub year: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    #[arg(long)]
    pub course_code: Option<String>,
    #[arg(long)]
    pub course_name: Option<String>,
    /// Mon, Tue, Wed, Thu, Fri, Sat or Sun
    #[arg(long)]
    pub day: Option<String>,
    /// HH:MM
    #[arg(long)]
    pub start: Option<String>,
    /// HH:MM
    #[arg(long)]
    pub end: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
}

impl DraftArgs {
    fn apply(self, mut draft: EnrollmentDraft) -> EnrollmentDraft {
        let fields = [
            (self.name, &mut draft.name),
            (self.email, &mut draft.email),
            (self.major, &mut draft.major),
            (self.year, &mut draft.year),
            (self.notes, &mut draft.notes),
            (self.course_code, &mut draft.course_code),
            (self.course_name, &mut draft.course_name),
            (self.day, &mut draft.day),
            (self.start, &mut draft.start),
            (self.end, &mut draft.end),
            (self.location, &mut draft.location),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
        draft
    }
}

pub async fn run(cli: Cli, service: &EnrollmentService) -> Result<(), AppError> {
    match cli.command {
        Command::List => {
            let records = service.list().await;
            if records.is_empty() {
                println!("No enrollments yet.");
            }
            for r in export::presentation_order(&records) {
                let when = match (r.day, r.start, r.end) {
                    (Some(day), Some(start), Some(end)) => {
                        format!("{} {}-{}", day_code(day), start, end)
                    }
                    _ => "-".to_string(),
                };
                let conflict = if service.conflicts(r, Some(r.id.as_str())).await {
                    " [conflict]"
                } else {
                    ""
                };
                println!(
                    "{}  {:<24} {:<10} {:<16} {}{}",
                    r.id, r.name, r.course_code, when, r.location, conflict
                );
            }
        }
        Command::Add(fields) => {
            let saved = service.add(&fields.apply(EnrollmentDraft::default())).await?;
            println!("Saved {}", saved.enrollment.id);
            if let Some(warning) = saved.conflict_warning {
                println!("Warning: {}", warning);
            }
        }
        Command::Edit { id, fields } => {
            let current = service.get(&id).await?;
            let saved = service.replace(&id, &fields.apply(current.to_draft())).await?;
            println!("Updated {}", saved.enrollment.id);
            if let Some(warning) = saved.conflict_warning {
                println!("Warning: {}", warning);
            }
        }
        Command::Remove { id } => {
            service.remove(&id).await?;
            println!("Removed {}", id);
        }
        Command::Check(fields) => {
            let draft = fields.apply(EnrollmentDraft::default());
            let report = service.validate(&draft, None).await;
            print_report(&report);
        }
        Command::Export { output } => {
            let csv = service.export_csv().await?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, csv).await?;
                    println!("Wrote {}", path.display());
                }
                None => println!("{}", csv),
            }
        }
        Command::Week => {
            let view = service.week_view().await;
            let marks: Vec<String> = view.hour_marks.iter().map(|h| format!("{h:02}:00")).collect();
            println!("Grid {} units tall, lines at {}", view.grid_height, marks.join(" "));
            for day in WEEK {
                let column: Vec<_> = view
                    .blocks
                    .iter()
                    .filter(|b| b.placement.column == day)
                    .collect();
                if column.is_empty() {
                    continue;
                }
                println!("{}", day_code(day));
                for b in column {
                    let mark = if b.conflicted { " !" } else { "" };
                    println!(
                        "  {:<16} top={:>7.1} height={:>6.1}{}",
                        b.label, b.placement.top, b.placement.height, mark
                    );
                }
            }
        }
    }
    Ok(())
}

fn print_report(report: &ValidationReport) {
    if report.field_errors.is_empty() {
        println!("OK");
    }
    for (field, message) in &report.field_errors {
        println!("{}: {}", field, message);
    }
    if let Some(warning) = &report.conflict_warning {
        println!("Warning: {}", warning);
    }
}
