use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args, CommandFactory, Parser, Subcommand};

fn cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::BrightCyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightGreen.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::BrightMagenta.on_default())
}

/// The fully-styled command, shared with completions generation.
pub fn styled_command() -> clap::Command {
    Cli::command()
}

#[derive(Debug, Parser)]
#[command(name = "aqua")]
#[command(bin_name = "aqua")]
#[command(version)]
#[command(about = "A local-first hydration tracker")]
#[command(styles = cli_styles())]
pub struct Cli {
    #[arg(
        short = 'd',
        long,
        env = "AQUAHABIT_DB_PATH",
        default_value = ".aquahabit/state.sqlite",
        help = "Path to the local SQLite state database."
    )]
    pub db: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "Log an intake event (water, coffee, tea, soda, juice, medicine).")]
    Add(AddArgs),
    #[command(about = "Remove one logged event by id or unique id prefix.")]
    Rm(RemoveArgs),
    #[command(about = "Show today's hydration progress and timeline.")]
    Today(TodayArgs),
    #[command(about = "Show the 7-day hydration chart.")]
    Week(WeekArgs),
    #[command(about = "List the intake catalog.")]
    Kinds(KindsArgs),
    #[command(about = "Show or change user settings.")]
    Settings(SettingsArgs),
    #[command(about = "Generate or install shell completions.")]
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
#[command(about = "Log an intake event.")]
pub struct AddArgs {
    #[arg(help = "Intake kind id (see `aqua kinds`).")]
    pub kind: String,

    #[arg(help = "Amount in the kind's unit; defaults to the kind's quick-entry amount.")]
    pub amount: Option<f64>,

    #[arg(
        short = 'l',
        long = "label",
        help = "Display label; required for medicine."
    )]
    pub label: Option<String>,

    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
#[command(about = "Remove one logged event.")]
pub struct RemoveArgs {
    #[arg(help = "Event id or unique id prefix.")]
    pub id: String,
}

#[derive(Debug, Args)]
#[command(about = "Daily progress.")]
pub struct TodayArgs {
    #[arg(
        short = 'D',
        long = "date",
        help = "Day to report on (YYYY-MM-DD); defaults to today."
    )]
    pub date: Option<String>,

    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
#[command(about = "7-day chart.")]
pub struct WeekArgs {
    #[arg(
        short = 'e',
        long = "ending",
        help = "Last day of the window (YYYY-MM-DD); defaults to today."
    )]
    pub ending: Option<String>,

    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
#[command(about = "Intake catalog.")]
pub struct KindsArgs {
    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
#[command(about = "Settings commands.")]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsSubcommands,
}

#[derive(Debug, Subcommand)]
pub enum SettingsSubcommands {
    #[command(about = "Show current settings.")]
    Show(SettingsShowArgs),
    #[command(about = "Change one or more settings.")]
    Set(SettingsSetArgs),
}

#[derive(Debug, Args)]
#[command(about = "Show settings.")]
pub struct SettingsShowArgs {
    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
#[command(about = "Change settings.")]
pub struct SettingsSetArgs {
    #[arg(short = 'g', long, help = "Daily hydration goal in milliliters.")]
    pub goal: Option<i64>,

    #[arg(short = 't', long, help = "UI theme: light or dark.")]
    pub theme: Option<String>,

    #[arg(short = 'n', long, help = "Reminders: on or off.")]
    pub notifications: Option<String>,

    #[arg(short = 'w', long = "wake", help = "Reminder window start (HH:MM).")]
    pub wake: Option<String>,

    #[arg(short = 's', long = "sleep", help = "Reminder window end (HH:MM).")]
    pub sleep: Option<String>,
}

#[derive(Debug, Args)]
#[command(about = "Generate or install shell completions.")]
pub struct CompletionsArgs {
    #[arg(help = "Shell name (bash, zsh, fish). Auto-detected if omitted.")]
    pub shell: Option<String>,

    #[arg(
        short = 'i',
        long = "install",
        help = "Write completions to the canonical path for the shell."
    )]
    pub install: bool,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
