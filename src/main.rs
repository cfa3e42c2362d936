mod app;
mod cli;
mod completions;
mod day;
mod domain;
mod stats;
mod store;
mod ui;

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn print_json(value: &impl serde::Serialize) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).expect("json serialization should work")
    );
}

fn run() -> Result<(), app::AppError> {
    use clap::Parser;
    use cli::{Commands, SettingsSubcommands};
    use domain::settings::{SettingsPatch, Theme};
    use std::str::FromStr;

    let cli = cli::Cli::parse();

    if let Commands::Completions(args) = &cli.command {
        return completions::run_completions_command(args.shell.as_deref(), args.install);
    }

    let app = app::App::open(&cli.db)?;

    match cli.command {
        Commands::Add(args) => {
            let event = app.add_event(&args.kind, args.amount, args.label.as_deref())?;
            if args.json {
                print_json(&event);
            } else {
                ui::print_event_added(&event);
            }
        }
        Commands::Rm(args) => {
            let id = app.resolve_event_id(&args.id)?;
            let removed = app.remove_event(&id)?;
            ui::print_event_removed(&removed);
        }
        Commands::Today(args) => {
            let stats = app.daily_stats(args.date.as_deref())?;
            if args.json {
                print_json(&stats);
            } else {
                ui::print_today(&stats);
            }
        }
        Commands::Week(args) => {
            let week = app.weekly_stats(args.ending.as_deref())?;
            if args.json {
                print_json(&week);
            } else {
                let goal = app.settings()?.goal;
                ui::print_week(&week, goal);
            }
        }
        Commands::Kinds(args) => {
            if args.json {
                print_json(&app.kinds());
            } else {
                ui::print_kinds(app.kinds());
            }
        }
        Commands::Settings(args) => match args.command {
            SettingsSubcommands::Show(show_args) => {
                let settings = app.settings()?;
                if show_args.json {
                    print_json(&settings);
                } else {
                    ui::print_settings(&settings);
                }
            }
            SettingsSubcommands::Set(set_args) => {
                let patch = SettingsPatch {
                    goal: set_args.goal,
                    theme: set_args.theme.as_deref().map(Theme::from_str).transpose()?,
                    notifications_enabled: set_args
                        .notifications
                        .as_deref()
                        .map(parse_on_off)
                        .transpose()?,
                    wake_time: set_args.wake,
                    sleep_time: set_args.sleep,
                };
                let settings = app.update_settings(patch)?;
                ui::print_settings(&settings);
            }
        },
        Commands::Completions(_) => {
            unreachable!("completions are handled before app initialization")
        }
    }

    Ok(())
}

fn parse_on_off(raw: &str) -> Result<bool, app::AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" | "true" => Ok(true),
        "off" | "false" => Ok(false),
        _ => Err(app::AppError::InvalidArgument(format!(
            "unsupported value '{}': use on|off",
            raw
        ))),
    }
}
