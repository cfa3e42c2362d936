use clap::Parser;

use super::{styled_command, Cli, Commands, SettingsSubcommands};

fn parse(args: &[&str]) -> Cli {
    Cli::parse_from(args)
}

#[test]
fn command_definition_is_consistent() {
    styled_command().debug_assert();
}

#[test]
fn add_parses_kind_amount_and_label() {
    let cli = parse(&["aqua", "add", "medicine", "1", "--label", "Vitamin C"]);
    match cli.command {
        Commands::Add(args) => {
            assert_eq!(args.kind, "medicine");
            assert_eq!(args.amount, Some(1.0));
            assert_eq!(args.label.as_deref(), Some("Vitamin C"));
            assert!(!args.json);
        }
        other => panic!("expected Add, got {:?}", other),
    }
}

#[test]
fn add_amount_is_optional() {
    let cli = parse(&["aqua", "add", "water"]);
    match cli.command {
        Commands::Add(args) => {
            assert_eq!(args.kind, "water");
            assert_eq!(args.amount, None);
            assert_eq!(args.label, None);
        }
        other => panic!("expected Add, got {:?}", other),
    }
}

#[test]
fn add_short_label_flag_parses() {
    let cli = parse(&["aqua", "add", "medicine", "-l", "Ibuprofen"]);
    match cli.command {
        Commands::Add(args) => assert_eq!(args.label.as_deref(), Some("Ibuprofen")),
        other => panic!("expected Add, got {:?}", other),
    }
}

#[test]
fn rm_parses_the_id() {
    let cli = parse(&["aqua", "rm", "0190abcd"]);
    match cli.command {
        Commands::Rm(args) => assert_eq!(args.id, "0190abcd"),
        other => panic!("expected Rm, got {:?}", other),
    }
}

#[test]
fn today_date_and_json_flags_parse() {
    let cli = parse(&["aqua", "today", "--date", "2024-06-01", "--json"]);
    match cli.command {
        Commands::Today(args) => {
            assert_eq!(args.date.as_deref(), Some("2024-06-01"));
            assert!(args.json);
        }
        other => panic!("expected Today, got {:?}", other),
    }
}

#[test]
fn week_ending_flag_parses() {
    let cli = parse(&["aqua", "week", "-e", "2024-06-07"]);
    match cli.command {
        Commands::Week(args) => {
            assert_eq!(args.ending.as_deref(), Some("2024-06-07"));
            assert!(!args.json);
        }
        other => panic!("expected Week, got {:?}", other),
    }
}

#[test]
fn settings_show_parses() {
    let cli = parse(&["aqua", "settings", "show", "-j"]);
    match cli.command {
        Commands::Settings(args) => match args.command {
            SettingsSubcommands::Show(show_args) => assert!(show_args.json),
            other => panic!("expected Show, got {:?}", other),
        },
        other => panic!("expected Settings, got {:?}", other),
    }
}

#[test]
fn settings_set_parses_every_field() {
    let cli = parse(&[
        "aqua", "settings", "set", "--goal", "2500", "--theme", "dark", "--notifications", "off",
        "--wake", "07:30", "--sleep", "23:00",
    ]);
    match cli.command {
        Commands::Settings(args) => match args.command {
            SettingsSubcommands::Set(set_args) => {
                assert_eq!(set_args.goal, Some(2500));
                assert_eq!(set_args.theme.as_deref(), Some("dark"));
                assert_eq!(set_args.notifications.as_deref(), Some("off"));
                assert_eq!(set_args.wake.as_deref(), Some("07:30"));
                assert_eq!(set_args.sleep.as_deref(), Some("23:00"));
            }
            other => panic!("expected Set, got {:?}", other),
        },
        other => panic!("expected Settings, got {:?}", other),
    }
}

#[test]
fn db_path_defaults_and_overrides() {
    let cli = parse(&["aqua", "today"]);
    assert_eq!(cli.db, ".aquahabit/state.sqlite");

    let cli = parse(&["aqua", "-d", "/tmp/custom.sqlite", "today"]);
    assert_eq!(cli.db, "/tmp/custom.sqlite");
}

#[test]
fn completions_shell_is_optional() {
    let cli = parse(&["aqua", "completions"]);
    match cli.command {
        Commands::Completions(args) => {
            assert_eq!(args.shell, None);
            assert!(!args.install);
        }
        other => panic!("expected Completions, got {:?}", other),
    }

    let cli = parse(&["aqua", "completions", "zsh", "--install"]);
    match cli.command {
        Commands::Completions(args) => {
            assert_eq!(args.shell.as_deref(), Some("zsh"));
            assert!(args.install);
        }
        other => panic!("expected Completions, got {:?}", other),
    }
}
