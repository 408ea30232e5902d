//! Tests for resolve and check subcommands and global flags.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use headshot_core::Sport;

#[test]
fn cli_parse_resolve_minimal() {
    match parse(&["headshot", "resolve", "Jim McMahon"]) {
        CliCommand::Resolve {
            name,
            sport,
            position,
            organization,
            deadline_secs,
        } => {
            assert_eq!(name, "Jim McMahon");
            assert!(sport.is_none());
            assert!(position.is_none());
            assert!(organization.is_none());
            assert!(deadline_secs.is_none());
        }
        _ => panic!("expected Resolve"),
    }
}

#[test]
fn cli_parse_resolve_with_hints() {
    match parse(&[
        "headshot",
        "resolve",
        "Doug Flutie",
        "--sport",
        "nfl",
        "--position",
        "QB",
        "--organization",
        "Boston College",
        "--deadline-secs",
        "20",
    ]) {
        CliCommand::Resolve {
            sport,
            position,
            organization,
            deadline_secs,
            ..
        } => {
            assert_eq!(sport, Some(Sport::Football));
            assert_eq!(position.as_deref(), Some("QB"));
            assert_eq!(organization.as_deref(), Some("Boston College"));
            assert_eq!(deadline_secs, Some(20));
        }
        _ => panic!("expected Resolve with hints"),
    }
}

#[test]
fn cli_parse_resolve_rejects_unknown_sport() {
    assert!(Cli::try_parse_from(["headshot", "resolve", "A B", "--sport", "hockey"]).is_err());
}

#[test]
fn cli_parse_check() {
    match parse(&["headshot", "check", "https://img.test/a.png"]) {
        CliCommand::Check { url } => assert_eq!(url, "https://img.test/a.png"),
        _ => panic!("expected Check"),
    }
}

#[test]
fn cli_parse_global_flags_anywhere() {
    let cli = Cli::try_parse_from([
        "headshot",
        "list",
        "--config",
        "/tmp/h.toml",
        "--db",
        "/tmp/p.db",
        "-v",
    ])
    .unwrap();
    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/h.toml")));
    assert_eq!(cli.db.as_deref(), Some(std::path::Path::new("/tmp/p.db")));
    assert!(cli.verbose);
}

#[test]
fn cli_requires_subcommand() {
    assert!(Cli::try_parse_from(["headshot"]).is_err());
}
