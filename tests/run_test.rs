use anyhow::Result;
use clap::Parser;
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};
use tripcal::app::RunOutcome;
use tripcal::cli::Cli;
use tripcal::itinerary::RequiredField;
use tripcal::services::ACCESS_TOKEN_VAR;

#[tokio::test]
async fn test_no_ask_without_credentials_exits_cleanly() -> Result<()> {
    std::env::remove_var(ACCESS_TOKEN_VAR);

    let mut ticket = NamedTempFile::new()?;
    writeln!(ticket, "Thank you for shopping with us\nOrder #12345")?;
    let config_dir = tempdir()?;
    let config_path = config_dir.path().join("config.toml");

    let cli = Cli::try_parse_from([
        "tripcal",
        ticket.path().to_str().unwrap(),
        "--no-ask",
        "--config",
        config_path.to_str().unwrap(),
    ])?;
    let outcome = tripcal::run(&cli).await?;

    assert_eq!(
        outcome,
        RunOutcome::InsufficientData(RequiredField::Departure)
    );
    assert!(config_path.exists());
    Ok(())
}
