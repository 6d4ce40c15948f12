use anyhow::Result;
use clap::{CommandFactory, Parser};
use log::{error, info};
use tripcal::app::RunOutcome;
use tripcal::cli::{Cli, FlagError};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tripcal::init_logger();

    let cli = Cli::parse();
    info!("Starting tripcal");

    match tripcal::run(&cli).await {
        Ok(RunOutcome::Submitted(link)) => info!("Event created: {}", link),
        Ok(RunOutcome::Declined) => info!("Event creation declined"),
        Ok(RunOutcome::InsufficientData(field)) => info!("Stopped without a {}", field),
        Err(err) => {
            // Malformed flag values are usage errors, reported the way clap reports them
            if let Some(flag_err) = err.downcast_ref::<FlagError>() {
                Cli::command()
                    .error(clap::error::ErrorKind::ValueValidation, flag_err)
                    .exit();
            }
            error!("{:#}", err);
            return Err(err);
        }
    }
    Ok(())
}
