use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

use linkcheck::cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    linkcheck::utils::logging::init().context("init logging")?;

    let cli = Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        None => linkcheck::commands::run(cli.logs, cli.run).await.context("run")?,
        Some(Command::Check(args)) => linkcheck::commands::check(cli.logs, args)
            .await
            .context("check")?,
        Some(Command::Report) => linkcheck::commands::report(cli.logs).await.context("report")?,
    }

    Ok(())
}
