use super::env::CliArgs;
use super::profiles::cmd_profiles;
use super::run::cmd_run;
use super::stats::cmd_stats;
use super::toggle::cmd_toggle;
use crate::cli::commands::Commands;
use crate::cli::context::CliContext;
use anyhow::Result;

pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> Result<()> {
    match cli.command.clone() {
        Commands::Run(args) => cmd_run(args, ctx).await,
        Commands::Toggle(args) => cmd_toggle(args, ctx, cli.output.clone()).await,
        Commands::Stats(args) => cmd_stats(args, ctx, cli.output.clone()).await,
        Commands::Profiles(args) => cmd_profiles(args, ctx, cli.output.clone()).await,
    }
}
