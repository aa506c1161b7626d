use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Args;

use super::context::CliContext;
use super::output::{print_structured, OutputFormat};

#[derive(Args, Clone, Debug)]
pub struct StatsArgs {
    /// Day to report (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

pub async fn cmd_stats(args: StatsArgs, ctx: &CliContext, output: OutputFormat) -> Result<()> {
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let store = ctx.store().await?;
    let analytics = store.daily_analytics(date).await?;

    if print_structured(&output, &analytics)? {
        return Ok(());
    }

    println!("{}: {} advanced", analytics.date, analytics.total);
    for (platform, count) in &analytics.per_platform {
        println!("  {:<10} {}", platform, count);
    }
    Ok(())
}
