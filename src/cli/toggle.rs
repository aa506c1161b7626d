use anyhow::Result;
use clap::{Args, ValueEnum};
use serde_json::json;

use super::context::CliContext;
use super::output::{print_structured, OutputFormat};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ToggleState {
    On,
    Off,
}

#[derive(Args, Clone, Debug)]
pub struct ToggleArgs {
    /// Target state; flips the current one when omitted
    pub state: Option<ToggleState>,
}

pub async fn cmd_toggle(args: ToggleArgs, ctx: &CliContext, output: OutputFormat) -> Result<()> {
    let store = ctx.store().await?;
    let current = store.get_enabled().await?;
    let enabled = match args.state {
        Some(ToggleState::On) => true,
        Some(ToggleState::Off) => false,
        None => !current,
    };
    store.set_enabled(enabled).await?;

    let payload = json!({ "enabled": enabled, "previous": current });
    if !print_structured(&output, &payload)? {
        println!("Auto advance {}", if enabled { "enabled" } else { "disabled" });
    }
    Ok(())
}
