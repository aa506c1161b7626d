use clap::Subcommand;

use super::profiles::ProfilesArgs;
use super::run::RunArgs;
use super::stats::StatsArgs;
use super::toggle::ToggleArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Open a feed in Chromium and advance it automatically
    Run(RunArgs),

    /// Flip or set the persisted enabled flag
    Toggle(ToggleArgs),

    /// Show how many items were advanced on a given day
    Stats(StatsArgs),

    /// Show effective platform profiles and engine tunables
    Profiles(ProfilesArgs),
}
