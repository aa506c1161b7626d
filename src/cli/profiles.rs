use anyhow::Result;
use clap::Args;
use feedpilot_core_types::Platform;
use feedpilot_policy_center::PlatformProfile;
use serde_json::json;

use super::context::CliContext;
use super::output::{print_structured, OutputFormat};

#[derive(Args, Clone, Debug)]
pub struct ProfilesArgs {
    /// Only show this platform
    #[arg(long)]
    pub platform: Option<Platform>,
}

pub async fn cmd_profiles(args: ProfilesArgs, ctx: &CliContext, output: OutputFormat) -> Result<()> {
    let snapshot = ctx.policy()?;
    let platforms: Vec<Platform> = match args.platform {
        Some(platform) => vec![platform],
        None => Platform::ALL.to_vec(),
    };
    let profiles: Vec<(Platform, PlatformProfile)> = platforms
        .iter()
        .map(|platform| (*platform, snapshot.profile(*platform)))
        .collect();

    let mut provenance: Vec<_> = snapshot
        .provenance
        .values()
        .filter(|entry| {
            entry.path.starts_with("engine.")
                || platforms
                    .iter()
                    .any(|p| entry.path.starts_with(&format!("profiles.{}.", p.as_str())))
        })
        .collect();
    provenance.sort_by(|a, b| a.path.cmp(&b.path));

    let payload = json!({
        "rev": snapshot.rev,
        "config": ctx.config_path(),
        "engine": &snapshot.engine,
        "profiles": profiles.iter().map(|(p, profile)| (p.as_str(), profile)).collect::<std::collections::BTreeMap<_, _>>(),
        "provenance": provenance,
    });
    if print_structured(&output, &payload)? {
        return Ok(());
    }

    println!("Policy Revision: {}", snapshot.rev);
    println!(
        "Engine → debounce_ms={}, suppression_window_ms={}, toast_duration_ms={}",
        snapshot.engine.debounce_ms,
        snapshot.engine.suppression_window_ms,
        snapshot.engine.toast_duration_ms
    );
    for (platform, profile) in &profiles {
        println!();
        println!("[{}]", platform);
        println!(
            "  method={:?} key={} threshold={}s poll={}ms",
            profile.advance_method,
            profile.advance_key,
            profile.trigger_threshold_secs,
            profile.poll_interval_ms
        );
        match profile.stuck_timeout_ms {
            Some(ms) => println!("  fallback after {}ms", ms),
            None => println!("  fallback disabled"),
        }
        println!(
            "  media={} identity={:?}",
            profile.media_selector, profile.identity_source
        );
        if !profile.next_controls.is_empty() {
            println!("  next controls: {}", profile.next_controls.join(", "));
        }
    }
    println!();
    println!("Provenance:");
    for entry in provenance {
        println!("  {:<45} {:?}", entry.path, entry.source);
    }
    Ok(())
}
