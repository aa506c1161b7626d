use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use cdp_adapter::{CdpConfig, ChromiumSession};
use clap::Args;
use feedpilot_action_primitives::{PageDriver, ScriptActuator};
use feedpilot_cli::{EnabledFlag, PageToastSink, StoreCounterSink};
use feedpilot_core_types::Platform;
use feedpilot_engine::{ControlMessage, ControlSender, EngineRunner, Evaluator};
use feedpilot_policy_center::PolicyView;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::context::CliContext;

#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    /// Feed address to open
    pub url: String,

    /// Platform profile to use instead of detecting it from the address
    #[arg(long)]
    pub platform: Option<Platform>,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,

    /// Chrome/Chromium executable
    #[arg(long, value_name = "PATH")]
    pub chrome: Option<PathBuf>,
}

pub async fn cmd_run(args: RunArgs, ctx: &CliContext) -> Result<()> {
    url::Url::parse(&args.url).with_context(|| format!("invalid feed address: {}", args.url))?;
    let platform = args.platform.unwrap_or_else(|| Platform::detect(&args.url));

    let policy = ctx.policy()?;
    let view = PolicyView::for_platform(&policy, platform);
    info!(
        platform = %platform,
        policy_rev = view.rev,
        method = ?view.profile.advance_method,
        "resolved platform profile"
    );

    let store = ctx.engine_store().await;
    let enabled = match store.get_enabled().await {
        Ok(enabled) => enabled,
        Err(err) => {
            warn!("failed to read enabled flag, assuming enabled: {err}");
            true
        }
    };

    let browser = browser_config(ctx.config().browser.clone(), &args);
    let session = ChromiumSession::launch(&browser, &args.url)
        .await
        .context("failed to start browser session")?;
    let driver: Arc<dyn PageDriver> = session.clone();

    let flag = EnabledFlag::new(enabled);
    let evaluator = Evaluator::new(
        platform,
        view.profile.clone(),
        &view.engine,
        enabled,
        Arc::new(ScriptActuator::new(driver.clone())),
        Arc::new(StoreCounterSink::new(store)),
        Arc::new(PageToastSink::new(
            driver.clone(),
            platform,
            view.engine.toast_duration(),
            flag.clone(),
        )),
        Instant::now(),
    );

    let shutdown = CancellationToken::new();
    let (runner, control_tx) = EngineRunner::new(evaluator, driver, shutdown.clone());

    let relay = tokio::spawn(relay_stdin(control_tx, flag));
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received, stopping engine");
        }
        signal_token.cancel();
    });

    let summary = runner.run().await;
    relay.abort();
    session.shutdown().await;

    println!(
        "Stopped after {} ticks: {} advanced on completion, {} by fallback, {} failed actuations",
        summary.ticks,
        summary.completion_advances,
        summary.fallback_advances,
        summary.actuation_failures
    );
    Ok(())
}

fn browser_config(mut cfg: CdpConfig, args: &RunArgs) -> CdpConfig {
    let env = CdpConfig::from_env();
    if let Some(chrome) = &args.chrome {
        cfg.executable = chrome.clone();
    } else if cfg.executable.as_os_str().is_empty() {
        cfg.executable = env.executable;
    }
    cfg.headless |= args.headless;
    cfg.no_sandbox |= env.no_sandbox;
    cfg
}

/// Forward `{"enabled": bool}` lines from stdin to the running engine.
async fn relay_stdin(control_tx: ControlSender, flag: EnabledFlag) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match serde_json::from_str::<ControlMessage>(line) {
                    Ok(message) => {
                        flag.set(message.enabled);
                        if control_tx.send(message).await.is_err() {
                            break;
                        }
                    }
                    Err(err) => warn!("ignoring control line {line:?}: {err}"),
                }
            }
            Ok(None) => break,
            Err(err) => {
                warn!("stdin closed: {err}");
                break;
            }
        }
    }
}
