use std::fs;
use std::sync::Arc;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use feedpilot_action_primitives::{ActionError, PageDriver};
use futures::StreamExt;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::CdpConfig;
use crate::error::{AdapterError, AdapterErrorKind};

/// One launched browser with a single active page.
pub struct ChromiumSession {
    browser: Mutex<Browser>,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl ChromiumSession {
    /// Launch Chromium and open `url` in a fresh page.
    pub async fn launch(cfg: &CdpConfig, url: &str) -> Result<Arc<Self>, AdapterError> {
        let browser_config = browser_config(cfg)?;
        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|err| {
            AdapterError::new(AdapterErrorKind::Launch).with_hint(err.to_string())
        })?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    debug!(target: "cdp-adapter", "handler stopped: {err}");
                    break;
                }
            }
        });

        let page = browser.new_page(url).await.map_err(|err| {
            AdapterError::new(AdapterErrorKind::CdpIo)
                .with_hint(format!("failed to open {url}: {err}"))
        })?;
        info!(target: "cdp-adapter", url, headless = cfg.headless, "page opened");

        Ok(Arc::new(Self {
            browser: Mutex::new(browser),
            page,
            handler_task,
        }))
    }

    async fn evaluate_value(&self, script: &str) -> Result<Value, AdapterError> {
        let result = self.page.evaluate(script).await.map_err(|err| {
            AdapterError::new(AdapterErrorKind::Evaluation).with_hint(err.to_string())
        })?;
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }

    /// Close the browser and stop the protocol handler.
    pub async fn shutdown(&self) {
        let mut browser = self.browser.lock().await;
        if let Err(err) = browser.close().await {
            warn!(target: "cdp-adapter", "browser close failed: {err}");
        }
        if let Err(err) = browser.wait().await {
            debug!(target: "cdp-adapter", "browser wait failed: {err}");
        }
        self.handler_task.abort();
    }
}

#[async_trait]
impl PageDriver for ChromiumSession {
    async fn evaluate(&self, script: &str) -> Result<Value, ActionError> {
        self.evaluate_value(script).await.map_err(ActionError::from)
    }
}

fn browser_config(cfg: &CdpConfig) -> Result<BrowserConfig, AdapterError> {
    if !cfg.executable.as_os_str().is_empty() && !cfg.executable.exists() {
        return Err(AdapterError::new(AdapterErrorKind::Launch).with_hint(format!(
            "chrome executable not found at {} (set FEEDPILOT_CHROME to the full path of chrome/chromium)",
            cfg.executable.display()
        )));
    }

    let profile_dir = if cfg.user_data_dir.is_absolute() {
        cfg.user_data_dir.clone()
    } else {
        let cwd = std::env::current_dir().map_err(|err| {
            AdapterError::new(AdapterErrorKind::Internal)
                .with_hint(format!("failed to resolve cwd for user-data-dir: {err}"))
        })?;
        cwd.join(&cfg.user_data_dir)
    };
    fs::create_dir_all(&profile_dir).map_err(|err| {
        AdapterError::new(AdapterErrorKind::Internal)
            .with_hint(format!("failed to ensure user-data-dir: {err}"))
    })?;

    let mut builder = BrowserConfig::builder()
        .request_timeout(cfg.request_timeout())
        .launch_timeout(cfg.launch_timeout());

    if !cfg.headless {
        builder = builder.with_head();
    }
    if cfg.no_sandbox {
        builder = builder.no_sandbox();
    }

    let mut args = vec![
        "--disable-background-timer-throttling",
        "--disable-backgrounding-occluded-windows",
        "--disable-renderer-backgrounding",
        "--autoplay-policy=no-user-gesture-required",
        "--no-first-run",
        "--no-default-browser-check",
        "--password-store=basic",
    ];
    if cfg.headless {
        args.push("--headless=new");
        args.push("--mute-audio");
    }
    builder = builder.args(args);

    if !cfg.executable.as_os_str().is_empty() {
        builder = builder.chrome_executable(cfg.executable.clone());
    }
    builder = builder.user_data_dir(profile_dir);

    builder.build().map_err(|err| {
        AdapterError::new(AdapterErrorKind::Internal).with_hint(format!("browser config error: {err}"))
    })
}
