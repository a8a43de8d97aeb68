//! Chrome discovery and launch.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use greenchoice_config::BrowserConfig;
use tokio::process::{Child, Command};
use tracing::{info, warn};

use crate::cdp::{CdpClient, CdpError};

/// Polls of `/json/version` while a freshly launched Chrome starts.
const STARTUP_ATTEMPTS: u32 = 30;
const STARTUP_POLL: Duration = Duration::from_millis(200);

/// Find a Chrome or Chromium executable.
pub fn find_chrome() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    let paths: &[&str] = &[
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
    ];

    #[cfg(target_os = "linux")]
    let paths: &[&str] = &[
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
    ];

    #[cfg(target_os = "windows")]
    let paths: &[&str] = &[
        r"C:\Program Files\Google\Chrome\Application\chrome.exe",
        r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    ];

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    let paths: &[&str] = &[];

    paths.iter().map(PathBuf::from).find(|p| p.exists())
}

fn endpoint(config: &BrowserConfig) -> String {
    format!("http://localhost:{}", config.debug_port)
}

fn profile_dir(config: &BrowserConfig) -> PathBuf {
    config.profile_dir.clone().unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".greenchoice")
            .join("browser-profile")
    })
}

/// A Chrome instance reachable over CDP.
///
/// Reuses a browser already listening on the debug port, otherwise launches
/// one with a persistent profile so shop logins survive between runs.
pub struct Browser {
    client: Arc<CdpClient>,
    process: Option<Child>,
}

impl Browser {
    pub async fn launch_or_connect(config: &BrowserConfig) -> Result<Self, CdpError> {
        let endpoint = endpoint(config);

        let process = if is_running(&endpoint).await {
            info!("Chrome already running on port {}", config.debug_port);
            None
        } else {
            info!("Chrome not running on port {}, launching...", config.debug_port);
            let child = launch(config)?;
            wait_until_running(&endpoint).await?;
            Some(child)
        };

        let client = CdpClient::connect(&endpoint).await?;
        info!("Connected to Chrome at {}", endpoint);

        Ok(Self {
            client: Arc::new(client),
            process,
        })
    }

    pub fn client(&self) -> Arc<CdpClient> {
        self.client.clone()
    }

    /// Kill Chrome if this process launched it.
    pub async fn shutdown(mut self) {
        if let Some(mut child) = self.process.take() {
            info!("Shutting down Chrome...");
            if let Err(e) = child.kill().await {
                warn!("Failed to stop Chrome: {}", e);
            }
        }
    }
}

async fn is_running(endpoint: &str) -> bool {
    reqwest::get(&format!("{}/json/version", endpoint))
        .await
        .is_ok()
}

async fn wait_until_running(endpoint: &str) -> Result<(), CdpError> {
    for _ in 0..STARTUP_ATTEMPTS {
        tokio::time::sleep(STARTUP_POLL).await;
        if is_running(endpoint).await {
            return Ok(());
        }
    }
    Err(CdpError::LaunchFailed(
        "Chrome failed to start within timeout".to_string(),
    ))
}

fn launch(config: &BrowserConfig) -> Result<Child, CdpError> {
    let chrome_path = find_chrome().ok_or(CdpError::ChromeNotFound)?;
    let profile_dir = profile_dir(config);

    if let Err(e) = std::fs::create_dir_all(&profile_dir) {
        warn!("Failed to create profile directory: {}", e);
    }

    info!("Launching Chrome with profile at: {}", profile_dir.display());

    let mut cmd = Command::new(&chrome_path);
    cmd.arg(format!("--remote-debugging-port={}", config.debug_port))
        .arg(format!("--user-data-dir={}", profile_dir.display()))
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .arg("--disable-background-networking")
        .arg("--disable-sync")
        .arg("--disable-translate")
        // Background search tabs must keep rendering.
        .arg("--disable-background-timer-throttling")
        .arg("--disable-renderer-backgrounding")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    if config.headless {
        cmd.arg("--headless=new");
    }

    let child = cmd
        .spawn()
        .map_err(|e| CdpError::LaunchFailed(e.to_string()))?;

    info!("Chrome launched with PID: {:?}", child.id());
    Ok(child)
}
