//! Playwright browser verification

use std::path::PathBuf;
use std::process::{Command, Stdio};
use serde::Deserialize;
use tokio::process::Command as TokioCommand;
use tracing::{debug, info};

use crate::error::{VerifyError, VerifyResult};

/// One-shot headless browser check: navigate, assert the heading, screenshot
pub struct BrowserCheck {
    base_url: String,
    heading: String,
    nav_timeout_ms: u64,
    visible_timeout_ms: u64,
    screenshot_path: PathBuf,
    viewport_width: u32,
    viewport_height: u32,
    headless: bool,
}

/// JSON result line printed by the generated Playwright script
#[derive(Debug, Deserialize)]
struct ScriptOutcome {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

impl BrowserCheck {
    /// Create a new browser check
    pub fn new(config: BrowserConfig) -> VerifyResult<Self> {
        // Verify playwright is installed
        Self::check_playwright_installed()?;

        // The script runs from a tempdir, so the screenshot path must be absolute
        let screenshot_path = if config.screenshot_path.is_absolute() {
            config.screenshot_path
        } else {
            std::env::current_dir()?.join(config.screenshot_path)
        };

        if let Some(parent) = screenshot_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        Ok(Self {
            base_url: config.base_url,
            heading: config.heading,
            nav_timeout_ms: config.nav_timeout_ms,
            visible_timeout_ms: config.visible_timeout_ms,
            screenshot_path,
            viewport_width: config.viewport_width,
            viewport_height: config.viewport_height,
            headless: config.headless,
        })
    }

    /// Check if Playwright is installed
    fn check_playwright_installed() -> VerifyResult<()> {
        let output = Command::new("npx")
            .args(["playwright", "--version"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match output {
            Ok(status) if status.success() => Ok(()),
            _ => Err(VerifyError::PlaywrightNotFound),
        }
    }

    /// Build the Playwright script for the verification flow
    pub fn build_script(&self) -> String {
        format!(
            r#"
const {{ chromium }} = require('playwright');

(async () => {{
  const browser = await chromium.launch({{ headless: {headless} }});
  const context = await browser.newContext({{
    viewport: {{ width: {width}, height: {height} }}
  }});
  const page = await context.newPage();

  try {{
    await page.goto('{url}', {{ timeout: {nav_timeout} }});
    const heading = page.getByRole('heading', {{ name: '{heading}', exact: true }});
    await heading.waitFor({{ state: 'visible', timeout: {visible_timeout} }});
    await page.screenshot({{ path: '{screenshot}', fullPage: true }});
    console.log(JSON.stringify({{ success: true }}));
  }} catch (error) {{
    console.error(JSON.stringify({{ success: false, error: error.message }}));
    process.exit(1);
  }} finally {{
    await browser.close();
  }}
}})();
"#,
            headless = self.headless,
            width = self.viewport_width,
            height = self.viewport_height,
            url = js_str(&self.base_url),
            nav_timeout = self.nav_timeout_ms,
            heading = js_str(&self.heading),
            visible_timeout = self.visible_timeout_ms,
            screenshot = js_str(&self.screenshot_path.to_string_lossy()),
        )
    }

    /// Run the verification script and validate the resulting screenshot.
    /// Any navigation or assertion failure propagates as an error; this is a
    /// verification gate, not something to swallow.
    pub async fn verify(&self) -> VerifyResult<PathBuf> {
        info!("Launching browser...");
        let script = self.build_script();

        // Write script to temp file and run with node
        let temp_dir = tempfile::tempdir()?;
        let script_path = temp_dir.path().join("verify.js");
        std::fs::write(&script_path, &script)?;

        debug!("Running Playwright script: {}", script_path.display());
        info!("Navigating to {}...", self.base_url);

        let output = TokioCommand::new("node")
            .arg(&script_path)
            .current_dir(temp_dir.path())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VerifyError::Browser(script_error(&stderr)));
        }

        info!("Heading is visible, screenshot taken");
        self.validate_screenshot()?;
        Ok(self.screenshot_path.clone())
    }

    /// The screenshot must exist, be non-empty, and decode as an image
    fn validate_screenshot(&self) -> VerifyResult<()> {
        let meta = std::fs::metadata(&self.screenshot_path).map_err(|_| {
            VerifyError::Screenshot(format!(
                "not written: {}",
                self.screenshot_path.display()
            ))
        })?;

        if meta.len() == 0 {
            return Err(VerifyError::Screenshot(format!(
                "empty file: {}",
                self.screenshot_path.display()
            )));
        }

        let img = image::open(&self.screenshot_path)?;
        debug!(
            "Screenshot {} is {}x{} ({} bytes)",
            self.screenshot_path.display(),
            img.width(),
            img.height(),
            meta.len()
        );
        Ok(())
    }
}

/// Extract the error message from the script's JSON result line, falling back
/// to the raw stderr when no parseable line is present
fn script_error(stderr: &str) -> String {
    for line in stderr.lines().rev() {
        if let Ok(outcome) = serde_json::from_str::<ScriptOutcome>(line) {
            if !outcome.success {
                return outcome
                    .error
                    .unwrap_or_else(|| "script reported failure".to_string());
            }
        }
    }
    format!("script failed:\n{}", stderr.trim())
}

/// Escape a string for embedding in a single-quoted JS literal
fn js_str(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Configuration for the browser check
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub base_url: String,
    pub heading: String,
    pub nav_timeout_ms: u64,
    pub visible_timeout_ms: u64,
    pub screenshot_path: PathBuf,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub headless: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            heading: "Lawn Sprinkler Design".to_string(),
            nav_timeout_ms: 60_000,
            visible_timeout_ms: 15_000,
            screenshot_path: PathBuf::from("verification.png"),
            viewport_width: 1280,
            viewport_height: 720,
            headless: true,
        }
    }
}
