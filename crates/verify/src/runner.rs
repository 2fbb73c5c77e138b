//! Linear verification flow: server start, compile gate, browser check

use tracing::{error, info};

use crate::browser::{BrowserCheck, BrowserConfig};
use crate::error::VerifyResult;
use crate::server::{DevServerConfig, DevServerHandle};

/// The end-to-end verification run. Three states, strictly forward:
/// server starting, server compiled, browser verified. A failure at any
/// state short-circuits; the dev server is stopped on every path.
pub struct Verification {
    server_config: DevServerConfig,
    browser_config: BrowserConfig,
}

impl Verification {
    /// Create a verification run with default configuration
    pub fn new() -> Self {
        Self::with_config(DevServerConfig::default(), BrowserConfig::default())
    }

    /// Create a verification run with custom configuration
    pub fn with_config(server_config: DevServerConfig, browser_config: BrowserConfig) -> Self {
        Self {
            server_config,
            browser_config,
        }
    }

    /// Run the full flow. `Ok(false)` means the server never compiled (the
    /// browser is not launched); browser failures propagate as errors.
    pub async fn run(&self) -> VerifyResult<bool> {
        let mut server = DevServerHandle::spawn(&self.server_config)?;

        // The handle's Drop also stops the server, so cleanup holds even if
        // this future is dropped mid-flight.
        let outcome = self.verify_against(&server).await;
        server.stop();

        match &outcome {
            Ok(true) => info!("Verification succeeded"),
            Ok(false) => error!("Verification failed: server did not compile"),
            Err(e) => error!("Verification failed: {}", e),
        }

        outcome
    }

    async fn verify_against(&self, server: &DevServerHandle) -> VerifyResult<bool> {
        if !server.wait_for_compiled().await? {
            return Ok(false);
        }

        let check = BrowserCheck::new(self.browser_config.clone())?;
        let screenshot = check.verify().await?;
        info!("Screenshot saved to {}", screenshot.display());

        Ok(true)
    }
}

impl Default for Verification {
    fn default() -> Self {
        Self::new()
    }
}
