//! Sprinkler-Verify smoke-test harness
//!
//! A Rust-controlled end-to-end verification harness that:
//! - Spawns the app's dev server as a subprocess, output captured to a log
//! - Gates on the compile-success marker after a fixed wait
//! - Drives a headless browser via Playwright's CLI/JSON protocol
//! - Asserts the app heading renders and captures a screenshot as evidence
//!
//! # Flow
//!
//! ```text
//! ServerStarting ──▶ ServerCompiled ──▶ BrowserVerified
//!       │                  │                  │
//!       │   marker absent  │  heading absent  │
//!       └──────▶ Ok(false) └──────▶ Err(..)   └──▶ Ok(true)
//!
//! (dev server terminated on every path)
//! ```

pub mod browser;
pub mod error;
pub mod runner;
pub mod server;

pub use browser::BrowserConfig;
pub use error::{VerifyError, VerifyResult};
pub use runner::Verification;
pub use server::DevServerConfig;
