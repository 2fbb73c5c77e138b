//! Verification harness entry point
//!
//! Runs the full smoke verification with zero flags: the defaults reproduce
//! the fixed paths, URL, and timings of the original harness.
//! Exit codes: 0 success, 1 verification failed, 2 harness error.

use std::path::PathBuf;
use std::time::Duration;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sprinkler_verify::{BrowserConfig, DevServerConfig, Verification, VerifyResult};

#[derive(Parser, Debug)]
#[command(name = "sprinkler-verify")]
#[command(about = "End-to-end smoke verification for the Sprinkler System Designer app")]
struct Args {
    /// Path to the react-scripts executable
    #[arg(
        long,
        default_value = "sprinkler-system-designer/node_modules/.bin/react-scripts"
    )]
    script: PathBuf,

    /// Working directory for the dev server
    #[arg(long, default_value = "sprinkler-system-designer")]
    project_dir: PathBuf,

    /// Log file receiving the dev server's combined output
    #[arg(long, default_value = "npm_start.log")]
    log: PathBuf,

    /// Screenshot output path
    #[arg(long, default_value = "verification.png")]
    screenshot: PathBuf,

    /// URL the dev server serves the app on
    #[arg(long, default_value = "http://localhost:3000")]
    url: String,

    /// Accessible name of the heading that must render
    #[arg(long, default_value = "Lawn Sprinkler Design")]
    heading: String,

    /// Fixed wait for the dev server to compile, in seconds
    #[arg(long, default_value = "45")]
    compile_wait_secs: u64,

    /// Navigation timeout in milliseconds
    #[arg(long, default_value = "60000")]
    nav_timeout_ms: u64,

    /// Heading visibility timeout in milliseconds
    #[arg(long, default_value = "15000")]
    visible_timeout_ms: u64,

    /// Run the browser in headless mode
    #[arg(long, default_value = "true")]
    headless: bool,

    /// Viewport width
    #[arg(long, default_value = "1280")]
    viewport_width: u32,

    /// Viewport height
    #[arg(long, default_value = "720")]
    viewport_height: u32,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let args = Args::parse();

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    let result = rt.block_on(async_main(args));

    match result {
        Ok(success) => {
            if success {
                std::process::exit(0);
            } else {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

async fn async_main(args: Args) -> VerifyResult<bool> {
    let server = DevServerConfig {
        script_path: args.script,
        project_dir: args.project_dir,
        log_path: args.log,
        compile_wait: Duration::from_secs(args.compile_wait_secs),
        ..Default::default()
    };

    let browser = BrowserConfig {
        base_url: args.url,
        heading: args.heading,
        nav_timeout_ms: args.nav_timeout_ms,
        visible_timeout_ms: args.visible_timeout_ms,
        screenshot_path: args.screenshot,
        viewport_width: args.viewport_width,
        viewport_height: args.viewport_height,
        headless: args.headless,
    };

    Verification::with_config(server, browser).run().await
}
