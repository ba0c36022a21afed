// ABOUTME: Shared helper for detecting and connecting to the container engine.
// ABOUTME: Wires configured deadline and cancellation into the command runner.

use paulenv::config::Settings;
use paulenv::engine::{CancelToken, ContainerEngine, SystemRunner, detect_engine};
use paulenv::error::Result;
use paulenv::output::Output;

/// Detect the engine and report which one was found.
pub async fn connect(
    settings: &Settings,
    cancel: CancelToken,
    output: &Output,
) -> Result<Box<dyn ContainerEngine>> {
    output.progress("  → Detecting container engine...");
    let runner = SystemRunner::new()
        .with_cancel_token(cancel)
        .with_timeout(settings.timeout);

    let engine = detect_engine(settings, runner).await?;

    output.progress(&format!(
        "  → Using {} ({})",
        engine.kind(),
        settings.backend(engine.kind()).program
    ));
    Ok(engine)
}
