//! Hold-to-spin simulation on a mock field.
//!
//! Builds a spinner from a JSON settings patch, holds the up button for a
//! while on a simulated clock, and prints every event as JSON.
//!
//! # Usage
//!
//! ```sh
//! cargo run --example spin_demo --features serde
//! cargo run --example spin_demo --features serde -- '{"max": 50, "boostat": 3}' 2000
//! ```
//!
//! The first argument is a settings patch (defaults to `{}`), the second the
//! hold duration in milliseconds (defaults to 1500).

use anyhow::{bail, Context, Result};

use rs_spinner::hal::{MockClock, MockField};
use rs_spinner::messages::{EventMessage, SettingsSnapshot, SpinnerSnapshot};
use rs_spinner::{parse_settings_patch, Clock, Spinner};

/// Simulation resolution
const FRAME_MS: u64 = 10;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let patch_json = args.next().unwrap_or_else(|| "{}".to_string());
    let hold_ms: u64 = match args.next() {
        Some(text) => text
            .parse()
            .with_context(|| format!("invalid hold duration {text:?}"))?,
        None => 1500,
    };

    let patch = parse_settings_patch(&patch_json).context("invalid settings patch")?;
    let clock = MockClock::new();
    let mut spinner = Spinner::new(MockField::new(""), clock.clone(), patch);

    println!(
        "settings: {}",
        serde_json::to_string(&SettingsSnapshot::from(spinner.settings()))?
    );
    println!("initial:  {:?}", spinner.field().text);

    let stamp = clock.clone();
    spinner.on_event(move |event| {
        let message = EventMessage {
            at_ms: stamp.now_ms(),
            event,
        };
        if let Ok(json) = serde_json::to_string(&message) {
            println!("{json}");
        }
    });

    if spinner.start_spin_up().is_rejected() {
        bail!("field rejected the spin");
    }
    while clock.now_ms() < hold_ms {
        clock.advance(FRAME_MS);
        spinner.update();
    }
    spinner.stop_spin();

    println!(
        "final:    {}",
        serde_json::to_string(&SpinnerSnapshot::capture(&spinner))?
    );
    Ok(())
}
