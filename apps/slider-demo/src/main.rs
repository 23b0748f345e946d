use anyhow::{Context, Result};
use mosaic_slider::SliderConfig;
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

mod session;

const TRACK_WIDTH: f32 = 600.0;
const THUMB_WIDTH: f32 = 24.0;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let config = match std::env::args_os().nth(1) {
        Some(path) => load_config(Path::new(&path))?,
        None => SliderConfig::default(),
    };
    log::info!("slider config: {:?}", config);

    let uncontrolled = config.build_state().context("building uncontrolled slider")?;
    session::replay("uncontrolled", &uncontrolled, TRACK_WIDTH, THUMB_WIDTH, None)?;

    // The host keeps the value and feeds it back after every gesture.
    let host_value = Rc::new(Cell::new(config.initial_value));
    let sink = host_value.clone();
    let controlled = config
        .build_controlled_state(move |value| {
            log::info!("controlled slider reported {value:.3}");
            sink.set(value);
        })
        .context("building controlled slider")?;
    session::replay(
        "controlled",
        &controlled,
        TRACK_WIDTH,
        THUMB_WIDTH,
        Some(&host_value),
    )?;

    Ok(())
}

fn load_config(path: &Path) -> Result<SliderConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading slider config {}", path.display()))?;
    let config: SliderConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing slider config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("validating slider config {}", path.display()))?;
    Ok(config)
}
