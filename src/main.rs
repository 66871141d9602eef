//! MiCava - a row of bars dancing to the default audio input
//!
//! Reads `config.json` from the working directory, opens a borderless
//! transparent window centered on the primary monitor, and redraws the bars
//! from a fresh block of captured audio every frame.

use std::process::ExitCode;

use micava::app::App;
use micava::config::Settings;
use micava::error::VisualizerError;

fn run() -> Result<(), VisualizerError> {
    // Settings and layout are validated before any window exists
    let settings = Settings::load_default()?;
    let app = App::new(settings)?;
    app.run()
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("MiCava - audio-reactive bars");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
