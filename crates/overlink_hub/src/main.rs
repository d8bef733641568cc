//! Overlink scenario runner
//!
//! Builds the reference hub, walks it and prints the result as JSON.
//!
//! Run with: cargo run -p overlink_hub --bin overlink_scenario
//!
//! Environment:
//! - `OVERLINK_SCENARIO_DEBUG=1` enables debug mode and the debug renderer
//! - `OVERLINK_SCENARIO_REMIX=1` activates remix preview and remix audio
//! - `OVERLINK_*` hub settings, see [`HubConfig::load`]

use overlink_hub::scenario::{run_scenario_on, ScenarioConfig, ScenarioStatus};
use overlink_hub::{HubConfig, OverlinkHub};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = HubConfig::load();
    let hub = match OverlinkHub::builder().with_config(config).build() {
        Ok(hub) => hub,
        Err(e) => {
            log::error!("Failed to build hub: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let output = run_scenario_on(hub, ScenarioConfig::from_env());
    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Failed to encode scenario output: {}", e);
            return ExitCode::FAILURE;
        }
    }

    if output.status == ScenarioStatus::Ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
