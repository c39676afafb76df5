use pulse_config::{ConfigOverrides, PulseConfig};

use crate::cli::GlobalFlags;

/// Load layered config (`.env`, TOML files, `PULSE_*` env) with `--url` on top.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<PulseConfig> {
    let overrides = ConfigOverrides {
        backend_url: flags.url.clone(),
    };
    PulseConfig::load_with_overrides(&overrides).map_err(anyhow::Error::from)
}
