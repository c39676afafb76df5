use pulse_config::{PulseConfig, URL_ENV_KEY};

/// Keys people set when they mean `PULSE_BACKEND__URL`.
const FOREIGN_URL_KEYS: &[&str] = &["CONVEX_URL", "VITE_CONVEX_URL", "PULSE_URL"];

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &PulseConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &PulseConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    if config.backend.is_configured() {
        return Vec::new();
    }

    let mut keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();
    keys.sort();

    keys.iter()
        .filter(|key| is_misnamed_backend_key(key) || FOREIGN_URL_KEYS.contains(&key.as_str()))
        .map(|key| {
            format!("Backend URL is not configured while {key} is set. Use {URL_ENV_KEY}.")
        })
        .collect()
}

fn is_misnamed_backend_key(key: &str) -> bool {
    key.starts_with("PULSE_BACKEND") && !key.starts_with("PULSE_BACKEND__")
}
