//! Settings read from environment variables.

/// Number of threads in the pool returned by
/// [`thread_pool`](crate::thread_pool).
pub const NUM_THREADS_VAR: &str = "MSPGEMM_NUM_THREADS";

/// Flag which enables logging of the time taken by each multiplication.
pub const TIMING_VAR: &str = "MSPGEMM_TIMING";

/// Interpret a string value such as "1" or "no" as a boolean.
fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "f" | "no" | "n" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Return whether a feature flag controlled by an environment variable is
/// enabled, or `default` if the variable is unset or not a boolean.
pub fn env_flag(name: &str, default: bool) -> bool {
    let Ok(value) = std::env::var(name) else {
        return default;
    };
    parse_bool(&value).unwrap_or_else(|| {
        log::warn!("ignoring unrecognized value \"{}\" for {}", value, name);
        default
    })
}

/// Return true if multiplications should log their duration.
pub fn timing_enabled() -> bool {
    env_flag(TIMING_VAR, false)
}
