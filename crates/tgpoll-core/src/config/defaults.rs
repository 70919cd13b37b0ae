//! Default value functions used by serde for config deserialization.

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_api_base_url() -> String {
    "https://api.telegram.org".to_string()
}

pub fn default_request_margin() -> u64 {
    10
}

pub fn default_initial_backoff_ms() -> u64 {
    1_000
}

pub fn default_max_backoff_ms() -> u64 {
    60_000
}

pub fn default_multiplier() -> u32 {
    2
}
