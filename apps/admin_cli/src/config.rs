use std::{collections::HashMap, fs, path::PathBuf};

use client_core::session::default_token_path;

#[derive(Debug)]
pub struct Settings {
    pub api_base_url: String,
    pub token_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5001/api".into(),
            token_path: default_token_path(),
        }
    }
}

/// Defaults, then `admin.toml` in the working directory, then environment
/// overrides. Later layers win.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("admin.toml") {
        apply_file_overrides(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Ok(v) = std::env::var("ADMIN_TOKEN_PATH") {
        settings.token_path = PathBuf::from(v);
    }

    settings
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
        if let Some(v) = file_cfg.get("api_base_url") {
            settings.api_base_url = v.clone();
        }
        if let Some(v) = file_cfg.get("token_path") {
            settings.token_path = PathBuf::from(v);
        }
    }
}
