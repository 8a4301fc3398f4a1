use std::{collections::HashMap, fs};

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base_url: String,
    pub database_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "https://pokeapi.co/api/v2".into(),
            database_url: "sqlite://./data/pokedex.db".into(),
        }
    }
}

/// Defaults, overridden by `pokedex.toml`, overridden by environment
/// variables. CLI flags win over all of these (applied in main).
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("pokedex.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("api_base_url") {
                settings.api_base_url = v.clone();
            }
            if let Some(v) = file_cfg.get("database_url") {
                settings.database_url = v.clone();
            }
        }
    }

    if let Ok(v) = std::env::var("POKEDEX_API_URL") {
        settings.api_base_url = v;
    }
    if let Ok(v) = std::env::var("POKEDEX_DATABASE_URL") {
        settings.database_url = v;
    }

    settings
}
