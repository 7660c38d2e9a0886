use super::Config;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("EMOGAMES_API_KEY").or_else(|_| std::env::var("API_KEY"))
            && !key.is_empty()
        {
            self.provider.api_key = Some(key);
        }

        if let Ok(base_url) = std::env::var("EMOGAMES_BASE_URL")
            && !base_url.is_empty()
        {
            self.provider.base_url = base_url;
        }

        if let Ok(model) = std::env::var("EMOGAMES_MODEL")
            && !model.is_empty()
        {
            self.provider.model = model;
        }

        if let Ok(logs_dir) = std::env::var("EMOGAMES_LOGS_DIR")
            && !logs_dir.is_empty()
        {
            self.logs_dir = logs_dir;
        }

        if let Ok(temp_str) = std::env::var("EMOGAMES_TEMPERATURE")
            && let Ok(temp) = temp_str.parse::<f64>()
            && (0.0..=2.0).contains(&temp)
        {
            self.provider.temperature = temp;
        }
    }
}
