use chrono::Local;
use std::fmt;
use std::path::Path;

const RUN_TIMESTAMP_FORMAT: &str = "%d_%m_%H%M%S";

/// Directory name of one experiment run.
///
/// Uniqueness comes from the one-second timestamp granularity only; two runs
/// started within the same second with the same game and model collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunIdentity(String);

impl RunIdentity {
    /// `[<game>_]<dd_mm_HHMMSS>[_<model>]`, empty parts omitted.
    pub fn derive(game_name: &str, model_suffix: &str) -> Self {
        let stamp = Local::now().format(RUN_TIMESTAMP_FORMAT).to_string();
        Self::compose(game_name, &stamp, model_suffix)
    }

    /// Uses a caller-chosen name verbatim.
    pub fn named(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    fn compose(game_name: &str, stamp: &str, model_suffix: &str) -> Self {
        let mut name = String::new();
        if !game_name.is_empty() {
            name.push_str(game_name);
            name.push('_');
        }
        name.push_str(stamp);
        if !model_suffix.is_empty() {
            name.push('_');
            name.push_str(model_suffix);
        }
        Self(name)
    }

    /// Appends `_2`, `_3`, ... until no directory of that name exists under
    /// `logs_root`. Back-to-back runs in the same second stay separate.
    pub fn disambiguate(self, logs_root: &Path) -> Self {
        if !logs_root.join(&self.0).exists() {
            return self;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}_{n}", self.0);
            if !logs_root.join(&candidate).exists() {
                return Self(candidate);
            }
            n += 1;
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Short, path-friendly form of a backend model id:
/// `meta.llama3-8b-instruct-v1:0` becomes `llama3-8b`.
pub fn model_short_name(model_id: &str) -> String {
    let last = model_id.rsplit('.').next().unwrap_or(model_id);
    let without_instruct = last.split("-instruct").next().unwrap_or(last);
    without_instruct
        .split("-v")
        .next()
        .unwrap_or(without_instruct)
        .to_string()
}
