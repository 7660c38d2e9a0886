use crate::error::PromptError;
use tera::Tera;

/// Tera-backed template engine for building structured prompts.
pub struct TeraEngine {
    tera: Tera,
}

impl TeraEngine {
    /// Create with inline templates (no filesystem).
    pub fn new() -> Self {
        Self {
            tera: Tera::default(),
        }
    }

    /// Register a template from a string, replacing any template of that name.
    pub fn add_template(&mut self, name: &str, content: &str) -> Result<(), PromptError> {
        self.tera
            .add_raw_template(name, content)
            .map_err(|e| PromptError::Render(format!("{name}: {}", describe(&e))))
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    /// Render a named template with the given context.
    pub fn render(
        &self,
        template_name: &str,
        context: &tera::Context,
    ) -> Result<String, PromptError> {
        if !self.has_template(template_name) {
            return Err(PromptError::NotFound(template_name.to_string()));
        }
        self.tera
            .render(template_name, context)
            .map_err(|e| PromptError::Render(format!("{template_name}: {}", describe(&e))))
    }

    /// Render a one-off string template (not registered).
    pub fn render_string(
        &self,
        template: &str,
        context: &tera::Context,
    ) -> Result<String, PromptError> {
        Tera::one_off(template, context, false).map_err(|e| PromptError::Render(describe(&e)))
    }
}

impl Default for TeraEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TeraEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.tera.get_template_names().collect();
        names.sort_unstable();
        f.debug_struct("TeraEngine").field("templates", &names).finish()
    }
}

/// Tera nests the useful message in the error source chain.
fn describe(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}
