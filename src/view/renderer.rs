use crate::error::RenderError;
use crate::model::ModelMap;
use minijinja::Environment;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Turns a logical view name and its model into a response body.
///
/// Implementations must fail loudly when the view cannot be resolved.
pub trait ViewRenderer: Send + Sync {
    fn render(&self, view: &str, model: &ModelMap) -> Result<String, RenderError>;
}

/// Renders minijinja templates from a directory.
///
/// A view name resolves to `dir / (prefix + view + suffix)`, so with the
/// default `.html` suffix the view `validation/v1/addForm` is read from
/// `dir/validation/v1/addForm.html`. Templates are read on every render.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    base_dir: PathBuf,
    prefix: String,
    suffix: String,
}

impl TemplateRenderer {
    pub fn new<P: Into<PathBuf>>(base: P) -> Self {
        Self {
            base_dir: base.into(),
            prefix: String::new(),
            suffix: ".html".to_string(),
        }
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Map a view name to a file under the base directory.
    ///
    /// Returns `None` for names that would escape it (`..`, absolute paths).
    fn map_path(&self, view: &str) -> Option<PathBuf> {
        let name = format!("{}{}{}", self.prefix, view, self.suffix);
        let mut pb = self.base_dir.clone();
        for comp in Path::new(name.trim_start_matches('/')).components() {
            match comp {
                Component::Normal(s) => pb.push(s),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(pb)
    }
}

impl ViewRenderer for TemplateRenderer {
    fn render(&self, view: &str, model: &ModelMap) -> Result<String, RenderError> {
        if view.trim().is_empty() {
            return Err(RenderError::EmptyViewName);
        }
        let not_found = |path: &Path| RenderError::TemplateNotFound {
            view: view.to_string(),
            path: path.display().to_string(),
        };
        let path = self
            .map_path(view)
            .ok_or_else(|| not_found(&self.base_dir))?;
        if !path.is_file() {
            return Err(not_found(&path));
        }
        let template_err = |message: String| RenderError::Template {
            view: view.to_string(),
            message,
        };

        let source = fs::read_to_string(&path).map_err(|e| template_err(e.to_string()))?;
        // Keep the suffix in the template name so minijinja picks auto-escaping from it.
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("view.html")
            .to_string();

        let mut env = Environment::new();
        env.add_template(&name, &source)
            .map_err(|e| template_err(e.to_string()))?;
        let tmpl = env
            .get_template(&name)
            .map_err(|e| template_err(e.to_string()))?;
        let rendered = tmpl.render(model).map_err(|e| template_err(e.to_string()))?;

        debug!(
            view = %view,
            template = %path.display(),
            body_size_bytes = rendered.len(),
            "View rendered"
        );
        Ok(rendered)
    }
}
