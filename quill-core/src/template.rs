use std::collections::HashMap;
use std::path::Path;

use tera::{Context, Tera, Value};

#[derive(Debug)]
pub enum TemplateError {
    TeraError(tera::Error),
    IoError(std::io::Error),
}

impl From<tera::Error> for TemplateError {
    fn from(err: tera::Error) -> Self {
        TemplateError::TeraError(err)
    }
}

impl From<std::io::Error> for TemplateError {
    fn from(err: std::io::Error) -> Self {
        TemplateError::IoError(err)
    }
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateError::TeraError(e) => write!(f, "Template error: {}", e),
            TemplateError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for TemplateError {}

/// Tera wrapper loading every `*.tera` file under the build-assets
/// directory. Template names keep the suffix (`post.html.tera`).
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    pub fn new(assets_dir: &Path) -> Result<Self, TemplateError> {
        let glob = format!("{}/**/*.tera", assets_dir.display());
        let mut tera = Tera::new(&glob)?;
        tera.register_function("color", color);

        Ok(Self { tera })
    }

    pub fn render(&self, template: &str, context: &Context) -> Result<String, TemplateError> {
        Ok(self.tera.render(template, context)?)
    }

    /// Render a template and write it to a file, creating parent dirs.
    pub fn render_to_file(
        &self,
        template: &str,
        context: &Context,
        output_path: &Path,
    ) -> Result<(), TemplateError> {
        let rendered = self.render(template, context)?;

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(output_path, rendered)?;

        Ok(())
    }
}

/// Theme helper exposed to templates: `color(hex=site.color, alpha=0.25)`
/// expands a hex accent color into an `rgba(...)` CSS value.
fn color(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let hex = args
        .get("hex")
        .and_then(|v| v.as_str())
        .ok_or_else(|| tera::Error::msg("color() needs a `hex` string argument"))?;
    let alpha = args.get("alpha").and_then(|v| v.as_f64()).unwrap_or(1.0);

    let (r, g, b) = unhex(hex).ok_or_else(|| {
        tera::Error::msg(format!("color(): `{}` is not an RGB hex string", hex))
    })?;

    Ok(Value::String(format!("rgba({}, {}, {}, {})", r, g, b, alpha)))
}

fn unhex(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    let channel = |i| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unhex() {
        assert_eq!(unhex("#00bebe"), Some((0, 190, 190)));
        assert_eq!(unhex("ff0066"), Some((255, 0, 102)));
        assert_eq!(unhex("#short"), None);
        assert_eq!(unhex("#zzzzzz"), None);
    }

    #[test]
    fn test_color_function_renders_rgba() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("style.css.tera"),
            "a { color: {{ color(hex=accent, alpha=0.5) }}; }",
        )
        .unwrap();

        let renderer = TemplateRenderer::new(dir.path()).unwrap();
        let mut ctx = Context::new();
        ctx.insert("accent", "#00bebe");
        let css = renderer.render("style.css.tera", &ctx).unwrap();
        assert_eq!(css, "a { color: rgba(0, 190, 190, 0.5); }");
    }
}
