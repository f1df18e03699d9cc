//! HTML templates, compiled into the binary.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use minijinja::Environment;
use serde::Serialize;
use tracing::error;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("home.html", include_str!("../templates/home.html")),
    ("predictor.html", include_str!("../templates/predictor.html")),
    ("results.html", include_str!("../templates/results.html")),
    ("find_doc.html", include_str!("../templates/find_doc.html")),
    ("chat.html", include_str!("../templates/chat.html")),
];

pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }

    /// Render a full page; a template error becomes a plain 500.
    pub fn page<S: Serialize>(&self, name: &str, ctx: S) -> Response {
        match self.render(name, ctx) {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                error!(template = name, error = %e, "template render failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_all_templates_compile() {
        let t = Templates::new().unwrap();
        for (name, _) in TEMPLATES {
            assert!(t.env.get_template(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_html_is_escaped() {
        let t = Templates::new().unwrap();
        let html = t
            .render(
                "home.html",
                context! { active => "home", model_loaded => true, assistant_status => "<b>x</b>" },
            )
            .unwrap();
        assert!(html.contains("&lt;b&gt;x"));
        assert!(!html.contains("<b>x"));
    }
}
