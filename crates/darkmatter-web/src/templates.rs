//! Page templates, compiled into the binary.

use axum::response::Html;
use minijinja::Environment;
use serde::Serialize;

use crate::error::WebError;

const TEMPLATES: [(&str, &str); 6] = [
    ("layout.html",          include_str!("../templates/layout.html")),
    ("login.html",           include_str!("../templates/login.html")),
    ("signup.html",          include_str!("../templates/signup.html")),
    ("forgot_password.html", include_str!("../templates/forgot_password.html")),
    ("home.html",            include_str!("../templates/home.html")),
    ("fold.html",            include_str!("../templates/fold.html")),
];

/// Template set with HTML autoescaping (enabled for `.html` names).
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, WebError> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<Html<String>, WebError> {
        let template = self.env.get_template(name)?;
        Ok(Html(template.render(ctx)?))
    }
}
