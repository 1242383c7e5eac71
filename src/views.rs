//! HTML rendering of controller outcomes

use axum::{
    http::{header::LOCATION, StatusCode},
    response::{Html, IntoResponse, Response},
};
use tera::{Context, Tera};

use crate::{
    error::AppResult,
    services::{Outcome, Page},
};

/// Compiled template set
#[derive(Debug, Clone)]
pub struct Views {
    tera: Tera,
}

impl Views {
    /// Compile every template matching `glob`.
    ///
    /// Autoescaping is disabled: user text is escaped once by the form
    /// pipeline before it is stored.
    pub fn load(glob: &str) -> AppResult<Self> {
        let mut tera = Tera::new(glob)?;
        tera.autoescape_on(vec![]);
        tracing::debug!(templates = tera.get_template_names().count(), "Templates loaded");
        Ok(Self { tera })
    }

    pub fn render(&self, page: Page) -> AppResult<String> {
        let context = Context::from_value(page.context)?;
        Ok(self.tera.render(page.template, &context)?)
    }

    /// Turn an outcome into a 200 page or a 302 redirect
    pub fn respond(&self, outcome: Outcome) -> AppResult<Response> {
        match outcome {
            Outcome::Render(page) => Ok(Html(self.render(page)?).into_response()),
            Outcome::Redirect(url) => Ok((StatusCode::FOUND, [(LOCATION, url)]).into_response()),
        }
    }
}
