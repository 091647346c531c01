use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{Html, IntoResponse, Response},
};
use lunchguide_menu::{ALLERGENS, MAX_ENERGY_TARGET, MAX_MACRO_TARGET, TargetPreset, option_label};
use std::{collections::HashMap, convert::Infallible};
use strum::IntoEnumIterator;

use crate::dashboard::{Dashboard, DashboardRequest, iso_date};

pub(crate) mod filters {
    /// `/static/{path}?v={version}`, so a release busts long-lived caches.
    #[askama::filter_fn]
    pub fn asset(value: &str, values: &dyn askama::Values) -> askama::Result<String> {
        let version = askama::get_value::<String>(values, "version")
            .map(|v| v.as_str())
            .unwrap_or("dev");

        Ok(format!("/static/{value}?v={version}"))
    }
}

pub struct Template {
    current_path: String,
}

impl Template {
    fn render_with_values<T: askama::Template>(
        &self,
        template: T,
    ) -> Result<String, askama::Error> {
        let mut values: HashMap<&str, Box<dyn std::any::Any>> = HashMap::new();
        values.insert("version", Box::new(env!("CARGO_PKG_VERSION").to_owned()));

        template.render_with_values(&values)
    }

    pub fn to_string<T: askama::Template>(&self, template: T) -> String {
        match self.render_with_values(template) {
            Ok(html) => html,
            Err(err) => format!("Failed to render template. Error: {err}"),
        }
    }

    pub fn render<T: askama::Template>(&self, template: T) -> Response {
        self.render_with_status(StatusCode::OK, template)
    }

    pub fn render_with_status<T: askama::Template>(
        &self,
        status: StatusCode,
        template: T,
    ) -> Response {
        match self.render_with_values(template) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(err) => {
                tracing::error!(path = %self.current_path, "Failed to render template: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(self.to_string(ServerTemplate)),
                )
                    .into_response()
            }
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Template {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Template {
            current_path: parts.uri.path().to_owned(),
        })
    }
}

/// One entry of a `<select>`.
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Values echoed back into the form controls.
pub struct FormValues {
    pub date: String,
    pub meal: String,
    pub risky_only: bool,
    pub energy: String,
    pub carbohydrate: String,
    pub protein: String,
    pub fat: String,
}

fn override_value(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[derive(askama::Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub dashboard: Dashboard,
    pub form: FormValues,
    pub allergen_options: Vec<SelectOption>,
    pub preset_options: Vec<SelectOption>,
    pub max_energy: f64,
    pub max_macro: f64,
}

impl DashboardTemplate {
    pub fn new(dashboard: Dashboard, request: &DashboardRequest) -> Self {
        let profile = &request.options.profile;
        let allergen_options = ALLERGENS
            .iter()
            .map(|(code, _)| SelectOption {
                value: code.to_string(),
                label: option_label(*code),
                selected: profile.contains(*code),
            })
            .collect();

        let preset_options = TargetPreset::iter()
            .map(|preset| SelectOption {
                value: preset.to_string(),
                label: preset.label().to_owned(),
                selected: preset == request.preset,
            })
            .collect();

        let form = FormValues {
            date: iso_date(request.date),
            meal: request.meal.to_owned(),
            risky_only: request.options.risky_only,
            energy: override_value(request.overrides.energy),
            carbohydrate: override_value(request.overrides.carbohydrate),
            protein: override_value(request.overrides.protein),
            fat: override_value(request.overrides.fat),
        };

        Self {
            dashboard,
            form,
            allergen_options,
            preset_options,
            max_energy: MAX_ENERGY_TARGET,
            max_macro: MAX_MACRO_TARGET,
        }
    }
}

#[derive(askama::Template)]
#[template(path = "404.html")]
pub struct NotFoundTemplate;

#[derive(askama::Template)]
#[template(path = "500.html")]
pub struct ServerTemplate;
