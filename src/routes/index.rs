use axum::{extract::State, response::IntoResponse};
use axum_extra::extract::{
    Query,
    cookie::{Cookie, CookieJar, SameSite},
};

use super::AppState;
use crate::dashboard::{self, DashboardQuery, DashboardRequest};
use crate::template::{DashboardTemplate, Template};

pub const PROFILE_COOKIE: &str = "lunchguide_allergens";
pub const PRESET_COOKIE: &str = "lunchguide_preset";

/// Fills the profile and preset from cookies when the form was not submitted.
fn restore(query: &mut DashboardQuery, jar: &CookieJar) {
    if query.is_submission() {
        return;
    }

    if query.allergen.is_empty() {
        if let Some(cookie) = jar.get(PROFILE_COOKIE) {
            query.allergen = cookie
                .value()
                .split('.')
                .filter(|code| !code.is_empty())
                .map(str::to_owned)
                .collect();
        }
    }

    if query.preset.is_none() {
        query.preset = jar.get(PRESET_COOKIE).map(|cookie| cookie.value().to_owned());
    }
}

fn remember(jar: CookieJar, request: &DashboardRequest) -> CookieJar {
    let codes = request
        .options
        .profile
        .codes()
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(".");

    jar.add(persistent(PROFILE_COOKIE, codes))
        .add(persistent(PRESET_COOKIE, request.preset.to_string()))
}

fn persistent(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .permanent()
        .build()
}

#[tracing::instrument(skip_all)]
pub async fn page(
    template: Template,
    State(state): State<AppState>,
    jar: CookieJar,
    Query(mut query): Query<DashboardQuery>,
) -> impl IntoResponse {
    restore(&mut query, &jar);
    let submitted = query.is_submission();

    let config = &state.config.dashboard;
    let request = DashboardRequest::from_query(query, config, dashboard::today(config));
    let dashboard = dashboard::load(state.meals.as_ref(), &request).await;

    let jar = if submitted { remember(jar, &request) } else { jar };

    (
        jar,
        template.render(DashboardTemplate::new(dashboard, &request)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookies_fill_missing_selection() {
        let jar = CookieJar::new()
            .add(Cookie::new(PROFILE_COOKIE, "5.13"))
            .add(Cookie::new(PRESET_COOKIE, "elementary"));
        let mut query = DashboardQuery::default();

        restore(&mut query, &jar);

        assert_eq!(query.allergen, vec!["5", "13"]);
        assert_eq!(query.preset.as_deref(), Some("elementary"));
    }

    #[test]
    fn submitted_form_ignores_cookies() {
        let jar = CookieJar::new().add(Cookie::new(PROFILE_COOKIE, "5.13"));
        let mut query = DashboardQuery {
            apply: Some("1".to_string()),
            ..Default::default()
        };

        restore(&mut query, &jar);

        assert!(query.allergen.is_empty());
        assert!(query.preset.is_none());
    }
}
