use anyhow::Result;
use lunchguide::dashboard::{self, DashboardQuery, DashboardRequest};

pub struct ShowArgs {
    pub date: Option<String>,
    pub allergens: Vec<u32>,
    pub preset: Option<String>,
    pub meal: Option<String>,
    pub risky_only: bool,
}

/// Runs the dashboard pipeline once and prints it as pretty JSON.
pub async fn show(config: lunchguide::Config, args: ShowArgs) -> Result<()> {
    let query = DashboardQuery {
        date: args.date,
        allergen: args.allergens.iter().map(u32::to_string).collect(),
        risky_only: args.risky_only.then(|| "on".to_owned()),
        preset: args.preset,
        meal: args.meal,
        ..Default::default()
    };

    let request = DashboardRequest::from_query(
        query,
        &config.dashboard,
        dashboard::today(&config.dashboard),
    );
    for notice in &request.notices {
        tracing::warn!("{notice}");
    }

    let meals = lunchguide::meal_source(&config)?;
    let dashboard = dashboard::load(meals.as_ref(), &request).await;

    println!("{}", serde_json::to_string_pretty(&dashboard)?);

    Ok(())
}
