//! Client-side routes understood by the dashboard shell.

use shared::domain::DietChartId;

pub const OVERVIEW: &str = "/dashboard";
pub const PATIENTS: &str = "/dashboard/manager/patients";
pub const DIET_CHARTS: &str = "/dashboard/manager/diet-charts";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Overview,
    Patients,
    DietCharts,
    DietChart(DietChartId),
    NotFound(String),
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim().trim_end_matches('/');
        match trimmed {
            "" | OVERVIEW => Route::Overview,
            PATIENTS => Route::Patients,
            DIET_CHARTS => Route::DietCharts,
            other => other
                .strip_prefix(DIET_CHARTS)
                .and_then(|rest| rest.strip_prefix('/'))
                .and_then(|id| DietChartId::parse(id).ok())
                .map(Route::DietChart)
                .unwrap_or_else(|| Route::NotFound(path.to_string())),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Overview => OVERVIEW.to_string(),
            Route::Patients => PATIENTS.to_string(),
            Route::DietCharts => DIET_CHARTS.to_string(),
            Route::DietChart(id) => format!("{DIET_CHARTS}/{id}"),
            Route::NotFound(path) => path.clone(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Overview => "Overview",
            Route::Patients => "Patients",
            Route::DietCharts => "Diet Charts",
            Route::DietChart(_) => "Diet Chart",
            Route::NotFound(_) => "Not found",
        }
    }
}
