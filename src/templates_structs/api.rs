use serde::Serialize;

use crate::models::dashboard::{CategoryRow, ChartSeries};
use crate::models::department::Department;
use crate::models::health_session::HealthSession;
use crate::models::team::Team;
use crate::models::vote::DepartmentSummary;

/// Team dashboard as JSON. `error` carries a refused selection.
#[derive(Serialize, Debug)]
pub struct ApiTeamDashboard {
    pub team: Option<Team>,
    pub session: Option<HealthSession>,
    pub only_mine: bool,
    pub categories: Vec<CategoryRow>,
    pub chart: ChartSeries,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Department dashboard as JSON.
#[derive(Serialize, Debug)]
pub struct ApiDepartmentDashboard {
    pub department: Option<Department>,
    pub session: Option<HealthSession>,
    pub categories: Vec<CategoryRow>,
    pub chart: ChartSeries,
    pub other_departments: Vec<DepartmentSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// API error response.
#[derive(Serialize, Debug)]
pub struct ApiErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
