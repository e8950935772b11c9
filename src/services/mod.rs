// Core services
pub mod admin_gate;
pub mod fanout;
pub mod orders;
pub mod payments;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::errors::ServiceError;

/// Optional search filters carried as query parameters. Date bounds use
/// RFC 3339 text and are exclusive on both ends.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct SearchWindow {
    pub status: Option<String>,
    #[serde(rename = "initialDate")]
    pub initial_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

/// Status assigned to a request at creation time.
pub const STATUS_CREATED: &str = "created";
/// Status a request enters once its payment is confirmed.
pub const STATUS_PREPARING: &str = "preparing";

/// Parses an optional RFC 3339 date bound from query input. A present but
/// malformed value is a hard input error.
pub(crate) fn parse_date_bound(
    label: &str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, ServiceError> {
    match value {
        None => Ok(None),
        Some(raw) if raw.is_empty() => Ok(None),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|_| ServiceError::ValidationError(format!("invalid {label}: {raw}"))),
    }
}

/// Parses a decimal string path identifier.
pub(crate) fn parse_id(label: &str, raw: &str) -> Result<i32, ServiceError> {
    raw.parse::<i32>()
        .map_err(|_| ServiceError::ValidationError(format!("invalid {label}: {raw}")))
}
