use serde::{Deserialize, Serialize};

use crate::database::models::location::LocationEntity;

/// 客户端上报的原始值，校验在 handler 里做
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocationRequest {
    pub country_code: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateLocationResponse {
    pub location: LocationEntity,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LatestLocationResponse {
    pub location: LocationEntity,
}
