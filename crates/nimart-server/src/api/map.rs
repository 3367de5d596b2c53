use axum::{extract::State, Extension, Json};
use nimart_geo::{map_view, GeoPoint, MapFilterCriteria, MapView, Provider};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct DiscoverRequest {
    pub providers: Vec<Provider>,
    #[serde(default)]
    pub origin: Option<GeoPoint>,
    #[serde(default)]
    pub filters: MapFilterCriteria,
}

#[derive(Debug, Serialize)]
pub(super) struct DiscoverData {
    #[serde(flatten)]
    pub view: MapView,
    pub total: usize,
}

pub(super) async fn discover_providers(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<DiscoverRequest>,
) -> Result<Json<ApiResponse<DiscoverData>>, ApiError> {
    if body.providers.len() > state.max_providers {
        return Err(ApiError::validation(
            req_id.0,
            format!(
                "too many providers: {} (max {})",
                body.providers.len(),
                state.max_providers
            ),
        ));
    }
    if let Some(origin) = body.origin {
        if !origin.is_valid() {
            return Err(ApiError::validation(
                req_id.0,
                format!("invalid origin ({}, {})", origin.lat, origin.lng),
            ));
        }
    }

    let view = map_view(body.providers, body.origin, &body.filters);
    let total = view.providers.len();

    Ok(Json(ApiResponse {
        data: DiscoverData { view, total },
        meta: ResponseMeta::new(req_id.0),
    }))
}
