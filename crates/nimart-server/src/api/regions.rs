use axum::{
    extract::{Query, State},
    Extension, Json,
};
use nimart_geo::{GeoPoint, Region, RegionMatch};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_geo_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct LocateQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

pub(super) async fn list_regions(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<Region>>>, ApiError> {
    let regions = state
        .geo
        .regions()
        .await
        .map_err(|e| map_geo_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: regions.to_vec(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Nearest state for a point, or `null` outside the country.
pub(super) async fn locate_region(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<LocateQuery>,
) -> Result<Json<ApiResponse<Option<RegionMatch>>>, ApiError> {
    let (Some(lat), Some(lng)) = (query.lat, query.lng) else {
        return Err(ApiError::validation(req_id.0, "lat and lng are required"));
    };
    let point = GeoPoint::try_new(lat, lng).map_err(|e| map_geo_error(req_id.0.clone(), &e))?;

    let found = state
        .geo
        .locate(point)
        .await
        .map_err(|e| map_geo_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: found,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::api::tests::{body_json, test_app};

    async fn get(uri: &str) -> (StatusCode, serde_json::Value) {
        let response = test_app(200)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        (status, body_json(response).await)
    }

    #[tokio::test]
    async fn lists_all_states() {
        let (status, json) = get("/api/v1/regions").await;
        assert_eq!(status, StatusCode::OK);
        let regions = json["data"].as_array().expect("data array");
        assert_eq!(regions.len(), 37);
        assert!(regions.iter().any(|r| r["name"] == "Lagos"));
    }

    #[tokio::test]
    async fn locate_returns_nearest_state() {
        let (status, json) = get("/api/v1/regions/locate?lat=6.45&lng=3.40").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["name"], "Lagos");
        assert!(json["data"]["distance_km"].as_f64().is_some());
    }

    #[tokio::test]
    async fn locate_outside_country_is_null() {
        let (status, json) = get("/api/v1/regions/locate?lat=51.5&lng=-0.12").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["data"].is_null());
    }

    #[tokio::test]
    async fn locate_rejects_out_of_range_latitude() {
        let (status, json) = get("/api/v1/regions/locate?lat=95&lng=3.4").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "validation_error");
    }

    #[tokio::test]
    async fn locate_requires_both_coordinates() {
        let (status, json) = get("/api/v1/regions/locate?lat=6.45").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["message"], "lat and lng are required");
    }
}
