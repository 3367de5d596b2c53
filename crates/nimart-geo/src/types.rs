//! Value types shared by the geospatial core.
//!
//! Everything here is plain data: constructed per request, passed by
//! reference, and never persisted by this crate.

use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::GeoError;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Build a point, rejecting NaN, infinities and out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::InvalidCoordinate`] unless `-90 <= lat <= 90` and
    /// `-180 <= lng <= 180`.
    pub fn try_new(lat: f64, lng: f64) -> Result<Self, GeoError> {
        let point = Self { lat, lng };
        if point.is_valid() {
            Ok(point)
        } else {
            Err(GeoError::InvalidCoordinate { lat, lng })
        }
    }

    /// `false` for NaN or out-of-range components. Range checks reject NaN on
    /// their own since every comparison with NaN is false.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Verification state of a provider account.
///
/// Unrecognised values from the store deserialize to [`Unknown`](Self::Unknown)
/// and are styled like [`Unverified`](Self::Unverified) on the map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    PendingEmail,
    #[default]
    Unverified,
    Pending,
    Verified,
    Demo,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerificationStatus::PendingEmail => write!(f, "pending_email"),
            VerificationStatus::Unverified => write!(f, "unverified"),
            VerificationStatus::Pending => write!(f, "pending"),
            VerificationStatus::Verified => write!(f, "verified"),
            VerificationStatus::Demo => write!(f, "demo"),
            VerificationStatus::Unknown => write!(f, "unknown"),
        }
    }
}

fn status_or_default<'de, D>(deserializer: D) -> Result<VerificationStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<VerificationStatus>::deserialize(deserializer)?.unwrap_or_default())
}

/// A provider row as returned by the external `providers` table.
///
/// Only the fields the map pipeline reads are interpreted; the display fields
/// are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub service_type: Option<String>,
    /// Resolved state name. The data-access layer flattens the joined
    /// `states` relation into this single value.
    #[serde(default)]
    pub state_name: Option<String>,
    #[serde(default)]
    pub lga_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "status_or_default")]
    pub verification_status: VerificationStatus,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub is_online: Option<bool>,
    #[serde(default)]
    pub map_visibility: Option<bool>,
}

impl Provider {
    /// A provider with only an id set; every optional field is empty.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            business_name: None,
            service_type: None,
            state_name: None,
            lga_name: None,
            address: None,
            phone: None,
            profile_image_url: None,
            latitude: None,
            longitude: None,
            verification_status: VerificationStatus::default(),
            rating: None,
            is_online: None,
            map_visibility: None,
        }
    }

    /// The provider's point, if both coordinates are present and valid.
    ///
    /// Partial or malformed coordinates are common in store data and are
    /// treated as "no location" rather than as an error.
    #[must_use]
    pub fn location(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => GeoPoint::try_new(lat, lng).ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn rating(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }

    #[must_use]
    pub fn is_online(&self) -> bool {
        self.is_online.unwrap_or(false)
    }

    /// Only an explicit `false` hides a provider.
    #[must_use]
    pub fn is_map_visible(&self) -> bool {
        self.map_visibility != Some(false)
    }
}

/// A provider enriched with its distance from the query origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedProvider {
    #[serde(flatten)]
    pub provider: Provider,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// User-selectable verification filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationFilter {
    #[default]
    All,
    Verified,
    Unverified,
    Pending,
}

impl VerificationFilter {
    #[must_use]
    pub fn matches(self, status: VerificationStatus) -> bool {
        match self {
            VerificationFilter::All => true,
            VerificationFilter::Verified => status == VerificationStatus::Verified,
            VerificationFilter::Unverified => status == VerificationStatus::Unverified,
            VerificationFilter::Pending => status == VerificationStatus::Pending,
        }
    }
}

impl std::str::FromStr for VerificationFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(VerificationFilter::All),
            "verified" => Ok(VerificationFilter::Verified),
            "unverified" => Ok(VerificationFilter::Unverified),
            "pending" => Ok(VerificationFilter::Pending),
            other => Err(format!(
                "unknown verification filter '{other}' (expected all, verified, unverified or pending)"
            )),
        }
    }
}

/// Default search radius offered by the map filter panel.
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 50.0;

/// Filter criteria chosen in the map UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapFilterCriteria {
    pub service_type: Option<String>,
    pub verification_status: VerificationFilter,
    pub min_rating: f64,
    pub max_distance_km: f64,
    pub online_only: bool,
}

impl Default for MapFilterCriteria {
    fn default() -> Self {
        Self {
            service_type: None,
            verification_status: VerificationFilter::All,
            min_rating: 0.0,
            max_distance_km: DEFAULT_MAX_DISTANCE_KM,
            online_only: false,
        }
    }
}

/// Axis-aligned lat/lng box. Edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionBoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl RegionBoundingBox {
    #[must_use]
    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lat >= self.south
            && point.lat <= self.north
            && point.lng >= self.west
            && point.lng <= self.east
    }

    #[must_use]
    pub fn center(&self) -> GeoPoint {
        GeoPoint {
            lat: (self.north + self.south) / 2.0,
            lng: (self.east + self.west) / 2.0,
        }
    }

    /// `true` when every edge of `self` lies within `outer`.
    #[must_use]
    pub fn is_within(&self, outer: &RegionBoundingBox) -> bool {
        self.north <= outer.north
            && self.south >= outer.south
            && self.east <= outer.east
            && self.west >= outer.west
    }
}

/// A named administrative region with a representative point (its capital).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: Cow<'static, str>,
    pub lat: f64,
    pub lng: f64,
}

impl Region {
    #[must_use]
    pub const fn new_static(name: &'static str, lat: f64, lng: f64) -> Self {
        Self {
            name: Cow::Borrowed(name),
            lat,
            lng,
        }
    }

    #[must_use]
    pub fn point(&self) -> GeoPoint {
        GeoPoint {
            lat: self.lat,
            lng: self.lng,
        }
    }
}
