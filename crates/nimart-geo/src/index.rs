//! Per-request provider index: distance enrichment, filtering and ordering.
//!
//! Input is one bounded batch of rows from the provider store (a page of at
//! most a few hundred records), so every operation here is a linear scan or
//! a sort over that batch.

use std::collections::HashSet;

use crate::distance::distance_km;
use crate::types::{GeoPoint, IndexedProvider, MapFilterCriteria, Provider, VerificationStatus};

/// Providers for one query, each tagged with its distance from `origin`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoIndex {
    entries: Vec<IndexedProvider>,
    origin: Option<GeoPoint>,
}

impl GeoIndex {
    /// Attach `distance_km` to every provider that has a location, when an
    /// origin is given. Providers without a location pass through untouched.
    ///
    /// An invalid origin is ignored, as if none had been supplied.
    #[must_use]
    pub fn build(providers: Vec<Provider>, origin: Option<GeoPoint>) -> Self {
        let origin = origin.filter(GeoPoint::is_valid);
        let entries = providers
            .into_iter()
            .map(|provider| {
                let distance = origin
                    .zip(provider.location())
                    .map(|(from, to)| distance_km(from, to));
                IndexedProvider {
                    provider,
                    distance_km: distance,
                }
            })
            .collect();
        Self { entries, origin }
    }

    #[must_use]
    pub fn origin(&self) -> Option<GeoPoint> {
        self.origin
    }

    #[must_use]
    pub fn entries(&self) -> &[IndexedProvider] {
        &self.entries
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<IndexedProvider> {
        self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries matching every criterion, in index order.
    ///
    /// Checks run in this order and stop at the first failure: service type
    /// (case-insensitive substring), verification status, minimum rating,
    /// online-only, then radius. The radius only applies when the index was
    /// built with an origin; in that case a provider without a distance is
    /// dropped.
    #[must_use]
    pub fn filter(&self, criteria: &MapFilterCriteria) -> Vec<IndexedProvider> {
        let service_type = criteria
            .service_type
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        self.entries
            .iter()
            .filter(|entry| {
                let p = &entry.provider;
                if let Some(wanted) = service_type.as_deref() {
                    let matches = p
                        .service_type
                        .as_deref()
                        .is_some_and(|s| s.to_lowercase().contains(wanted));
                    if !matches {
                        return false;
                    }
                }
                if !criteria.verification_status.matches(p.verification_status) {
                    return false;
                }
                // NaN on either side fails the check.
                let meets_rating = p.rating() >= criteria.min_rating;
                if !meets_rating {
                    return false;
                }
                if criteria.online_only && !p.is_online() {
                    return false;
                }
                if self.origin.is_some() {
                    return entry
                        .distance_km
                        .is_some_and(|d| d <= criteria.max_distance_km);
                }
                true
            })
            .cloned()
            .collect()
    }

    /// Entries with a distance, nearest first. See [`sort_by_distance`].
    #[must_use]
    pub fn sort_by_distance(&self) -> Vec<IndexedProvider> {
        sort_by_distance(self.entries.clone())
    }
}

/// Stable ascending sort by `distance_km`.
///
/// Entries without a distance are removed rather than placed anywhere.
#[must_use]
pub fn sort_by_distance(entries: Vec<IndexedProvider>) -> Vec<IndexedProvider> {
    let mut ranged: Vec<(f64, IndexedProvider)> = entries
        .into_iter()
        .filter_map(|entry| entry.distance_km.map(|d| (d, entry)))
        .collect();
    ranged.sort_by(|a, b| a.0.total_cmp(&b.0));
    ranged.into_iter().map(|(_, entry)| entry).collect()
}

/// Baseline rule for anything shown on the public map.
///
/// Accounts still confirming their email and demo accounts never appear, and
/// neither does a provider that switched map visibility off. This is not a
/// user-facing filter.
#[must_use]
pub fn is_map_visible(provider: &Provider) -> bool {
    !matches!(
        provider.verification_status,
        VerificationStatus::PendingEmail | VerificationStatus::Demo
    ) && provider.is_map_visible()
}

/// Keep the first record for each provider id.
#[must_use]
pub fn dedupe_by_id(providers: Vec<Provider>) -> Vec<Provider> {
    let mut seen = HashSet::new();
    providers
        .into_iter()
        .filter(|p| seen.insert(p.id.clone()))
        .collect()
}

/// The map listing pipeline.
///
/// Drops duplicate ids, applies the baseline visibility rule, builds the
/// index, filters by `criteria` and, when an origin is given, orders the
/// result nearest first. Without an origin the input order is kept.
///
/// Dedupe runs first so a hidden record cannot be replaced by a later
/// visible duplicate of the same id.
#[must_use]
pub fn discover(
    providers: Vec<Provider>,
    origin: Option<GeoPoint>,
    criteria: &MapFilterCriteria,
) -> Vec<IndexedProvider> {
    let candidates = providers.len();
    let visible: Vec<Provider> = dedupe_by_id(providers)
        .into_iter()
        .filter(is_map_visible)
        .collect();
    let visible_count = visible.len();

    let index = GeoIndex::build(visible, origin);
    let matched = index.filter(criteria);
    let matched_count = matched.len();

    let result = if index.origin().is_some() {
        sort_by_distance(matched)
    } else {
        matched
    };

    tracing::debug!(
        candidates,
        visible = visible_count,
        matched = matched_count,
        has_origin = index.origin().is_some(),
        "provider discovery complete"
    );
    result
}

#[cfg(test)]
#[path = "index_test.rs"]
mod tests;
