//! Aggregation pipeline: source, pad, filter, sort, window.

use std::cmp::Ordering;
use std::time::Duration;

use futures::future::join_all;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use shoprank_core::{Category, FallbackMode, Platform, ProductRecord, SortKey};
use shoprank_scraper::NormalizeContext;

use crate::error::PipelineError;
use crate::registry::{PlatformDescriptor, Registry, Upstream};
use crate::synthetic::generate;

/// One ranking request after parameter validation.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRequest {
    pub platform: Platform,
    pub category: Option<Category>,
    pub sort: SortKey,
    /// 0-based index of the first record returned.
    pub offset: usize,
    /// Window length.
    pub count: usize,
    /// Free-text search term for live sources.
    pub query: Option<String>,
    pub mode: FallbackMode,
}

/// Where the records of a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Live,
    Mixed,
    Synthetic,
}

impl DataSource {
    fn from_counts(live: usize, total: usize) -> Self {
        match live {
            0 => DataSource::Synthetic,
            n if n >= total => DataSource::Live,
            _ => DataSource::Mixed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub products: Vec<ProductRecord>,
    /// Records matching the category filter before windowing.
    pub total: usize,
    pub source: DataSource,
    /// Human-readable explanations of fallbacks, in the order they happened.
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PipelineSettings {
    /// Pause between sequential upstream calls.
    pub inter_request_delay: Duration,
    /// Fixed generator seed; `None` draws from the thread RNG.
    pub synthetic_seed: Option<u64>,
}

/// A catalog record tagged with whether an upstream search produced it.
struct Sourced {
    record: ProductRecord,
    live: bool,
}

/// Unfiltered per-platform catalog in source rank order.
struct Catalog {
    records: Vec<Sourced>,
    notes: Vec<String>,
}

pub struct AggregationPipeline {
    registry: Registry,
    settings: PipelineSettings,
}

impl AggregationPipeline {
    #[must_use]
    pub fn new(registry: Registry, settings: PipelineSettings) -> Self {
        Self { registry, settings }
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Builds the ranking for a single platform.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Unavailable`] in strict mode when the platform's
    ///   live integration has no credentials.
    /// - [`PipelineError::Unregistered`] if the registry lacks the platform.
    pub async fn run(&self, request: &PipelineRequest) -> Result<PipelineOutput, PipelineError> {
        let descriptor = self
            .registry
            .get(request.platform)
            .ok_or(PipelineError::Unregistered(request.platform.id()))?;

        let target = descriptor
            .catalog_size
            .max(request.offset.saturating_add(request.count));
        let catalog = self.build_catalog(descriptor, request, target).await?;

        Ok(finish(catalog.records, catalog.notes, request))
    }

    /// Builds the combined "all platforms" ranking.
    ///
    /// Catalogs are built concurrently and interleaved by rank, so position
    /// N of every platform precedes position N+1 of any platform. Platforms
    /// that strict mode refuses are skipped with a note. `request.platform`
    /// is not consulted.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Unavailable`] when every platform was refused.
    pub async fn run_all(&self, request: &PipelineRequest) -> Result<PipelineOutput, PipelineError> {
        let descriptors: Vec<&PlatformDescriptor> = self.registry.iter().collect();
        let wanted = request.offset.saturating_add(request.count);
        let share = wanted.div_ceil(descriptors.len().max(1));

        let builds = descriptors.iter().map(|descriptor| {
            let target = descriptor.catalog_size.max(share);
            self.build_catalog(descriptor, request, target)
        });
        let results = join_all(builds).await;

        let mut records = Vec::new();
        let mut notes = Vec::new();
        let mut refused = Vec::new();
        for (descriptor, result) in descriptors.iter().zip(results) {
            match result {
                Ok(catalog) => {
                    records.extend(catalog.records);
                    notes.extend(catalog.notes);
                }
                Err(err) => {
                    tracing::info!(
                        platform = descriptor.platform.id(),
                        error = %err,
                        "platform skipped in aggregate ranking"
                    );
                    notes.push(format!("{} skipped: {err}", descriptor.platform.display_name()));
                    refused.push(err);
                }
            }
        }

        if !descriptors.is_empty() && refused.len() == descriptors.len() {
            return Err(PipelineError::Unavailable {
                platform: "all",
                reason: "no platform can serve live data and strict mode forbids synthetic data"
                    .to_string(),
            });
        }

        // Stable: equal ranks keep platform registration order.
        records.sort_by_key(|s| s.record.rank);
        Ok(finish(records, notes, request))
    }

    async fn build_catalog(
        &self,
        descriptor: &PlatformDescriptor,
        request: &PipelineRequest,
        target: usize,
    ) -> Result<Catalog, PipelineError> {
        let platform = descriptor.platform;
        let name = platform.display_name();
        let mut records = Vec::with_capacity(target);
        let mut notes = Vec::new();

        match &descriptor.upstream {
            Upstream::Ready(client) => {
                let terms = search_terms(descriptor, request);
                let gathered = client
                    .accumulate(&terms, target, request.sort, self.settings.inter_request_delay)
                    .await;

                if let Some(err) = &gathered.error {
                    tracing::warn!(
                        platform = platform.id(),
                        error = %err,
                        gathered = gathered.items.len(),
                        "upstream search failed; falling back to synthetic data"
                    );
                    notes.push(format!(
                        "{name} live search failed ({err}); synthetic data fills the remainder"
                    ));
                }

                records.extend(gathered.items.into_iter().enumerate().map(|(idx, raw)| {
                    let ctx = NormalizeContext {
                        platform,
                        rank: rank_at(idx),
                        keywords: descriptor.keywords,
                    };
                    Sourced {
                        record: (descriptor.normalize)(raw, &ctx),
                        live: true,
                    }
                }));
            }
            Upstream::Unconfigured => match request.mode {
                FallbackMode::Strict => {
                    return Err(PipelineError::Unavailable {
                        platform: platform.id(),
                        reason: format!("{name} API credentials are not configured"),
                    });
                }
                FallbackMode::Lenient => {
                    tracing::info!(
                        platform = platform.id(),
                        "credentials not configured; serving synthetic data"
                    );
                    notes.push(format!(
                        "{name} API credentials are not configured; showing synthetic data"
                    ));
                }
            },
            Upstream::Unsupported => {
                notes.push(format!("{name} has no live integration; showing synthetic data"));
            }
        }

        let live = records.len();
        if live > 0 && live < target {
            notes.push(format!(
                "{name} returned {live} live items; synthetic data fills the remainder"
            ));
        }
        if live < target {
            let mut rng = self.rng_for(platform);
            records.extend(
                generate(
                    descriptor.profile,
                    platform,
                    target - live,
                    rank_at(live),
                    &mut rng,
                )
                .into_iter()
                .map(|record| Sourced {
                    record,
                    live: false,
                }),
            );
        }

        Ok(Catalog { records, notes })
    }

    fn rng_for(&self, platform: Platform) -> StdRng {
        match self.settings.synthetic_seed {
            Some(seed) => {
                let salt = Platform::ALL
                    .iter()
                    .position(|p| *p == platform)
                    .and_then(|i| u64::try_from(i).ok())
                    .unwrap_or(0);
                StdRng::seed_from_u64(seed.wrapping_add(salt))
            }
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }
}

/// 1-based rank for a 0-based position.
fn rank_at(idx: usize) -> u32 {
    u32::try_from(idx).map_or(u32::MAX, |i| i.saturating_add(1))
}

fn search_terms(descriptor: &PlatformDescriptor, request: &PipelineRequest) -> Vec<String> {
    if let Some(query) = request.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        return vec![query.to_string()];
    }
    let terms = match request.category {
        Some(category) => category.search_terms(),
        None => descriptor.default_terms,
    };
    terms.iter().map(|t| (*t).to_string()).collect()
}

/// Steps shared by single and aggregate runs: filter, sort, window, re-rank.
///
/// `source` describes the returned window, not the whole catalog.
fn finish(mut records: Vec<Sourced>, notes: Vec<String>, request: &PipelineRequest) -> PipelineOutput {
    if let Some(category) = request.category {
        records.retain(|s| s.record.category == category);
    }
    if let Some(by) = ordering(request.sort) {
        records.sort_by(|a, b| by(&a.record, &b.record));
    }

    let total = records.len();
    let start = request.offset.min(total);
    let end = request.offset.saturating_add(request.count).min(total);
    let window: Vec<Sourced> = records.drain(start..end).collect();
    let live = window.iter().filter(|s| s.live).count();

    let products: Vec<ProductRecord> = window
        .into_iter()
        .enumerate()
        .map(|(idx, s)| ProductRecord {
            rank: rank_at(start + idx),
            ..s.record
        })
        .collect();

    PipelineOutput {
        source: DataSource::from_counts(live, products.len()),
        products,
        total,
        notes,
    }
}

/// Comparator for `sort`, or `None` when source order already satisfies it.
fn ordering(sort: SortKey) -> Option<fn(&ProductRecord, &ProductRecord) -> Ordering> {
    let by: fn(&ProductRecord, &ProductRecord) -> Ordering = match sort {
        SortKey::Rank | SortKey::Recency => return None,
        SortKey::Popularity => |a, b| b.popularity().total_cmp(&a.popularity()),
        SortKey::Rating => |a, b| b.rating.total_cmp(&a.rating),
        SortKey::PriceAsc => |a, b| a.price.cmp(&b.price),
        SortKey::PriceDesc => |a, b| b.price.cmp(&a.price),
    };
    Some(by)
}

/// Stable sort; ties keep source rank order.
pub fn sort_records(records: &mut [ProductRecord], sort: SortKey) {
    if let Some(by) = ordering(sort) {
        records.sort_by(by);
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
