// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Runtime settings of the services, derived from [`OdysseyConfig`].

use odyssey_clustering::{ClusteringSettings, KMeansSettings};
use odyssey_config::OdysseyConfig;
use odyssey_query::{
    IntensitySettings, QuerySettings, SpatialSettings, TermSettings, TreeSettings,
};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSettings {
    pub query: QuerySettings,
    /// Radius for location requests that do not name one
    pub default_radius: f64,
    /// Clusters kept by topic selection
    pub top_n: usize,
    /// Bound on a single intensity request
    pub request_timeout: Duration,
    pub clustering: ClusteringSettings,
    pub k_candidates: Vec<usize>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self::from(&OdysseyConfig::default())
    }
}

impl From<&OdysseyConfig> for ServiceSettings {
    fn from(config: &OdysseyConfig) -> Self {
        let query = QuerySettings {
            spatial: SpatialSettings {
                radius_step: config.spatial.radius_step,
                max_radius: config.spatial.max_radius,
            },
            terms: TermSettings {
                limit: config.terms.limit,
                freq_threshold: config.terms.freq_threshold,
            },
            tree: TreeSettings {
                top_n: config.topics.top_n,
                scale: config.tree.scale,
            },
            intensity: IntensitySettings {
                vertex_count: config.intensity.vertex_count,
                min_frequency: config.intensity.min_frequency,
                cancel_check_interval: config.intensity.cancel_check_interval,
            },
        };
        let clustering = ClusteringSettings {
            dims: config.clustering.dims,
            svd_iterations: config.clustering.svd_iterations,
            kmeans: KMeansSettings {
                max_iter: config.clustering.max_iter,
                n_init: config.clustering.n_init,
                tolerance: config.clustering.tolerance,
                seed: config.clustering.seed,
            },
        };
        Self {
            query,
            default_radius: config.spatial.default_radius,
            top_n: config.topics.top_n,
            request_timeout: Duration::from_millis(config.intensity.request_timeout_ms),
            clustering,
            k_candidates: config.clustering.k_candidates.clone(),
        }
    }
}
