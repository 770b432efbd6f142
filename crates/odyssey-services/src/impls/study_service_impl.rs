// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Study service implementation.
*/

use super::{run_blocking, with_default_radius};
use crate::traits::StudyService;
use crate::types::*;
use async_trait::async_trait;
use odyssey_query::{QueryEngine, TreeRequest};
use odyssey_structures::{Citation, ClusterId, Coordinate, Pmid, Study};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Default implementation of StudyService
pub struct StudyServiceImpl {
    engine: Arc<QueryEngine>,
    default_radius: f64,
}

impl StudyServiceImpl {
    pub fn new(engine: Arc<QueryEngine>, default_radius: f64) -> Self {
        Self {
            engine,
            default_radius,
        }
    }
}

#[async_trait]
impl StudyService for StudyServiceImpl {
    async fn studies_near(
        &self,
        x: f64,
        y: f64,
        z: f64,
        radius: Option<f64>,
    ) -> ServiceResult<Vec<Pmid>> {
        debug!(
            target: "odyssey-services",
            "Resolving studies near ({}, {}, {}) radius {:?}",
            x,
            y,
            z,
            radius
        );

        let center =
            Coordinate::new(x, y, z).map_err(|e| ServiceError::InvalidInput(e.to_string()))?;
        let engine = self.engine.clone();
        run_blocking(move || {
            let pmids = engine.resolver().resolve_by_coordinate(center, radius)?;
            Ok(pmids.into_iter().collect())
        })
        .await
    }

    async fn cluster_mates(&self, pmid: Pmid) -> ServiceResult<Vec<Pmid>> {
        debug!(target: "odyssey-services", "Resolving cluster mates of {}", pmid);

        let engine = self.engine.clone();
        run_blocking(move || {
            let pmids = engine.resolver().resolve_by_cluster_mates(pmid)?;
            Ok(pmids.into_iter().collect())
        })
        .await
    }

    async fn studies_for_word(&self, word: &str) -> ServiceResult<Vec<Pmid>> {
        debug!(target: "odyssey-services", "Resolving studies for word '{}'", word);

        let engine = self.engine.clone();
        let words = BTreeSet::from([word.to_string()]);
        run_blocking(move || {
            let pmids = engine.resolver().resolve_by_words(&words)?;
            Ok(pmids.into_iter().collect())
        })
        .await
    }

    async fn studies_for_topic(&self, cluster_id: ClusterId) -> ServiceResult<Vec<Pmid>> {
        debug!(target: "odyssey-services", "Resolving studies for topic {}", cluster_id);

        let engine = self.engine.clone();
        run_blocking(move || {
            let pmids = engine.resolver().resolve_by_topic(cluster_id)?;
            Ok(pmids.into_iter().collect())
        })
        .await
    }

    async fn get_study(&self, pmid: Pmid) -> ServiceResult<Study> {
        debug!(target: "odyssey-services", "Getting study {}", pmid);

        self.engine
            .store()
            .study(pmid)?
            .ok_or_else(|| ServiceError::NotFound {
                resource: "Study".to_string(),
                id: pmid.to_string(),
            })
    }

    async fn citations(&self, request: TreeRequest) -> ServiceResult<Vec<Citation>> {
        debug!(target: "odyssey-services", "Getting citations for {}", request.root_label());

        let request = with_default_radius(request, self.default_radius);
        let engine = self.engine.clone();
        run_blocking(move || Ok(engine.citations_for(&request)?)).await
    }

    async fn locations_for_word(&self, word: &str) -> ServiceResult<WordLocations> {
        debug!(target: "odyssey-services", "Getting locations for word '{}'", word);

        let engine = self.engine.clone();
        let word = word.to_string();
        run_blocking(move || {
            let coordinates = engine.resolver().locations_for_word(&word)?;
            Ok(WordLocations::new(word, &coordinates))
        })
        .await
    }
}
