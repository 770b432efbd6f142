// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Wiring of the default services over one store.

use crate::impls::{
    ClusteringServiceImpl, StudyServiceImpl, TopicServiceImpl, VisualizationServiceImpl,
};
use crate::traits::{ClusteringService, StudyService, TopicService, VisualizationService};
use crate::types::ServiceSettings;
use odyssey_config::OdysseyConfig;
use odyssey_query::QueryEngine;
use odyssey_store::{Store, StudyClusterWriter};
use std::sync::Arc;
use tracing::info;

/// Every service an adapter needs, sharing one query engine
#[derive(Clone)]
pub struct ServiceRegistry {
    pub studies: Arc<dyn StudyService>,
    pub topics: Arc<dyn TopicService>,
    pub visualization: Arc<dyn VisualizationService>,
    pub clustering: Arc<dyn ClusteringService>,
}

impl ServiceRegistry {
    pub fn new<S>(store: Arc<S>, settings: &ServiceSettings) -> Self
    where
        S: Store + StudyClusterWriter + 'static,
    {
        let reader: Arc<dyn Store> = store.clone();
        let writer: Arc<dyn StudyClusterWriter> = store;
        let engine = Arc::new(QueryEngine::new(reader, settings.query));

        info!(
            target: "odyssey-services",
            "Services ready (default radius {}, max radius {}, timeout {:?})",
            settings.default_radius,
            settings.query.spatial.max_radius,
            settings.request_timeout
        );

        Self {
            studies: Arc::new(StudyServiceImpl::new(engine.clone(), settings.default_radius)),
            topics: Arc::new(TopicServiceImpl::new(engine.clone(), settings.top_n)),
            visualization: Arc::new(VisualizationServiceImpl::new(
                engine,
                settings.default_radius,
                settings.request_timeout,
            )),
            clustering: Arc::new(ClusteringServiceImpl::new(
                writer,
                settings.clustering,
                settings.k_candidates.clone(),
            )),
        }
    }

    pub fn from_config<S>(store: Arc<S>, config: &OdysseyConfig) -> Self
    where
        S: Store + StudyClusterWriter + 'static,
    {
        Self::new(store, &ServiceSettings::from(config))
    }
}
