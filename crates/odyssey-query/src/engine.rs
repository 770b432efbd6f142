// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Wiring of the query components over one store handle.
*/

use crate::citations::citations;
use crate::error::QueryResult;
use crate::intensity::{CancelFlag, IntensityMapper, IntensitySettings, IntensitySource};
use crate::spatial::{SpatialResolver, SpatialSettings};
use crate::terms::{TermAggregator, TermSettings};
use crate::topics::TopicSelector;
use crate::tree::{TreeAssembler, TreeRequest, TreeSettings};
use odyssey_store::Store;
use odyssey_structures::{Citation, ClusterTree, Coordinate, IntensityMap, Pmid};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Settings of every query component
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QuerySettings {
    pub spatial: SpatialSettings,
    pub terms: TermSettings,
    pub tree: TreeSettings,
    pub intensity: IntensitySettings,
}

/// All query components sharing one store
pub struct QueryEngine {
    store: Arc<dyn Store>,
    resolver: Arc<SpatialResolver>,
    terms: TermAggregator,
    topics: TopicSelector,
    trees: TreeAssembler,
    intensity: IntensityMapper,
}

impl QueryEngine {
    pub fn new(store: Arc<dyn Store>, settings: QuerySettings) -> Self {
        let resolver = Arc::new(SpatialResolver::new(store.clone(), settings.spatial));
        let trees = TreeAssembler::new(
            TermAggregator::new(store.clone(), settings.terms),
            TopicSelector::new(store.clone()),
            settings.tree,
        );
        Self {
            terms: TermAggregator::new(store.clone(), settings.terms),
            topics: TopicSelector::new(store.clone()),
            intensity: IntensityMapper::new(store.clone(), resolver.clone(), settings.intensity),
            trees,
            resolver,
            store,
        }
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    pub fn resolver(&self) -> &SpatialResolver {
        &self.resolver
    }

    pub fn terms(&self) -> &TermAggregator {
        &self.terms
    }

    pub fn topics(&self) -> &TopicSelector {
        &self.topics
    }

    pub fn trees(&self) -> &TreeAssembler {
        &self.trees
    }

    pub fn intensity(&self) -> &IntensityMapper {
        &self.intensity
    }

    /// Studies selected by a tree request
    pub fn pmids_for(&self, request: &TreeRequest) -> QueryResult<BTreeSet<Pmid>> {
        match request {
            TreeRequest::Location { x, y, z, radius } => {
                let center = Coordinate::new(*x, *y, *z)?;
                self.resolver.resolve_by_coordinate(center, *radius)
            }
            TreeRequest::Study { pmid } => self.resolver.resolve_by_cluster_mates(*pmid),
            TreeRequest::Word { word } => self
                .resolver
                .resolve_by_words(&BTreeSet::from([word.clone()])),
            TreeRequest::Topic { cluster_id } => self.resolver.resolve_by_topic(*cluster_id),
        }
    }

    /// Tree for a request, weighted with the configured scale
    pub fn tree_for(&self, request: &TreeRequest) -> QueryResult<ClusterTree> {
        let pmids = self.pmids_for(request)?;
        let scale = self.trees.settings().scale;
        self.trees.build_tree(request.root_label(), &pmids, scale)
    }

    pub fn citations_for(&self, request: &TreeRequest) -> QueryResult<Vec<Citation>> {
        let pmids = self.pmids_for(request)?;
        citations(self.store.as_ref(), &pmids)
    }

    pub fn intensity_map(
        &self,
        source: &IntensitySource,
        cancel: &CancelFlag,
    ) -> QueryResult<IntensityMap> {
        self.intensity.build_intensity_map(source, cancel)
    }
}
