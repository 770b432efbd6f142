// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! End-to-end behaviour of the query components over a small corpus

use odyssey_query::{
    citations, CancelFlag, IntensitySettings, IntensitySource, QueryEngine, QueryError,
    QuerySettings, SpatialResolver, SpatialSettings, TreeRequest, MAX_WIDENING_STEPS,
};
use odyssey_store::{InMemoryStore, Store, StudyClusterWriter};
use odyssey_structures::{
    Activation, ClusterId, Coordinate, Location, LocationId, Pmid, Study, StudyTerm,
};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

const STUDIES: [u32; 4] = [15737663, 16481375, 17121746, 21908871];
const VERTICES: usize = 16;

fn coord(x: f64, y: f64, z: f64) -> Coordinate {
    Coordinate::new(x, y, z).unwrap()
}

fn pmids(ids: &[u32]) -> BTreeSet<Pmid> {
    ids.iter().map(|&id| Pmid::from(id)).collect()
}

fn words(ws: &[&str]) -> BTreeSet<String> {
    ws.iter().map(|w| w.to_string()).collect()
}

/// Four studies around the fusiform face area plus one far away
fn corpus() -> Arc<InMemoryStore> {
    let store = InMemoryStore::open();
    let locations = [
        (0, (40.0, -45.0, -25.0)),
        (1, (41.0, -46.0, -24.0)),
        (2, (39.0, -44.0, -26.0)),
        (3, (-60.0, 10.0, 30.0)),
        // Off-mesh location
        (100, (40.5, -45.5, -25.5)),
    ];
    for (id, (x, y, z)) in locations {
        store
            .insert_location(Location::new(LocationId::from(id), coord(x, y, z)))
            .unwrap();
    }

    for (pmid, year) in STUDIES.iter().zip([2005u16, 2006, 2006, 2011]) {
        let mut study = Study::new(Pmid::from(*pmid));
        study.authors = "Doe J".to_string();
        study.title = format!("Study {}", pmid);
        study.journal = "Neuroimage".to_string();
        study.year = Some(year);
        study.doi = format!("10.1000/{}", pmid);
        store.upsert_study(study).unwrap();
    }
    store.upsert_study(Study::new(Pmid::from(99))).unwrap();

    let activations = [
        (15737663, 0),
        (16481375, 0),
        (16481375, 1),
        (17121746, 2),
        (21908871, 1),
        (21908871, 100),
        (99, 3),
    ];
    for (pmid, location) in activations {
        store
            .insert_activation(Activation {
                pmid: Pmid::from(pmid),
                location_id: LocationId::from(location),
            })
            .unwrap();
    }

    let study_terms = [
        ("face", 15737663, 0.31),
        ("stress", 16481375, 0.648),
        ("disease", 16481375, 0.2),
        ("face", 17121746, 0.12),
        ("memory", 21908871, 0.04),
        ("stress", 21908871, 0.3),
        ("orphan", 17121746, 0.5),
        ("memory", 99, 0.9),
    ];
    for (word, pmid, f) in study_terms {
        store
            .insert_study_term(StudyTerm::new(word, Pmid::from(pmid), f).unwrap())
            .unwrap();
    }

    for (word, cluster) in [
        ("disease", 133),
        ("stress", 133),
        ("stress", 56),
        ("face", 56),
        ("face", 7),
        ("memory", 7),
    ] {
        store.insert_term_cluster(word, ClusterId::from(cluster)).unwrap();
    }

    for pmid in [16481375, 21908871] {
        store
            .set_study_cluster(Pmid::from(pmid), Some(ClusterId::from(4)))
            .unwrap();
    }
    store
        .set_study_cluster(Pmid::from(99), Some(ClusterId::from(9)))
        .unwrap();

    Arc::new(store)
}

fn engine(store: Arc<InMemoryStore>) -> QueryEngine {
    let settings = QuerySettings {
        spatial: SpatialSettings {
            radius_step: 1.0,
            max_radius: 5.0,
        },
        intensity: IntensitySettings {
            vertex_count: VERTICES,
            min_frequency: 0.05,
            cancel_check_interval: 4,
        },
        ..QuerySettings::default()
    };
    QueryEngine::new(store, settings)
}

#[test]
fn test_exact_match_and_radius_search() {
    let engine = engine(corpus());
    let resolver = engine.resolver();

    let exact = resolver
        .resolve_by_coordinate(coord(40.0, -45.0, -25.0), None)
        .unwrap();
    assert_eq!(exact, pmids(&[15737663, 16481375]));

    let nothing_exact = resolver
        .resolve_by_coordinate(coord(0.0, 0.0, 0.0), None)
        .unwrap();
    assert!(nothing_exact.is_empty());

    let near = resolver
        .resolve_by_coordinate(coord(40.0, -45.0, -25.0), Some(3.0))
        .unwrap();
    assert_eq!(near, pmids(&STUDIES));
}

#[test]
fn test_radius_widens_until_found() {
    let engine = engine(corpus());
    // Nearest location is 1.5 away on every axis: radius 1 misses, 2 hits
    let found = engine
        .resolver()
        .resolve_by_coordinate(coord(42.0, -47.0, -27.0), Some(1.0))
        .unwrap();
    assert_eq!(found, pmids(&[21908871]));
}

#[test]
fn test_radius_search_is_bounded() {
    let engine = engine(corpus());
    let err = engine
        .resolver()
        .resolve_by_coordinate(coord(0.0, 80.0, 0.0), Some(1.0))
        .unwrap_err();
    assert!(matches!(err, QueryError::EmptyRegion { max_radius, .. } if max_radius == 5.0));
    assert!(err.is_domain());
}

#[test]
fn test_widening_settings_are_capped() {
    let empty: Arc<dyn Store> = Arc::new(InMemoryStore::open());
    let origin = coord(0.0, 0.0, 0.0);

    let tiny_step = SpatialResolver::new(
        empty.clone(),
        SpatialSettings {
            radius_step: 1e-9,
            max_radius: 20.0,
        },
    );
    let err = tiny_step
        .resolve_by_coordinate(origin, Some(3.0))
        .unwrap_err();
    assert!(matches!(err, QueryError::InvalidParameters(_)));

    let unbounded = SpatialResolver::new(
        empty.clone(),
        SpatialSettings {
            radius_step: 1.0,
            max_radius: f64::INFINITY,
        },
    );
    let err = unbounded.resolve_by_coordinate(origin, Some(3.0)).unwrap_err();
    assert!(matches!(err, QueryError::InvalidParameters(_)));

    // Exactly at the cap the search still runs to EmptyRegion
    let at_cap = SpatialResolver::new(
        empty,
        SpatialSettings {
            radius_step: 1.0,
            max_radius: 1.0 + MAX_WIDENING_STEPS as f64,
        },
    );
    let err = at_cap.resolve_by_coordinate(origin, Some(1.0)).unwrap_err();
    assert!(matches!(err, QueryError::EmptyRegion { .. }));
}

#[test]
fn test_cluster_mates() {
    let engine = engine(corpus());
    let mates = engine
        .resolver()
        .resolve_by_cluster_mates(Pmid::from(16481375))
        .unwrap();
    assert_eq!(mates, pmids(&[16481375, 21908871]));

    assert_eq!(
        engine.resolver().resolve_by_cluster_mates(Pmid::from(15737663)),
        Err(QueryError::StudyNotFound(Pmid::from(15737663)))
    );
    assert_eq!(
        engine.resolver().resolve_by_cluster_mates(Pmid::from(1)),
        Err(QueryError::StudyNotFound(Pmid::from(1)))
    );
}

#[test]
fn test_word_topic_and_location_lookups() {
    let engine = engine(corpus());
    let resolver = engine.resolver();
    assert_eq!(
        resolver.resolve_by_words(&words(&["face"])).unwrap(),
        pmids(&[15737663, 17121746])
    );
    assert_eq!(
        resolver.resolve_by_topic(ClusterId::from(133)).unwrap(),
        pmids(&[16481375, 21908871])
    );
    assert!(resolver.resolve_by_topic(ClusterId::from(999)).unwrap().is_empty());

    let coordinates = resolver.locations_for_word("stress").unwrap();
    assert_eq!(
        coordinates,
        vec![
            coord(40.0, -45.0, -25.0),
            coord(41.0, -46.0, -24.0),
            coord(40.5, -45.5, -25.5)
        ]
    );
}

#[test]
fn test_stress_ranked_first() {
    let engine = engine(corpus());
    let aggregate = engine
        .terms()
        .aggregate_terms(&pmids(&STUDIES), 100, 0.05)
        .unwrap();
    assert_eq!(aggregate.ranked_terms[0], ("stress".to_string(), 0.648));
    assert_eq!(aggregate.ranked_terms.len(), 7);
    // memory (0.04) is ranked but filtered out
    assert!(aggregate.ranked_terms.iter().any(|(w, _)| w == "memory"));
    assert!(!aggregate.filtered_words.contains(&"memory".to_string()));
    assert_eq!(
        aggregate.filtered_words,
        vec!["stress", "orphan", "face", "disease"]
    );
}

#[test]
fn test_empty_pmids_aggregate_to_nothing() {
    let engine = engine(corpus());
    let aggregate = engine
        .terms()
        .aggregate_terms(&BTreeSet::new(), 100, 0.05)
        .unwrap();
    assert!(aggregate.ranked_terms.is_empty());
    assert!(aggregate.filtered_words.is_empty());
}

#[test]
fn test_limit_truncates_ranked_terms() {
    let engine = engine(corpus());
    let aggregate = engine
        .terms()
        .aggregate_terms(&pmids(&STUDIES), 2, 0.05)
        .unwrap();
    assert_eq!(aggregate.ranked_terms.len(), 2);
    assert_eq!(aggregate.filtered_words, vec!["stress", "orphan"]);
}

#[test]
fn test_disease_pairs_with_cluster_133() {
    let engine = engine(corpus());
    let topics = engine.topics();
    assert_eq!(
        topics.top_clusters(&words(&["disease"]), 12).unwrap(),
        vec![ClusterId::from(133)]
    );
    let pairs = topics
        .word_cluster_pairs(&BTreeSet::from([ClusterId::from(133)]), &words(&["disease"]))
        .unwrap();
    assert_eq!(
        pairs,
        BTreeSet::from([(ClusterId::from(133), "disease".to_string())])
    );
}

#[test]
fn test_word_without_cluster_selects_nothing() {
    let engine = engine(corpus());
    assert!(engine
        .topics()
        .top_clusters(&words(&["orphan"]), 12)
        .unwrap()
        .is_empty());
}

#[test]
fn test_top_clusters_ties_break_by_id() {
    let engine = engine(corpus());
    let ranked = engine
        .topics()
        .top_clusters(&words(&["stress", "face", "disease", "memory"]), 12)
        .unwrap();
    // 7, 56 and 133 each hold two of the words
    assert_eq!(
        ranked,
        vec![ClusterId::from(7), ClusterId::from(56), ClusterId::from(133)]
    );
    let top_two = engine
        .topics()
        .top_clusters(&words(&["stress", "face", "disease", "memory"]), 2)
        .unwrap();
    assert_eq!(top_two, vec![ClusterId::from(7), ClusterId::from(56)]);
}

#[test]
fn test_location_tree_shape() {
    let engine = engine(corpus());
    let tree = engine
        .tree_for(&TreeRequest::Location {
            x: 40.0,
            y: -45.0,
            z: -25.0,
            radius: Some(3.0),
        })
        .unwrap();

    assert_eq!(tree.label, "x: 40, y: -45, z: -25");
    assert_eq!(
        tree.cluster_ids(),
        vec![ClusterId::from(56), ClusterId::from(133), ClusterId::from(7)]
    );

    let cluster_56 = &tree.children[0];
    assert_eq!(cluster_56.label, "56");
    let labels: Vec<&str> = cluster_56.children.iter().map(|l| l.label.as_str()).collect();
    assert_eq!(labels, vec!["stress", "face"]);
    // stress appears twice in the ranked rows and accumulates
    let stress = &cluster_56.children[0];
    assert!((stress.weight - (0.648 + 0.3) * 70000.0).abs() < 1e-6);

    // memory is below the threshold and never attached
    assert_eq!(tree.children[2].children.len(), 1);
    assert_eq!(tree.children[2].children[0].label, "face");
}

#[test]
fn test_tree_for_empty_study_set_has_no_children() {
    let engine = engine(corpus());
    let tree = engine
        .tree_for(&TreeRequest::Location {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            radius: None,
        })
        .unwrap();
    assert!(tree.children.is_empty());
}

#[test]
fn test_tree_labels_per_source() {
    let engine = engine(corpus());
    let study = engine
        .tree_for(&TreeRequest::Study {
            pmid: Pmid::from(16481375),
        })
        .unwrap();
    assert_eq!(study.label, "study 16481375");
    assert_eq!(study.children[0].cluster_id, ClusterId::from(133));

    let word = engine
        .tree_for(&TreeRequest::Word {
            word: "face".to_string(),
        })
        .unwrap();
    assert_eq!(word.label, "face");

    let topic = engine
        .tree_for(&TreeRequest::Topic {
            cluster_id: ClusterId::from(56),
        })
        .unwrap();
    assert_eq!(topic.label, "topic 56");
    assert!(topic.leaf_count() > 0);
}

#[test]
fn test_citations_are_ordered_projection() {
    let store = corpus();
    let found = citations(store.as_ref(), &pmids(&[21908871, 15737663, 12345])).unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].pmid, Pmid::from(15737663));
    assert_eq!(
        found[0].text,
        "Doe J (2005). Study 15737663. Neuroimage. doi:10.1000/15737663"
    );
}

#[test]
fn test_word_intensity_is_max_normalized() {
    let engine = engine(corpus());
    let map = engine
        .intensity_map(
            &IntensitySource::Word {
                word: "stress".to_string(),
            },
            &CancelFlag::new(),
        )
        .unwrap();

    assert_eq!(map.len(), VERTICES);
    // location 1 gets 0.648 + 0.3, location 0 gets 0.648
    assert_eq!(map.values()[1], 1.0);
    assert!((map.values()[0] - 0.648 / 0.948).abs() < 1e-12);
    assert_eq!(map.values()[2], 0.0);
    assert_eq!(map.active_vertices(), 2);
}

#[test]
fn test_min_frequency_filters_rows() {
    let engine = engine(corpus());
    // memory at 21908871 is 0.04, only study 99 contributes
    let map = engine
        .intensity_map(
            &IntensitySource::Word {
                word: "memory".to_string(),
            },
            &CancelFlag::new(),
        )
        .unwrap();
    assert_eq!(map.values()[3], 1.0);
    assert_eq!(map.active_vertices(), 1);
}

#[test]
fn test_cluster_mates_intensity_counts_studies() {
    let engine = engine(corpus());
    let map = engine
        .intensity_map(
            &IntensitySource::ClusterMates {
                pmid: Pmid::from(21908871),
            },
            &CancelFlag::new(),
        )
        .unwrap();
    // location 1 is reported by both mates
    assert_eq!(map.values()[1], 1.0);
    assert_eq!(map.values()[0], 0.5);
}

#[test]
fn test_topic_without_words_has_no_data() {
    let engine = engine(corpus());
    let err = engine
        .intensity_map(
            &IntensitySource::Topic {
                cluster_id: ClusterId::from(999),
            },
            &CancelFlag::new(),
        )
        .unwrap_err();
    assert_eq!(err, QueryError::NoActivationData);
}

#[test]
fn test_clear_is_all_zero_with_vertex_count_entries() {
    let engine = engine(corpus());
    let map = engine
        .intensity_map(&IntensitySource::Clear, &CancelFlag::new())
        .unwrap();
    assert_eq!(map.len(), VERTICES);
    assert!(map.is_all_zero());
}

#[test]
fn test_intensity_is_idempotent() {
    let engine = engine(corpus());
    let source = IntensitySource::Words {
        words: vec!["face".to_string(), "stress".to_string()],
    };
    let first = engine.intensity_map(&source, &CancelFlag::new()).unwrap();
    let second = engine.intensity_map(&source, &CancelFlag::new()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_cancelled_intensity_request() {
    let engine = engine(corpus());
    let cancel = CancelFlag::new();
    cancel.cancel();
    let err = engine
        .intensity_map(
            &IntensitySource::Word {
                word: "face".to_string(),
            },
            &cancel,
        )
        .unwrap_err();
    assert_eq!(err, QueryError::Cancelled);
}

#[test]
fn test_closed_store_surfaces_infrastructure_error() {
    let store = corpus();
    let engine = engine(store.clone());
    store.close();
    let err = engine
        .resolver()
        .resolve_by_coordinate(coord(40.0, -45.0, -25.0), Some(3.0))
        .unwrap_err();
    assert!(matches!(err, QueryError::Store(_)));
    assert!(!err.is_domain());
}

fn arbitrary_corpus() -> impl Strategy<Value = Vec<(u8, u8, u8, u32)>> {
    // (word index, study index, cluster index, frequency per mille)
    prop::collection::vec((0u8..8, 0u8..6, 0u8..5, 0u32..=1000), 1..40)
}

proptest! {
    #[test]
    fn prop_ranking_and_selection_invariants(rows in arbitrary_corpus(), threshold in 0u32..500) {
        let store = InMemoryStore::open();
        for pmid in 0..6u32 {
            store.upsert_study(Study::new(Pmid::from(pmid))).unwrap();
        }
        for (word, pmid, cluster, per_mille) in &rows {
            let word = format!("w{}", word);
            let row = StudyTerm::new(
                word.clone(),
                Pmid::from(*pmid as u32),
                *per_mille as f64 / 1000.0,
            )
            .unwrap();
            // Duplicate (word, study) pairs are rejected; keep the first
            let _ = store.insert_study_term(row);
            store.insert_term_cluster(&word, ClusterId::from(*cluster as u32)).unwrap();
        }
        let store: Arc<dyn Store> = Arc::new(store);
        let engine = QueryEngine::new(store, QuerySettings::default());
        let threshold = threshold as f64 / 1000.0;

        let all: BTreeSet<Pmid> = (0..6u32).map(Pmid::from).collect();
        let aggregate = engine.terms().aggregate_terms(&all, 100, threshold).unwrap();
        for pair in aggregate.ranked_terms.windows(2) {
            prop_assert!(pair[0].1 >= pair[1].1);
        }
        for word in &aggregate.filtered_words {
            prop_assert!(aggregate
                .ranked_terms
                .iter()
                .any(|(w, f)| w == word && *f > threshold));
        }

        let word_set = aggregate.filtered_word_set();
        let clusters = engine.topics().top_clusters(&word_set, 12).unwrap();
        let cluster_set: BTreeSet<ClusterId> = clusters.iter().copied().collect();
        let pairs = engine.topics().word_cluster_pairs(&cluster_set, &word_set).unwrap();
        for cluster in &clusters {
            prop_assert!(pairs.iter().any(|(c, _)| c == cluster));
        }
    }
}
