// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Behaviour of the in-memory store through the public `Store` trait

use odyssey_store::{InMemoryStore, Store, StoreError, StudyClusterWriter};
use odyssey_structures::{
    Activation, ClusterId, Coordinate, Cube, Location, LocationId, Pmid, Study, StudyTerm,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn coord(x: f64, y: f64, z: f64) -> Coordinate {
    Coordinate::new(x, y, z).unwrap()
}

fn pmids(ids: &[u32]) -> BTreeSet<Pmid> {
    ids.iter().map(|&id| Pmid::from(id)).collect()
}

fn words(ws: &[&str]) -> BTreeSet<String> {
    ws.iter().map(|w| w.to_string()).collect()
}

/// Two studies sharing one location, a third elsewhere
fn seeded_store() -> InMemoryStore {
    let store = InMemoryStore::open();
    store
        .insert_location(
            Location::new(LocationId::from(0), coord(40.0, -45.0, -25.0)).with_space("MNI"),
        )
        .unwrap();
    store
        .insert_location(Location::new(LocationId::from(1), coord(-30.0, 10.0, 5.0)))
        .unwrap();

    for id in [101, 102, 103] {
        store.upsert_study(Study::new(Pmid::from(id))).unwrap();
    }
    for (pmid, loc) in [(101, 0), (102, 0), (103, 1)] {
        store
            .insert_activation(Activation {
                pmid: Pmid::from(pmid),
                location_id: LocationId::from(loc),
            })
            .unwrap();
    }

    for (word, pmid, f) in [
        ("memory", 101, 0.4),
        ("stress", 101, 0.648),
        ("fear", 102, 0.4),
        ("memory", 103, 0.2),
    ] {
        store
            .insert_study_term(StudyTerm::new(word, Pmid::from(pmid), f).unwrap())
            .unwrap();
    }

    store.insert_term_cluster("stress", ClusterId::from(133)).unwrap();
    store.insert_term_cluster("fear", ClusterId::from(133)).unwrap();
    store.insert_term_cluster("memory", ClusterId::from(7)).unwrap();
    store
}

#[test]
fn test_exact_and_cube_lookups() {
    let store = seeded_store();
    assert_eq!(store.pmids_at(&coord(40.0, -45.0, -25.0)).unwrap(), pmids(&[101, 102]));
    assert!(store.pmids_at(&coord(40.0, -45.0, -24.0)).unwrap().is_empty());

    let cube = Cube::new(coord(41.0, -44.0, -26.0), 3.0).unwrap();
    assert_eq!(store.pmids_in_cube(&cube).unwrap(), pmids(&[101, 102]));

    // Boundary is exclusive
    let edge = Cube::new(coord(43.0, -45.0, -25.0), 3.0).unwrap();
    assert!(store.pmids_in_cube(&edge).unwrap().is_empty());
}

#[test]
fn test_location_at_respects_space() {
    let store = seeded_store();
    let c = coord(40.0, -45.0, -25.0);
    assert!(store.location_at(&c, Some("MNI")).unwrap().is_some());
    assert!(store.location_at(&c, Some("TAL")).unwrap().is_none());
    assert!(store.location_at(&c, None).unwrap().is_some());
}

#[test]
fn test_study_terms_ordered_by_frequency_then_insertion() {
    let store = seeded_store();
    let rows = store
        .study_terms_for_pmids(&pmids(&[101, 102]), None)
        .unwrap();
    let ordered: Vec<(&str, f64)> = rows.iter().map(|r| (r.word.as_str(), r.frequency)).collect();
    assert_eq!(ordered, vec![("stress", 0.648), ("memory", 0.4), ("fear", 0.4)]);

    let limited = store.study_terms_for_pmids(&pmids(&[101, 102]), Some(1)).unwrap();
    assert_eq!(limited.len(), 1);

    let by_word = store.study_terms_for_words(&words(&["memory"]), None).unwrap();
    assert_eq!(by_word.len(), 2);
    assert_eq!(by_word[0].pmid, Pmid::from(101));
}

#[test]
fn test_duplicate_study_term_is_integrity_error() {
    let store = seeded_store();
    let dup = StudyTerm::new("stress", Pmid::from(101), 0.1).unwrap();
    assert!(matches!(store.insert_study_term(dup), Err(StoreError::Integrity(_))));

    let orphan = StudyTerm::new("stress", Pmid::from(999), 0.1).unwrap();
    assert!(matches!(store.insert_study_term(orphan), Err(StoreError::Integrity(_))));
}

#[test]
fn test_term_cluster_requires_known_term() {
    let store = seeded_store();
    assert!(matches!(
        store.insert_term_cluster("unknown", ClusterId::from(1)),
        Err(StoreError::Integrity(_))
    ));
    assert!(store.has_term("stress").unwrap());
    assert!(!store.has_term("unknown").unwrap());
}

#[test]
fn test_cluster_counts_and_pairs() {
    let store = seeded_store();
    let counts = store
        .cluster_counts_for_words(&words(&["stress", "fear", "memory", "nothing"]), 12)
        .unwrap();
    assert_eq!(counts, vec![(ClusterId::from(133), 2), (ClusterId::from(7), 1)]);

    let top_one = store.cluster_counts_for_words(&words(&["memory"]), 1).unwrap();
    assert_eq!(top_one, vec![(ClusterId::from(7), 1)]);

    let pairs = store
        .term_cluster_pairs(
            &[ClusterId::from(133)].into_iter().collect(),
            &words(&["stress", "memory"]),
        )
        .unwrap();
    assert_eq!(pairs.len(), 1);
    assert!(pairs.contains(&(ClusterId::from(133), "stress".to_string())));

    assert_eq!(store.words_in_cluster(ClusterId::from(133)).unwrap(), words(&["fear", "stress"]));
    assert!(store.words_in_cluster(ClusterId::from(5)).unwrap().is_empty());
}

#[test]
fn test_study_cluster_assignment() {
    let store = seeded_store();
    assert!(store.set_study_cluster(Pmid::from(101), Some(ClusterId::from(4))).unwrap());
    assert!(store.set_study_cluster(Pmid::from(103), Some(ClusterId::from(4))).unwrap());
    assert!(!store.set_study_cluster(Pmid::from(999), Some(ClusterId::from(4))).unwrap());

    assert_eq!(store.pmids_in_study_cluster(ClusterId::from(4)).unwrap(), pmids(&[101, 103]));

    store.set_study_cluster(Pmid::from(101), None).unwrap();
    assert_eq!(store.pmids_in_study_cluster(ClusterId::from(4)).unwrap(), pmids(&[103]));
}

#[test]
fn test_delete_study_cascades() {
    let store = seeded_store();
    let before = store.stats();
    assert!(store.delete_study(Pmid::from(101)).unwrap());
    assert!(!store.delete_study(Pmid::from(101)).unwrap());

    let after = store.stats();
    assert_eq!(after.studies, before.studies - 1);
    assert_eq!(after.activations, before.activations - 1);
    assert_eq!(after.study_terms, before.study_terms - 2);
    assert_eq!(after.locations, before.locations);

    assert_eq!(store.pmids_at(&coord(40.0, -45.0, -25.0)).unwrap(), pmids(&[102]));
    let memory = store.study_terms_for_words(&words(&["memory"]), None).unwrap();
    assert_eq!(memory.len(), 1);

    // The pair may be recorded again once the study is back
    store.upsert_study(Study::new(Pmid::from(101))).unwrap();
    store
        .insert_study_term(StudyTerm::new("stress", Pmid::from(101), 0.5).unwrap())
        .unwrap();
}

#[test]
fn test_duplicate_activation_is_ignored() {
    let store = seeded_store();
    let a = Activation {
        pmid: Pmid::from(101),
        location_id: LocationId::from(0),
    };
    store.insert_activation(a).unwrap();
    assert_eq!(store.stats().activations, 3);
    assert_eq!(store.activations_for_pmids(&pmids(&[101])).unwrap(), vec![a]);
}

#[test]
fn test_closed_store_rejects_reads_and_writes() {
    let store = seeded_store();
    store.close();
    assert_eq!(store.pmids_at(&coord(0.0, 0.0, 0.0)), Err(StoreError::Closed));
    assert_eq!(store.insert_term("late"), Err(StoreError::Closed));
    assert_eq!(store.studies(&pmids(&[101])), Err(StoreError::Closed));
}

proptest! {
    #[test]
    fn prop_cube_scan_matches_brute_force(
        points in prop::collection::vec((-20i32..20, -20i32..20, -20i32..20), 1..40),
        center in (-20i32..20, -20i32..20, -20i32..20),
        radius in 1u32..10,
    ) {
        let store = InMemoryStore::open();
        let mut expected = BTreeSet::new();
        let center = coord(center.0 as f64, center.1 as f64, center.2 as f64);
        let cube = Cube::new(center, radius as f64).unwrap();

        for (i, (x, y, z)) in points.iter().enumerate() {
            let c = coord(*x as f64, *y as f64, *z as f64);
            let id = i as u32;
            store.insert_location(Location::new(LocationId::from(id), c)).unwrap();
            store.upsert_study(Study::new(Pmid::from(id))).unwrap();
            store
                .insert_activation(Activation {
                    pmid: Pmid::from(id),
                    location_id: LocationId::from(id),
                })
                .unwrap();
            if cube.contains(&c) {
                expected.insert(Pmid::from(id));
            }
        }

        prop_assert_eq!(store.pmids_in_cube(&cube).unwrap(), expected);
    }
}
