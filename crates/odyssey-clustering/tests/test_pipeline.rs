// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Clustering pipeline over synthetic topic groups

use ndarray::Array2;
use odyssey_clustering::{
    ClusteringError, ClusteringPipeline, ClusteringSettings, KMeansSettings, StudyClusterAssignment,
    TermMatrix,
};
use odyssey_store::{InMemoryStore, Store};
use odyssey_structures::{ClusterId, Pmid, Study, StudyTerm};
use std::collections::BTreeSet;
use tempfile::tempdir;

const GROUPS: usize = 3;
const STUDIES: usize = 12;
const TERMS_PER_GROUP: usize = 3;

/// Study `i` mentions only the terms of group `i % 3`
fn grouped_matrix() -> TermMatrix {
    let terms: Vec<String> = (0..GROUPS * TERMS_PER_GROUP).map(|t| format!("term{}", t)).collect();
    let pmids: Vec<Pmid> = (0..STUDIES as u32).map(|i| Pmid::from(1000 + i)).collect();
    let values = Array2::from_shape_fn((STUDIES, terms.len()), |(i, t)| {
        if t / TERMS_PER_GROUP == i % GROUPS {
            0.3 + 0.01 * (i as f64) + 0.02 * (t % TERMS_PER_GROUP) as f64
        } else {
            0.0
        }
    });
    TermMatrix::new(pmids, terms, values).unwrap()
}

fn pipeline() -> ClusteringPipeline {
    ClusteringPipeline::new(ClusteringSettings {
        dims: 3,
        svd_iterations: 7,
        kmeans: KMeansSettings {
            n_init: 5,
            ..KMeansSettings::default()
        },
    })
}

fn same_partition(assignment: &StudyClusterAssignment) {
    let labels: Vec<ClusterId> = assignment.entries().iter().map(|(_, c)| *c).collect();
    for i in 0..STUDIES {
        for j in 0..STUDIES {
            assert_eq!(
                labels[i] == labels[j],
                i % GROUPS == j % GROUPS,
                "studies {} and {}",
                i,
                j
            );
        }
    }
}

#[test]
fn test_reduction_keeps_the_group_structure() {
    let matrix = grouped_matrix();
    let reduction = pipeline().reduce(&matrix).unwrap();
    assert_eq!(reduction.vectors.dim(), (STUDIES, 3));
    assert!(reduction.explained_variance > 0.9);
    for row in reduction.vectors.rows() {
        assert!((row.dot(&row).sqrt() - 1.0).abs() < 1e-9);
    }
}

#[test]
fn test_compute_study_clusters_with_operator_choice() {
    let matrix = grouped_matrix();
    let outcome = pipeline()
        .compute_study_clusters(&matrix, &[1, 2, 3, 4, 100], |report| {
            // The gain collapses after the true group count
            let three = report.entry(3)?;
            let four = report.entry(4)?;
            (three.marginal_gain? > four.marginal_gain?).then_some(3)
        })
        .unwrap();

    assert_eq!(outcome.chosen_k, 3);
    assert_eq!(outcome.report.entries.len(), 4);
    assert!(outcome.report.entry(3).unwrap().bss_ratio > 0.99);
    assert_eq!(outcome.assignment.len(), STUDIES);
    assert_eq!(outcome.assignment.entries()[0].0, Pmid::from(1000));
    same_partition(&outcome.assignment);
}

#[test]
fn test_declined_selection_aborts() {
    let matrix = grouped_matrix();
    let err = pipeline()
        .compute_study_clusters(&matrix, &[1, 2], |_| None)
        .unwrap_err();
    assert!(matches!(err, ClusteringError::NoSelection));
}

#[test]
fn test_variance_profile_reaches_full_rank() {
    let matrix = grouped_matrix();
    let profile = pipeline().variance_profile(&matrix, &[1, 3, 9]).unwrap();
    assert_eq!(profile.len(), 3);
    assert!((profile[2].1 - 1.0).abs() < 1e-6);
}

#[test]
fn test_store_round_trip_through_file() {
    let store = InMemoryStore::open();
    let matrix = grouped_matrix();
    for (i, pmid) in matrix.pmids().iter().enumerate() {
        store.upsert_study(Study::new(*pmid)).unwrap();
        for (t, term) in matrix.terms().iter().enumerate() {
            let f = matrix.values()[[i, t]];
            if f > 0.0 {
                store
                    .insert_study_term(StudyTerm::new(term.clone(), *pmid, f).unwrap())
                    .unwrap();
            }
        }
    }

    let from_store = TermMatrix::from_store(&store).unwrap();
    assert_eq!(from_store, matrix);

    let (assignment, summary) = pipeline().run_and_apply(&from_store, 3, &store).unwrap();
    same_partition(&assignment);
    assert_eq!(summary.updated, STUDIES);
    assert_eq!(summary.skipped, 0);

    let first = store.study(Pmid::from(1000)).unwrap().unwrap();
    let cluster = first.study_cluster.unwrap();
    let mates = store.pmids_in_study_cluster(cluster).unwrap();
    let expected: BTreeSet<Pmid> = [1000, 1003, 1006, 1009].into_iter().map(Pmid::from).collect();
    assert_eq!(mates, expected);

    let dir = tempdir().unwrap();
    let path = dir.path().join("Clusters.txt");
    assignment.write(&path).unwrap();
    assert_eq!(StudyClusterAssignment::read(&path).unwrap(), assignment);
}
