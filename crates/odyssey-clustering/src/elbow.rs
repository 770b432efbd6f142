// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Elbow report over candidate cluster counts.

For each k the report lists the within-cluster sum of squares (`wcss`), the
between-cluster share `bss = tss - wcss`, and the marginal `bss` gain over
the previous candidate. Picking k is left to the operator: the report is
advisory and never selects a value itself.
*/

use crate::error::{ClusteringError, ClusteringResult};
use crate::kmeans::{kmeans, KMeansSettings};
use ndarray::{ArrayView2, Axis};
use std::fmt::Write;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct ElbowEntry {
    pub k: usize,
    pub wcss: f64,
    pub bss: f64,
    /// `bss / tss`
    pub bss_ratio: f64,
    /// Increase in `bss` over the previous candidate; `None` for the first
    pub marginal_gain: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElbowReport {
    /// Total sum of squares, constant across k
    pub tss: f64,
    pub entries: Vec<ElbowEntry>,
}

impl ElbowReport {
    pub fn entry(&self, k: usize) -> Option<&ElbowEntry> {
        self.entries.iter().find(|e| e.k == k)
    }

    /// Plain-text table for the operator
    pub fn to_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "tss = {:.6}", self.tss);
        let _ = writeln!(
            out,
            "{:>6}  {:>14}  {:>14}  {:>8}  {:>14}",
            "k", "wcss", "bss", "bss/tss", "gain"
        );
        for e in &self.entries {
            let gain = e
                .marginal_gain
                .map(|g| format!("{:.6}", g))
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(
                out,
                "{:>6}  {:>14.6}  {:>14.6}  {:>8.4}  {:>14}",
                e.k, e.wcss, e.bss, e.bss_ratio, gain
            );
        }
        out
    }
}

/// Sum of squared distances to the column mean. Equals the sum of all
/// squared pairwise distances divided by the row count.
pub fn total_sum_of_squares(data: ArrayView2<'_, f64>) -> f64 {
    let Some(mean) = data.mean_axis(Axis(0)) else {
        return 0.0;
    };
    data.rows()
        .into_iter()
        .map(|row| {
            row.iter()
                .zip(mean.iter())
                .map(|(x, m)| (x - m) * (x - m))
                .sum::<f64>()
        })
        .sum()
}

/// Fit k-means for every candidate k. Candidates larger than the row count
/// are skipped.
pub fn elbow_report(
    data: ArrayView2<'_, f64>,
    k_candidates: &[usize],
    settings: &KMeansSettings,
) -> ClusteringResult<ElbowReport> {
    let rows = data.nrows();
    let tss = total_sum_of_squares(data);

    let mut entries: Vec<ElbowEntry> = Vec::new();
    for &k in k_candidates {
        if k == 0 || k > rows {
            warn!(target: "odyssey-clustering", "Skipping k={} for {} rows", k, rows);
            continue;
        }
        let fit = kmeans(data, k, settings)?;
        let wcss = fit.inertia;
        let bss = tss - wcss;
        let marginal_gain = entries.last().map(|prev| bss - prev.bss);
        entries.push(ElbowEntry {
            k,
            wcss,
            bss,
            bss_ratio: if tss > 0.0 { bss / tss } else { 0.0 },
            marginal_gain,
        });
        info!(target: "odyssey-clustering", "k={} wcss={:.6} bss={:.6}", k, wcss, bss);
    }

    if entries.is_empty() {
        return Err(ClusteringError::InvalidK {
            k: k_candidates.iter().copied().max().unwrap_or(0),
            rows,
        });
    }
    Ok(ElbowReport { tss, entries })
}
