// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Study x term frequency matrix.

Text format (the Neurosynth `features.txt` layout):

```text
pmid    amygdala    fear    memory
15737663    0.0    0.031    0.0
16481375    0.012  0.0      0.2
```

The first header token names the id column; every following token is a term.
Values are separated by any whitespace.
*/

use crate::error::{ClusteringError, ClusteringResult};
use ndarray::{Array2, ArrayView2};
use odyssey_store::Store;
use odyssey_structures::Pmid;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct TermMatrix {
    pmids: Vec<Pmid>,
    terms: Vec<String>,
    values: Array2<f64>,
}

impl TermMatrix {
    pub fn new(
        pmids: Vec<Pmid>,
        terms: Vec<String>,
        values: Array2<f64>,
    ) -> ClusteringResult<Self> {
        if values.nrows() != pmids.len() || values.ncols() != terms.len() {
            return Err(ClusteringError::Parse {
                line: 0,
                message: format!(
                    "matrix is {}x{} but {} pmids and {} terms were given",
                    values.nrows(),
                    values.ncols(),
                    pmids.len(),
                    terms.len()
                ),
            });
        }
        if values.is_empty() {
            return Err(ClusteringError::EmptyMatrix);
        }
        Ok(Self {
            pmids,
            terms,
            values,
        })
    }

    pub fn parse(text: &str) -> ClusteringResult<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let (_, header) = lines.next().ok_or(ClusteringError::EmptyMatrix)?;
        let terms: Vec<String> = header
            .split_whitespace()
            .skip(1)
            .map(str::to_string)
            .collect();
        if terms.is_empty() {
            return Err(ClusteringError::EmptyMatrix);
        }

        let mut pmids = Vec::new();
        let mut flat = Vec::new();
        for (index, line) in lines {
            let line_no = index + 1;
            let mut fields = line.split_whitespace();
            let id = fields.next().unwrap_or_default();
            pmids.push(parse_pmid(id).ok_or_else(|| ClusteringError::Parse {
                line: line_no,
                message: format!("invalid pmid '{}'", id),
            })?);

            let before = flat.len();
            for field in fields {
                let value: f64 = field.parse().map_err(|_| ClusteringError::Parse {
                    line: line_no,
                    message: format!("invalid value '{}'", field),
                })?;
                flat.push(value);
            }
            if flat.len() - before != terms.len() {
                return Err(ClusteringError::Parse {
                    line: line_no,
                    message: format!(
                        "expected {} values, found {}",
                        terms.len(),
                        flat.len() - before
                    ),
                });
            }
        }

        let values = Array2::from_shape_vec((pmids.len(), terms.len()), flat).map_err(|e| {
            ClusteringError::Parse {
                line: 0,
                message: e.to_string(),
            }
        })?;
        Self::new(pmids, terms, values)
    }

    pub fn load(path: &Path) -> ClusteringResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let matrix = Self::parse(&text)?;
        info!(
            target: "odyssey-clustering",
            "Loaded {} studies x {} terms from {}",
            matrix.rows(),
            matrix.cols(),
            path.display()
        );
        Ok(matrix)
    }

    /// Build the matrix from every study-term row of the store.
    /// Rows follow ascending pmid, columns ascending term.
    pub fn from_store(store: &dyn Store) -> ClusteringResult<Self> {
        let pmids = store.all_pmids()?;
        let pmid_set: BTreeSet<Pmid> = pmids.iter().copied().collect();
        let rows = store.study_terms_for_pmids(&pmid_set, None)?;

        let terms: Vec<String> = rows
            .iter()
            .map(|row| row.word.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let term_index: BTreeMap<&str, usize> = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i))
            .collect();
        let row_index: BTreeMap<Pmid, usize> =
            pmids.iter().enumerate().map(|(i, p)| (*p, i)).collect();

        let mut values = Array2::zeros((pmids.len(), terms.len()));
        for row in &rows {
            if let (Some(&r), Some(&c)) =
                (row_index.get(&row.pmid), term_index.get(row.word.as_str()))
            {
                values[[r, c]] = row.frequency;
            }
        }
        Self::new(pmids, terms, values)
    }

    pub fn pmids(&self) -> &[Pmid] {
        &self.pmids
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn cols(&self) -> usize {
        self.values.ncols()
    }
}

/// Accepts plain integers and integral floats (`15737663.0`)
fn parse_pmid(field: &str) -> Option<Pmid> {
    if let Ok(id) = field.parse::<u32>() {
        return Some(Pmid::from(id));
    }
    let value: f64 = field.parse().ok()?;
    if value.fract() == 0.0 && value >= 0.0 && value <= u32::MAX as f64 {
        Some(Pmid::from(value as u32))
    } else {
        None
    }
}
