// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Text references for a set of studies.

use crate::error::QueryResult;
use odyssey_store::Store;
use odyssey_structures::{Citation, Pmid};
use std::collections::BTreeSet;

/// Citations for `pmids` ordered by pmid; unknown studies are skipped
pub fn citations(store: &dyn Store, pmids: &BTreeSet<Pmid>) -> QueryResult<Vec<Citation>> {
    if pmids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(store.studies(pmids)?.iter().map(Citation::from).collect())
}
