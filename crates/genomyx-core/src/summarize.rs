//! Per-gene alteration summarization.
//!
//! Folds converted profile-data rows into percentage summaries:
//!
//! ```text
//! {
//!   "genes": {
//!     "tp53": { "mutated": 29, "cna": 2, "combined": 30 }
//!   }
//! }
//! ```
//!
//! A gene's denominator is the union of case IDs observed across all of
//! its rows. `combined` and `overall` are unions of altered case sets,
//! never sums of percentages, so a case altered in both profiles counts
//! once.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::convert::{AlterationType, ConvertedResponse, Row, GENE_SYMBOL_KEY};
use crate::error::{GenomyxError, Result};

/// Percentage summary for a single gene. Fields are present only when the
/// underlying data carries the matching profile rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mutated: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cna: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combined: Option<u32>,
}

/// Alteration summary across all summarized genes, keyed by lowercased
/// gene symbol. `overall` is present only when more than one gene was
/// summarized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub genes: BTreeMap<String, GeneSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall: Option<u32>,
}

#[derive(Debug, Default)]
struct GeneAccumulator {
    cases: BTreeSet<String>,
    mutation_cases: BTreeSet<String>,
    cna_cases: BTreeSet<String>,
    mutation_altered: BTreeSet<String>,
    cna_altered: BTreeSet<String>,
    has_mutation_rows: bool,
    has_cna_rows: bool,
}

/// Summarize alterations across one or more converted responses. Dataset
/// rows are folded in the order given, mirroring how batched profile
/// responses are concatenated upstream.
pub fn summarize_responses(datasets: &[ConvertedResponse]) -> Result<Summary> {
    summarize(datasets.iter().flat_map(|dataset| &dataset.rows))
}

/// Summarize alterations for a sequence of rows.
///
/// Pure fold: the input rows are never mutated, so repeated calls over the
/// same sequence yield identical summaries. Rows with an unrecognized or
/// absent alteration type widen the gene's case union but contribute to
/// no percentage.
pub fn summarize<'a, I>(rows: I) -> Result<Summary>
where
    I: IntoIterator<Item = &'a Row>,
{
    let mut genes: BTreeMap<String, GeneAccumulator> = BTreeMap::new();

    for row in rows {
        let gene = row
            .annotations
            .get(GENE_SYMBOL_KEY)
            .filter(|symbol| !symbol.trim().is_empty())
            .ok_or(GenomyxError::MissingGeneSymbol)?
            .trim()
            .to_lowercase();
        let acc = genes.entry(gene).or_default();
        acc.cases.extend(row.cases.keys().cloned());

        match row.alteration_type() {
            Some(AlterationType::MutationExtended) => {
                acc.has_mutation_rows = true;
                for (case_id, value) in &row.cases {
                    acc.mutation_cases.insert(case_id.clone());
                    if is_reportable_mutation(value) {
                        acc.mutation_altered.insert(case_id.clone());
                    }
                }
            }
            Some(AlterationType::CopyNumberAlteration) => {
                acc.has_cna_rows = true;
                for (case_id, value) in &row.cases {
                    acc.cna_cases.insert(case_id.clone());
                    if is_cna_alteration(value) {
                        acc.cna_altered.insert(case_id.clone());
                    }
                }
            }
            None => {}
        }
    }

    let mut summaries: BTreeMap<String, GeneSummary> = BTreeMap::new();
    let mut all_cases: BTreeSet<&String> = BTreeSet::new();
    let mut all_altered: BTreeSet<&String> = BTreeSet::new();

    for (gene, acc) in &genes {
        // Independently-sourced mutation and copy-number datasets must
        // describe the same case list before their percentages can be
        // combined for a gene.
        if acc.has_mutation_rows && acc.has_cna_rows && acc.mutation_cases != acc.cna_cases {
            return Err(GenomyxError::CaseSetMismatch { gene: gene.clone() });
        }
        if acc.cases.is_empty() {
            return Err(GenomyxError::EmptyCaseSet { gene: gene.clone() });
        }
        let total = acc.cases.len();

        let mut summary = GeneSummary::default();
        if acc.has_mutation_rows {
            summary.mutated = Some(percentage(acc.mutation_altered.len(), total));
        }
        if acc.has_cna_rows {
            summary.cna = Some(percentage(acc.cna_altered.len(), total));
        }

        let altered: BTreeSet<&String> = acc.mutation_altered.union(&acc.cna_altered).collect();
        if summary.mutated.is_some() && summary.cna.is_some() {
            summary.combined = Some(percentage(altered.len(), total));
        }

        all_cases.extend(acc.cases.iter());
        all_altered.extend(altered);
        summaries.insert(gene.clone(), summary);
    }

    let overall = if summaries.len() > 1 {
        Some(percentage(all_altered.len(), all_cases.len()))
    } else {
        None
    };

    debug!(genes = summaries.len(), ?overall, "summarized alterations");
    Ok(Summary { genes: summaries, overall })
}

/// A mutation cell counts as an alteration unless it is a no-call
/// sentinel: empty, `NaN`-bearing, or the literal zero `"0"`. The zero
/// rule is a compatibility default; the wire format cannot distinguish a
/// reported zero-effect call from a missing entry.
fn is_reportable_mutation(value: &str) -> bool {
    let value = value.trim();
    !(value.is_empty() || value.contains("NaN") || value == "0")
}

/// Only high-confidence GISTIC calls count: -2 (homozygous deletion) and
/// 2 (high-level amplification).
fn is_cna_alteration(value: &str) -> bool {
    matches!(value.trim().parse::<i32>(), Ok(-2) | Ok(2))
}

/// Round-half-up integer percentage. Callers guarantee `total > 0`.
fn percentage(altered: usize, total: usize) -> u32 {
    (altered as f64 / total as f64 * 100.0).round() as u32
}
