use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenomyxError {
    #[error("Malformed table row: header has {expected} columns, row has {found}")]
    MalformedRow { expected: usize, found: usize },

    #[error("Data row is missing the COMMON gene symbol annotation")]
    MissingGeneSymbol,

    #[error("Mutation and copy-number case sets differ for gene {gene}")]
    CaseSetMismatch { gene: String },

    #[error("Gene {gene} has no cases to aggregate over")]
    EmptyCaseSet { gene: String },

    #[error("Table decode error: {0}")]
    Table(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, GenomyxError>;
