//! Conversion of portal web-service responses into structured rows.
//!
//! The web service answers every command with a tab-delimited payload in
//! which metadata travels as `#`-prefixed comment lines above the table:
//!
//! ```text
//! # CASE_SET_ID	gbm_tcga_all
//! # DATA_TYPE	 Mutations
//! # PROFILE_ID	gbm_tcga_mutations	MUTATION_EXTENDED
//! GENE_ID	COMMON	TCGA-02-0001-01	TCGA-02-0003-01	...
//! 7157	TP53	R175H	NaN	...
//! ```
//!
//! Conversion runs in two passes: every line is first classified as either
//! a comment line or a table line, then metadata and the alteration-type
//! section marker are read from the comment lines only. Column names that
//! look like case barcodes (`TCGA-...`) land in a row's `cases` map; every
//! other column is a biological annotation.

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GenomyxError, Result};

/// Web-service command whose responses carry alteration section markers.
pub const PROFILE_DATA_COMMAND: &str = "getProfileData";

/// Meta key under which a response's data-type declaration is stored.
pub const DATA_TYPE_KEY: &str = "DATA_TYPE";

/// Annotation key carrying a row's alteration type.
pub const ALTERATION_TYPE_KEY: &str = "ALTERATION_TYPE";

/// Annotation key carrying a row's gene symbol.
pub const GENE_SYMBOL_KEY: &str = "COMMON";

/// Alteration type of a genetic profile data block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlterationType {
    MutationExtended,
    CopyNumberAlteration,
}

impl AlterationType {
    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "MUTATION_EXTENDED" => Some(AlterationType::MutationExtended),
            "COPY_NUMBER_ALTERATION" => Some(AlterationType::CopyNumberAlteration),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlterationType::MutationExtended => "MUTATION_EXTENDED",
            AlterationType::CopyNumberAlteration => "COPY_NUMBER_ALTERATION",
        }
    }
}

/// One structured data record. Every source column lands in exactly one of
/// the two maps: barcode-named columns in `cases`, the rest in
/// `annotations`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub annotations: BTreeMap<String, String>,
    pub cases: BTreeMap<String, String>,
}

impl Row {
    /// The row's alteration type, if its `ALTERATION_TYPE` annotation
    /// carries a recognized token.
    pub fn alteration_type(&self) -> Option<AlterationType> {
        self.annotations
            .get(ALTERATION_TYPE_KEY)
            .and_then(|s| AlterationType::from_token(s.trim()))
    }

    /// The row's gene symbol annotation.
    pub fn gene_symbol(&self) -> Option<&str> {
        self.annotations.get(GENE_SYMBOL_KEY).map(String::as_str)
    }
}

/// A fully converted response: response-level metadata, the structured
/// rows in table order, and the data-row count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertedResponse {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, String>,
    pub rows: Vec<Row>,
    pub results: usize,
}

impl ConvertedResponse {
    /// The response's declared data type, e.g. "Mutations".
    pub fn data_type(&self) -> Option<&str> {
        self.meta.get(DATA_TYPE_KEY).map(String::as_str)
    }
}

/// Institutional prefixes recognized as case barcode columns. Studies on
/// the portal carry sample IDs from more consortia than TCGA.
const CASE_ID_PREFIXES: &[&str] = &["TCGA", "TARGET", "MSK", "DFCI", "BROAD", "MDA"];

fn lazy_case_id_regex() -> &'static Regex {
    use std::sync::OnceLock;
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Barcode-style case column names: a recognized institutional
        // prefix followed by digits/hyphens, e.g. TCGA-02-0001-01
        let pattern = format!("(?i)^(?:{})[0-9-]*$", CASE_ID_PREFIXES.join("|"));
        Regex::new(&pattern).unwrap()
    })
}

fn lazy_data_type_regex() -> &'static Regex {
    use std::sync::OnceLock;
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"DATA_TYPE[:\s]*(\S.*)").unwrap())
}

/// A raw payload split into metadata and its comment-free table text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedResponse {
    pub meta: BTreeMap<String, String>,
    pub section_hint: Option<AlterationType>,
    pub table_text: String,
}

/// Split a raw web-service payload into metadata and table text.
///
/// `command` is the API command the payload answers; alteration section
/// markers are only honoured for profile-data responses. A payload
/// without any recognizable metadata parses to an empty `meta` and no
/// hint rather than failing.
pub fn parse(raw: &str, command: Option<&str>) -> ParsedResponse {
    let mut parsed = ParsedResponse::default();
    let mut table_lines: Vec<&str> = Vec::new();

    let profile_context = command == Some(PROFILE_DATA_COMMAND);

    // Pass 1: line classification. A line is a comment line in its
    // entirety or a table line in its entirety; a `#` inside a data cell
    // does not make the line a comment.
    for line in raw.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if line.trim_start().starts_with('#') {
            scan_comment_line(line, profile_context, &mut parsed.meta, &mut parsed.section_hint);
        } else {
            table_lines.push(line);
        }
    }

    parsed.table_text = table_lines.join("\n");
    parsed
}

/// Convert a raw web-service payload into structured rows.
pub fn convert_response(raw: &str, command: Option<&str>) -> Result<ConvertedResponse> {
    let parsed = parse(raw, command);
    let rows = map_table(&parsed.table_text, parsed.section_hint)?;
    let results = rows.len();
    debug!(results, data_type = ?parsed.meta.get(DATA_TYPE_KEY), "converted portal response");

    Ok(ConvertedResponse { meta: parsed.meta, rows, results })
}

/// Pass 2 for a single comment line: record a data-type declaration into
/// `meta`, and an alteration section marker into `hint` (profile-data
/// responses only; the last marker before the table wins).
fn scan_comment_line(
    line: &str,
    profile_context: bool,
    meta: &mut BTreeMap<String, String>,
    hint: &mut Option<AlterationType>,
) {
    if let Some(caps) = lazy_data_type_regex().captures(line) {
        meta.insert(DATA_TYPE_KEY.to_string(), caps[1].trim().to_string());
        return;
    }
    if profile_context {
        for token in line.split(|c: char| c.is_whitespace() || c == ':') {
            if let Some(alteration) = AlterationType::from_token(token) {
                *hint = Some(alteration);
            }
        }
    }
}

/// Decode the comment-free table text and map every data row.
fn map_table(table_text: &str, hint: Option<AlterationType>) -> Result<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .flexible(true)
        .from_reader(table_text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let values: Vec<&str> = record.iter().collect();
        rows.push(map_row(&headers, &values, hint)?);
    }
    Ok(rows)
}

/// Map one table row: classify each column by name into `cases` or
/// `annotations`, then merge the section hint into `ALTERATION_TYPE`
/// unless the row already carries one.
pub fn map_row(headers: &[String], values: &[&str], hint: Option<AlterationType>) -> Result<Row> {
    if values.len() != headers.len() {
        return Err(GenomyxError::MalformedRow {
            expected: headers.len(),
            found: values.len(),
        });
    }

    let mut row = Row::default();
    for (name, value) in headers.iter().zip(values) {
        let name = name.trim();
        if lazy_case_id_regex().is_match(name) {
            row.cases.insert(name.to_string(), value.to_string());
        } else {
            row.annotations.insert(name.to_string(), value.to_string());
        }
    }

    if let Some(alteration) = hint {
        row.annotations
            .entry(ALTERATION_TYPE_KEY.to_string())
            .or_insert_with(|| alteration.as_str().to_string());
    }

    Ok(row)
}
