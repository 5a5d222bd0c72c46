//! cBioPortal web-service client.
//!
//! API docs: https://docs.cbioportal.org/web-api-and-clients/
//! Endpoint: https://www.cbioportal.org/webservice.do
//!
//! Every command is a GET against the one endpoint with a `cmd` query
//! parameter; the portal answers in tab-delimited text. Conversion and
//! summarization live in genomyx-core — this crate only shapes requests,
//! fans out batched profile queries, and joins the results.
//!
//! The web service does not accept multiple genetic profiles together
//! with multiple genes in one call, so `get_profile_data` issues one
//! request per profile ID in that case, concurrently, and concatenates
//! the row sets in request order.

mod query;

pub use query::{parse_list, ProfileDataQuery};

use std::time::Duration;

use anyhow::{Context, Result};
use genomyx_core::{convert_response, summarize, ConvertedResponse, Summary, PROFILE_DATA_COMMAND};
use tracing::{debug, instrument};

/// Default portal web-service endpoint.
pub const DEFAULT_PORTAL_URL: &str = "https://www.cbioportal.org/webservice.do";

const USER_AGENT: &str = concat!("genomyx/", env!("CARGO_PKG_VERSION"));

/// A client for the portal web service.
#[derive(Debug, Clone)]
pub struct PortalClient {
    client: reqwest::Client,
    base_url: String,
}

impl PortalClient {
    /// Create a client against the public portal.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_PORTAL_URL)
    }

    /// Create a client against a self-hosted portal endpoint.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, base_url: base_url.into() })
    }

    /// Execute one `get` command and convert its payload.
    async fn get(&self, cmd: &str, params: &[(&str, String)]) -> Result<ConvertedResponse> {
        let mut pairs: Vec<(&str, String)> = vec![("cmd", cmd.to_string())];
        pairs.extend(params.iter().cloned());

        let response = self
            .client
            .get(&self.base_url)
            .query(&pairs)
            .send()
            .await
            .with_context(|| format!("Portal request failed for {cmd}"))?;

        if !response.status().is_success() {
            anyhow::bail!("Portal returned HTTP {} for {cmd}", response.status());
        }

        let text = response
            .text()
            .await
            .with_context(|| format!("Portal response read failed for {cmd}"))?;
        debug!(cmd, bytes = text.len(), "portal response received");

        convert_response(&text, Some(cmd)).with_context(|| format!("Converting {cmd} response"))
    }

    /// Retrieve the clinical cancer types stored on the portal.
    #[instrument(skip(self))]
    pub async fn get_types_of_cancer(&self) -> Result<ConvertedResponse> {
        self.get("getTypesOfCancer", &[]).await
    }

    /// Retrieve meta-data for all cancer studies stored on the portal.
    #[instrument(skip(self))]
    pub async fn get_cancer_studies(&self) -> Result<ConvertedResponse> {
        self.get("getCancerStudies", &[]).await
    }

    /// Retrieve the genetic profiles (mutation, copy-number, ...) stored
    /// for a cancer study.
    #[instrument(skip(self))]
    pub async fn get_genetic_profiles(&self, cancer_study_id: &str) -> Result<ConvertedResponse> {
        self.get(
            "getGeneticProfiles",
            &[("cancer_study_id", cancer_study_id.to_string())],
        )
        .await
    }

    /// Retrieve the case lists stored for a cancer study.
    #[instrument(skip(self))]
    pub async fn get_case_lists(&self, cancer_study_id: &str) -> Result<ConvertedResponse> {
        self.get("getCaseLists", &[("cancer_study_id", cancer_study_id.to_string())])
            .await
    }

    /// Retrieve genomic profile data for one or more genes.
    ///
    /// With multiple profile IDs and multiple genes the portal has to be
    /// queried once per profile; the fanned-out requests run concurrently
    /// and their rows are concatenated in profile order.
    #[instrument(skip(self, query), fields(profiles = query.genetic_profile_ids.len(), genes = query.gene_list.len()))]
    pub async fn get_profile_data(&self, query: &ProfileDataQuery) -> Result<ConvertedResponse> {
        if query.genetic_profile_ids.len() > 1 && query.gene_list.len() > 1 {
            debug!("batching profile-data query across profiles");
            let requests = query.genetic_profile_ids.iter().map(|profile_id| {
                let narrowed = query.with_single_profile(profile_id);
                async move { self.get(PROFILE_DATA_COMMAND, &narrowed.to_params()).await }
            });
            let responses = futures::future::try_join_all(requests).await?;
            return Ok(merge_profile_responses(responses));
        }

        self.get(PROFILE_DATA_COMMAND, &query.to_params()).await
    }

    /// Retrieve profile data and summarize alterations per gene.
    #[instrument(skip(self, query))]
    pub async fn get_alteration_summary(&self, query: &ProfileDataQuery) -> Result<Summary> {
        let response = self.get_profile_data(query).await?;
        Ok(summarize(&response.rows)?)
    }
}

/// Join fanned-out profile responses: rows concatenate in request order,
/// result counts add up. Response-level meta is not merged; each row
/// already carries its alteration type.
pub fn merge_profile_responses(responses: Vec<ConvertedResponse>) -> ConvertedResponse {
    let mut merged = ConvertedResponse::default();
    for response in responses {
        merged.results += response.results;
        merged.rows.extend(response.rows);
    }
    merged
}

#[cfg(test)]
mod tests {
    use genomyx_core::Row;

    use super::*;

    fn tagged_row(gene: &str, alteration_type: &str) -> Row {
        let mut row = Row::default();
        row.annotations.insert("COMMON".to_string(), gene.to_string());
        row.annotations
            .insert("ALTERATION_TYPE".to_string(), alteration_type.to_string());
        row.cases.insert("TCGA-02-0001-01".to_string(), "R175H".to_string());
        row
    }

    #[test]
    fn test_merge_preserves_request_order() {
        let mutations = ConvertedResponse {
            rows: vec![tagged_row("TP53", "MUTATION_EXTENDED")],
            results: 1,
            ..Default::default()
        };
        let gistic = ConvertedResponse {
            rows: vec![tagged_row("TP53", "COPY_NUMBER_ALTERATION")],
            results: 1,
            ..Default::default()
        };

        let merged = merge_profile_responses(vec![mutations, gistic]);
        assert_eq!(merged.results, 2);
        assert_eq!(merged.rows[0].annotations["ALTERATION_TYPE"], "MUTATION_EXTENDED");
        assert_eq!(merged.rows[1].annotations["ALTERATION_TYPE"], "COPY_NUMBER_ALTERATION");
        assert!(merged.meta.is_empty());
    }

    #[test]
    fn test_merge_of_nothing_is_empty() {
        let merged = merge_profile_responses(Vec::new());
        assert_eq!(merged.results, 0);
        assert!(merged.rows.is_empty());
    }
}
