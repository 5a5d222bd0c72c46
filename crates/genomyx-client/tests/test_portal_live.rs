//! Live round-trips against the public portal.
//!
//! Run with: cargo test --package genomyx-client --test test_portal_live -- --ignored --nocapture

use genomyx_client::{parse_list, PortalClient, ProfileDataQuery};

#[tokio::test]
#[ignore] // Requires network access
async fn test_cancer_studies_listing() {
    let client = PortalClient::new().expect("client");

    let response = client.get_cancer_studies().await.expect("getCancerStudies failed");

    println!("Found {} studies", response.results);
    assert!(response.results > 0, "Portal should list at least one study");
    assert!(response.rows[0].annotations.contains_key("cancer_study_id"));
}

#[tokio::test]
#[ignore] // Requires network access
async fn test_alteration_summary_gbm() {
    let client = PortalClient::new().expect("client");

    let query = ProfileDataQuery {
        case_set_id: "gbm_tcga_all".to_string(),
        genetic_profile_ids: parse_list("gbm_tcga_mutations,gbm_tcga_gistic"),
        gene_list: parse_list("tp53,mdm2,mdm4"),
    };

    let summary = client
        .get_alteration_summary(&query)
        .await
        .expect("getAlterationSummary failed");

    println!("{}", serde_json::to_string_pretty(&summary).unwrap());
    assert!(summary.genes.contains_key("tp53"));
    assert!(summary.overall.is_some(), "Multi-gene summary should carry an overall");
}
