//! Query parameter shaping for the portal web service.
//!
//! List-valued parameters (`genetic_profile_id`, `gene_list`) travel
//! comma-joined in the query string.

/// A profile-data request: which case list, which genetic profiles, and
/// which genes.
#[derive(Debug, Clone)]
pub struct ProfileDataQuery {
    pub case_set_id: String,
    pub genetic_profile_ids: Vec<String>,
    pub gene_list: Vec<String>,
}

impl ProfileDataQuery {
    /// Query-string parameters for a single web-service request.
    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("case_set_id", self.case_set_id.clone()),
            ("genetic_profile_id", self.genetic_profile_ids.join(",")),
            ("gene_list", self.gene_list.join(",")),
        ]
    }

    /// The same query narrowed to one genetic profile, for fan-out.
    pub(crate) fn with_single_profile(&self, profile_id: &str) -> Self {
        Self {
            case_set_id: self.case_set_id.clone(),
            genetic_profile_ids: vec![profile_id.to_string()],
            gene_list: self.gene_list.clone(),
        }
    }
}

/// Split comma-separated user input into a clean list: trimmed entries,
/// empties dropped.
pub fn parse_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_trims_and_drops_empties() {
        assert_eq!(parse_list("tp53, mdm2,,mdm4 ,"), vec!["tp53", "mdm2", "mdm4"]);
        assert_eq!(parse_list(""), Vec::<String>::new());
    }

    #[test]
    fn test_params_are_comma_joined() {
        let query = ProfileDataQuery {
            case_set_id: "gbm_tcga_all".to_string(),
            genetic_profile_ids: vec!["gbm_tcga_mutations".to_string(), "gbm_tcga_gistic".to_string()],
            gene_list: vec!["tp53".to_string(), "mdm2".to_string()],
        };
        let params = query.to_params();
        assert_eq!(params[0], ("case_set_id", "gbm_tcga_all".to_string()));
        assert_eq!(params[1].1, "gbm_tcga_mutations,gbm_tcga_gistic");
        assert_eq!(params[2].1, "tp53,mdm2");
    }

    #[test]
    fn test_with_single_profile() {
        let query = ProfileDataQuery {
            case_set_id: "gbm_tcga_all".to_string(),
            genetic_profile_ids: vec!["a".to_string(), "b".to_string()],
            gene_list: vec!["tp53".to_string()],
        };
        let narrowed = query.with_single_profile("b");
        assert_eq!(narrowed.genetic_profile_ids, vec!["b"]);
        assert_eq!(narrowed.gene_list, query.gene_list);
    }
}
