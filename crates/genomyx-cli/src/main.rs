//! genomyx — command-line client for the portal web service.
//! Prints every response as JSON on stdout.

use anyhow::Result;
use clap::{Parser, Subcommand};
use genomyx_client::{parse_list, PortalClient, ProfileDataQuery, DEFAULT_PORTAL_URL};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "genomyx", version, about = "Query the cBioPortal web service and summarize gene alterations")]
struct Cli {
    /// Portal web-service endpoint
    #[arg(long, global = true, default_value = DEFAULT_PORTAL_URL)]
    portal_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Get clinical cancer types
    TypesOfCancer,

    /// Get cancer study meta-data
    CancerStudies,

    /// Get genetic profiles for a cancer study
    GeneticProfiles {
        /// Cancer study ID, e.g. gbm_tcga
        #[arg(short = 'c', long)]
        cancer_study: String,
    },

    /// Get case lists for a cancer study
    CaseLists {
        /// Cancer study ID, e.g. gbm_tcga
        #[arg(short = 'c', long)]
        cancer_study: String,
    },

    /// Get genomic profile data for one or more genes
    ProfileData {
        #[command(flatten)]
        query: ProfileArgs,
    },

    /// Summarize mutation/copy-number alterations per gene
    AlterationSummary {
        #[command(flatten)]
        query: ProfileArgs,
    },
}

#[derive(clap::Args)]
struct ProfileArgs {
    /// Case list ID, e.g. gbm_tcga_all
    #[arg(short = 's', long)]
    case_set: String,

    /// One or more genetic profile IDs, comma separated
    #[arg(short = 'p', long)]
    genetic_profile: String,

    /// One or more genes as HUGO symbols or Entrez IDs, comma separated
    #[arg(short = 'g', long)]
    gene_list: String,
}

impl From<ProfileArgs> for ProfileDataQuery {
    fn from(args: ProfileArgs) -> Self {
        ProfileDataQuery {
            case_set_id: args.case_set,
            genetic_profile_ids: parse_list(&args.genetic_profile),
            gene_list: parse_list(&args.gene_list),
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise structured logging; stdout stays reserved for JSON output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("genomyx=info")),
        )
        .init();

    let cli = Cli::parse();
    let client = PortalClient::with_base_url(&cli.portal_url)?;

    match cli.command {
        Command::TypesOfCancer => print_json(&client.get_types_of_cancer().await?),
        Command::CancerStudies => print_json(&client.get_cancer_studies().await?),
        Command::GeneticProfiles { cancer_study } => {
            print_json(&client.get_genetic_profiles(&cancer_study).await?)
        }
        Command::CaseLists { cancer_study } => {
            print_json(&client.get_case_lists(&cancer_study).await?)
        }
        Command::ProfileData { query } => {
            print_json(&client.get_profile_data(&query.into()).await?)
        }
        Command::AlterationSummary { query } => {
            print_json(&client.get_alteration_summary(&query.into()).await?)
        }
    }
}
