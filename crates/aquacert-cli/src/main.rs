// AquaCert CLI - Command-line client for the certificate API

mod client;
pub mod results;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;
use uuid::Uuid;

use aquacert_core::{Certificate, CertificatePatch, CertificatePayload, CertificateStatus};

use crate::client::ApiClient;

/// AquaCert - Water analysis certificate tool
#[derive(Parser)]
#[command(name = "aquacert")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Base URL of the AquaCert API
    #[arg(
        long,
        global = true,
        env = "AQUACERT_API_URL",
        default_value = "http://localhost:8080"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List certificates with per-status counts
    List {
        /// Only show certificates in this status (draft, published, archived)
        #[arg(short, long)]
        status: Option<CertificateStatus>,
    },
    /// Show per-status counts
    Summary,
    /// Show a single certificate
    Show {
        /// Certificate id
        id: Uuid,
    },
    /// Create a draft certificate
    Create {
        /// Client the analysis was performed for
        #[arg(long)]
        client: String,

        #[command(flatten)]
        fields: PayloadFields,
    },
    /// Edit an existing certificate
    Edit {
        /// Certificate id
        id: Uuid,

        /// New client name
        #[arg(long)]
        client: Option<String>,

        #[command(flatten)]
        fields: PayloadFields,

        /// Move the certificate to this status as part of the edit
        #[arg(long)]
        status: Option<CertificateStatus>,

        /// Reject the edit if the stored version differs
        #[arg(long)]
        expected_version: Option<i64>,
    },
    /// Change the status of a certificate
    Status {
        /// Certificate id
        id: Uuid,

        /// Target status (draft, published, archived)
        status: CertificateStatus,

        /// Reject the change if the stored version differs
        #[arg(long)]
        expected_version: Option<i64>,
    },
}

/// Optional payload fields shared by create and edit.
#[derive(clap::Args)]
struct PayloadFields {
    /// Client postal address
    #[arg(long)]
    address: Option<String>,

    /// Where the sample was taken
    #[arg(long)]
    sample_point: Option<String>,

    /// Sampling date (YYYY-MM-DD)
    #[arg(long)]
    sampled_on: Option<NaiveDate>,

    /// Responsible analyst
    #[arg(long)]
    analyst: Option<String>,

    /// Free-text notes
    #[arg(long)]
    notes: Option<String>,

    /// Analysis results (can be specified multiple times)
    #[arg(short, long = "result", value_name = "PARAMETER=VALUE[:UNIT[:LIMIT]]")]
    results: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    let client = ApiClient::new(&cli.api_url);

    let result = match cli.command {
        Commands::List { status } => handle_list(&client, status),
        Commands::Summary => handle_summary(&client),
        Commands::Show { id } => handle_show(&client, id),
        Commands::Create { client: name, fields } => handle_create(&client, name, fields),
        Commands::Edit {
            id,
            client: name,
            fields,
            status,
            expected_version,
        } => handle_edit(&client, id, name, fields, status, expected_version),
        Commands::Status {
            id,
            status,
            expected_version,
        } => handle_status(&client, id, status, expected_version),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}

fn handle_list(client: &ApiClient, status: Option<CertificateStatus>) -> anyhow::Result<()> {
    let listing = client.list(status)?;

    if listing.certificates.is_empty() {
        println!("No certificates found.");
    }
    for certificate in &listing.certificates {
        println!(
            "{}  {:<9}  v{:<3}  {}",
            certificate.id,
            colored_status(certificate.status),
            certificate.version,
            certificate.payload.client_name
        );
    }

    let summary = listing.summary;
    println!();
    println!(
        "{} total: {} draft, {} published, {} archived",
        summary.total, summary.draft_count, summary.published_count, summary.archived_count
    );
    Ok(())
}

fn handle_summary(client: &ApiClient) -> anyhow::Result<()> {
    let summary = client.summary()?;

    println!("Total:      {}", summary.total);
    for status in CertificateStatus::ALL {
        println!(
            "{:<11} {}",
            format!("{}:", capitalize(status.as_str())),
            summary.count(status)
        );
    }
    Ok(())
}

fn handle_show(client: &ApiClient, id: Uuid) -> anyhow::Result<()> {
    let certificate = client.get(id)?;
    print_certificate(&certificate);
    Ok(())
}

fn handle_create(client: &ApiClient, name: String, fields: PayloadFields) -> anyhow::Result<()> {
    let payload = CertificatePayload {
        client_name: name,
        client_address: fields.address,
        sample_point: fields.sample_point,
        sampled_on: fields.sampled_on,
        analyst: fields.analyst,
        notes: fields.notes,
        results: results::parse_results(fields.results)?,
    };

    let certificate = client.create(&payload)?;

    println!(
        "{} Created draft certificate {}",
        "✓".green().bold(),
        certificate.id
    );
    Ok(())
}

fn handle_edit(
    client: &ApiClient,
    id: Uuid,
    name: Option<String>,
    fields: PayloadFields,
    status: Option<CertificateStatus>,
    expected_version: Option<i64>,
) -> anyhow::Result<()> {
    let results = if fields.results.is_empty() {
        None
    } else {
        Some(results::parse_results(fields.results)?)
    };
    let patch = CertificatePatch {
        status,
        client_name: name,
        client_address: fields.address,
        sample_point: fields.sample_point,
        sampled_on: fields.sampled_on,
        analyst: fields.analyst,
        notes: fields.notes,
        results,
        expected_version,
    };

    if patch.is_empty() {
        return Err(anyhow::anyhow!(
            "Nothing to change. Pass at least one field to edit."
        ));
    }

    let certificate = client.update(id, &patch)?;

    println!(
        "{} Updated certificate {} (version {})",
        "✓".green().bold(),
        certificate.id,
        certificate.version
    );
    Ok(())
}

fn handle_status(
    client: &ApiClient,
    id: Uuid,
    status: CertificateStatus,
    expected_version: Option<i64>,
) -> anyhow::Result<()> {
    let certificate = client.change_status(id, status, expected_version)?;

    println!(
        "{} Certificate {} is now {}",
        "✓".green().bold(),
        certificate.id,
        colored_status(certificate.status)
    );
    Ok(())
}

fn print_certificate(certificate: &Certificate) {
    let payload = &certificate.payload;

    println!("{}", payload.client_name.bold());
    println!("  Id:           {}", certificate.id);
    println!("  Status:       {}", colored_status(certificate.status));
    println!("  Version:      {}", certificate.version);
    if let Some(address) = &payload.client_address {
        println!("  Address:      {}", address);
    }
    if let Some(point) = &payload.sample_point {
        println!("  Sample point: {}", point);
    }
    if let Some(date) = payload.sampled_on {
        println!("  Sampled on:   {}", date);
    }
    if let Some(analyst) = &payload.analyst {
        println!("  Analyst:      {}", analyst);
    }
    println!("  Created:      {}", certificate.created_at.to_rfc3339());
    println!("  Updated:      {}", certificate.updated_at.to_rfc3339());

    if !payload.results.is_empty() {
        println!();
        println!("  Results:");
        for result in &payload.results {
            let unit = result.unit.as_deref().unwrap_or("");
            match &result.limit {
                Some(limit) => println!(
                    "    {:<16} {} {} (limit {})",
                    result.parameter, result.value, unit, limit
                ),
                None => println!("    {:<16} {} {}", result.parameter, result.value, unit),
            }
        }
    }

    if let Some(notes) = &payload.notes {
        println!();
        println!("  Notes: {}", notes);
    }
}

fn colored_status(status: CertificateStatus) -> colored::ColoredString {
    match status {
        CertificateStatus::Draft => status.as_str().yellow(),
        CertificateStatus::Published => status.as_str().green(),
        CertificateStatus::Archived => status.as_str().dimmed(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
