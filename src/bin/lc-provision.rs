use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use lc_gateway::config::load_or_default;
use lc_gateway::enrollment::{admin_label, ProvisioningError};
use lc_gateway::lifecycle::{startup, Components};
use lc_gateway::observability::logging;
use lc_gateway::wallet::IdentityStore;

#[derive(Parser)]
#[command(name = "lc-provision")]
#[command(about = "Provision wallet identities for the LC gateway", long_about = None)]
struct Cli {
    /// Configuration file (defaults to $LC_GATEWAY_CONFIG, then lc-gateway.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enroll the organization's admin with the CA bootstrap credentials
    Admin {
        #[arg(long)]
        org: String,
    },
    /// Register and enroll a user under an already enrolled admin
    User {
        #[arg(long)]
        org: String,
        #[arg(long)]
        label: String,
    },
    /// Enroll the admin if needed, then register and enroll the user
    Provision {
        #[arg(long)]
        org: String,
        #[arg(long)]
        label: String,
    },
    /// List identities in the wallet
    List,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Provisioning failed");
            eprintln!("Error: {}", e);
            if let Some(ProvisioningError::AdminMissing { organization, .. }) = e.downcast_ref::<ProvisioningError>() {
                eprintln!("Hint: run `lc-provision admin --org {}` first", organization);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_or_default(&startup::config_path(cli.config))?;
    logging::init_tracing(&config.observability.log_level);
    let components = Components::new(&config);

    match cli.command {
        Commands::Admin { org } => {
            let outcome = components.enrollment(&config).bootstrap_admin(&org).await?;
            println!("{}: {}", admin_label(&org), outcome);
        }
        Commands::User { org, label } => {
            let outcome = components
                .enrollment(&config)
                .register_and_enroll_user(&org, &label)
                .await?;
            println!("{}: {}", label, outcome);
        }
        Commands::Provision { org, label } => {
            let report = components.enrollment(&config).provision(&org, &label).await?;
            println!("{}: {}", admin_label(&org), report.admin);
            println!("{}: {}", label, report.user);
        }
        Commands::List => {
            for label in components.store.list().await? {
                println!("{}", label);
            }
        }
    }

    Ok(())
}
