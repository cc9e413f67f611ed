use std::{
    io::{self, BufRead, Write},
    sync::Arc,
};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    config::{load_settings, Settings},
    ConfirmPrompt, HospitalApi, HospitalCreateController, HospitalListController,
    HttpHospitalApi, Outcome,
};
use shared::domain::HospitalId;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod render;
mod shell;

#[derive(Parser, Debug)]
#[command(about = "Manage hospital records on a remote API")]
struct Cli {
    /// Base URL of the hospital API (overrides config and environment).
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Base URL used by `add-with-id`.
    #[arg(long, global = true)]
    create_api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every hospital in server order.
    List,
    /// Add a hospital; the server assigns its id.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
    },
    /// Add a hospital under an id of your choosing.
    AddWithId {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
    },
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
    },
    Delete {
        #[arg(long)]
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Interactive session over a single hospital list.
    Shell,
}

/// Asks on stdin; anything but `y`/`yes` declines.
pub(crate) struct StdinConfirm;

impl ConfirmPrompt for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    apply_overrides(&mut settings, &cli);
    info!(
        api_url = %settings.api_url,
        create_api_url = %settings.create_api_url,
        timeout_secs = settings.request_timeout_secs,
        "hospital_cli: settings resolved"
    );

    match cli.command {
        Command::AddWithId { id, name, address } => {
            add_with_id(&settings, id, name, address).await
        }
        Command::List => {
            let controller = mount_list(&settings).await?;
            print!("{}", render::hospital_list(&controller.hospitals().await));
            controller.unmount().await;
            Ok(())
        }
        Command::Add { name, address } => {
            let controller = mount_list(&settings).await?;
            controller.set_name(name).await;
            controller.set_address(address).await;
            finish(&controller, controller.submit().await).await
        }
        Command::Update { id, name, address } => {
            let controller = mount_list(&settings).await?;
            let id = HospitalId::new(id);
            if !controller.begin_edit(&id).await {
                bail!("hospital {id} is not in the list");
            }
            controller.set_name(name).await;
            controller.set_address(address).await;
            finish(&controller, controller.submit().await).await
        }
        Command::Delete { id, yes } => {
            let controller = mount_list(&settings).await?;
            let id = HospitalId::new(id);
            let outcome = if yes {
                controller.delete(&id, &|_: &str| true).await
            } else {
                controller.delete(&id, &StdinConfirm).await
            };
            finish(&controller, outcome).await
        }
        Command::Shell => {
            let controller = HospitalListController::new(list_api(&settings)?);
            let result = shell::run(&controller).await;
            controller.unmount().await;
            result
        }
    }
}

fn list_api(settings: &Settings) -> Result<Arc<dyn HospitalApi>> {
    let api =
        HttpHospitalApi::from_settings(settings).context("failed to configure API client")?;
    Ok(Arc::new(api))
}

async fn mount_list(settings: &Settings) -> Result<HospitalListController> {
    let controller = HospitalListController::new(list_api(settings)?);
    if let Some(outcome) = controller.mount().await {
        report(outcome)?;
    }
    Ok(controller)
}

async fn finish(controller: &HospitalListController, outcome: Outcome) -> Result<()> {
    let result = report(outcome);
    print!("{}", render::hospital_list(&controller.hospitals().await));
    controller.unmount().await;
    result
}

async fn add_with_id(
    settings: &Settings,
    id: String,
    name: String,
    address: String,
) -> Result<()> {
    let api = HttpHospitalApi::for_create_form(settings)
        .context("failed to configure create form client")?;
    let form = HospitalCreateController::new(Arc::new(api));
    form.set_id(id).await;
    form.set_name(name).await;
    form.set_address(address).await;
    let outcome = form.submit().await;
    if outcome == Outcome::Applied {
        if let Some(message) = form.form().await.message {
            println!("{message}");
        }
    }
    form.unmount().await;
    report(outcome)
}

fn apply_overrides(settings: &mut Settings, cli: &Cli) {
    if let Some(v) = &cli.api_url {
        settings.api_url = v.clone();
    }
    if let Some(v) = &cli.create_api_url {
        settings.create_api_url = v.clone();
    }
}

fn report(outcome: Outcome) -> Result<()> {
    match outcome {
        Outcome::Applied => Ok(()),
        Outcome::Cancelled => {
            println!("Cancelled.");
            Ok(())
        }
        Outcome::Alert(message) | Outcome::Failed(message) => Err(anyhow!(message)),
        Outcome::Discarded => Err(anyhow!("operation discarded after shutdown")),
    }
}
