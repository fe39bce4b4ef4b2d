use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};

use face_labeller_core::annotation::domain::breakdown::BreakdownDocument;
use face_labeller_core::annotation::infrastructure::video_indexer_client::VideoIndexerClient;
use face_labeller_core::pipeline::label_faces_use_case::LabelFacesUseCase;
use face_labeller_core::pipeline::pipeline_logger::LogPipelineLogger;
use face_labeller_core::pipeline::populate_registry_use_case::PopulateRegistryUseCase;
use face_labeller_core::pipeline::rate_limiter::SlidingWindowRateLimiter;
use face_labeller_core::registry::domain::face_registry::FaceRegistry;
use face_labeller_core::registry::infrastructure::cognitive_face_client::CognitiveFaceClient;
use face_labeller_core::registry::infrastructure::retry_policy::RetryPolicy;
use face_labeller_core::registry::infrastructure::retrying_face_registry::RetryingFaceRegistry;
use face_labeller_core::shared::constants::{
    DEFAULT_CONTAINER, DEFAULT_GROUP_ID, DEFAULT_REGION, IDENTIFY_MAX_CALLS, IDENTIFY_PERIOD,
    MAX_GROUP_ID_LEN,
};
use face_labeller_core::shared::secrets::Secrets;
use face_labeller_core::storage::infrastructure::blob_headshot_source::BlobHeadshotSource;

/// Label faces in video breakdowns using a cloud face registry.
#[derive(Parser)]
#[command(name = "face-labeller")]
struct Cli {
    /// Secrets file (default: ./secrets.json, then the user config directory).
    #[arg(long, global = true)]
    secrets: Option<PathBuf>,

    /// Face API region.
    #[arg(long, global = true, default_value = DEFAULT_REGION)]
    region: String,

    /// Person group id to populate or identify against.
    #[arg(long, global = true, default_value = DEFAULT_GROUP_ID)]
    group: String,

    /// Retry transient face registry failures this many times (0 = never).
    /// Identify retries wait for a rate limit slot like any other call.
    #[arg(long, global = true, default_value = "0")]
    retries: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rebuild the person group from headshots in blob storage.
    Populate {
        /// Blob container holding the headshots.
        #[arg(long, default_value = DEFAULT_CONTAINER)]
        container: String,

        /// User data attached to the recreated group.
        #[arg(long, default_value = "")]
        group_data: String,

        /// Do not request training after registration.
        #[arg(long)]
        no_train: bool,
    },
    /// Identify faces of a breakdown document and write their names back.
    Label {
        /// Breakdown JSON document.
        input: PathBuf,

        /// Identify calls allowed per window.
        #[arg(long, default_value_t = IDENTIFY_MAX_CALLS)]
        max_calls: usize,

        /// Rate limit window in seconds.
        #[arg(long, default_value_t = IDENTIFY_PERIOD.as_secs())]
        period: u64,
    },
    /// List the registry's person groups.
    Groups,
    /// Request training of the person group.
    Train,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let secrets = Secrets::resolve(cli.secrets.as_deref())?;
    let registry = build_registry(&cli, &secrets)?;

    match cli.command {
        Command::Populate {
            container,
            group_data,
            no_train,
        } => {
            let source = BlobHeadshotSource::new(
                secrets.storage_account_name()?,
                &container,
                secrets.storage_sas_token()?,
            )?;
            let mut use_case = PopulateRegistryUseCase::new(
                registry,
                Box::new(source),
                &cli.group,
                Box::new(LogPipelineLogger::new("headshots")),
            )
            .with_group_user_data(&group_data);
            if no_train {
                use_case = use_case.without_training();
            }
            let report = use_case.execute()?;
            log::info!(
                "Registered {} people in {} ({} skipped)",
                report.registered,
                cli.group,
                report.skipped
            );
        }
        Command::Label {
            input,
            max_calls,
            period,
        } => {
            let document = BreakdownDocument::load(&input)?;
            let annotator = VideoIndexerClient::new(secrets.video_indexer_key()?)?;
            let limiter = SlidingWindowRateLimiter::new(max_calls, Duration::from_secs(period))?;
            let mut use_case = LabelFacesUseCase::new(
                registry,
                Box::new(annotator),
                limiter,
                &cli.group,
                Box::new(LogPipelineLogger::new("faces")),
            )
            .with_retry_policy(RetryPolicy::with_retries(cli.retries));
            let report = use_case.execute(&document)?;
            log::info!(
                "Labelled {} of {} faces",
                report.labelled,
                report.labelled + report.skipped
            );
        }
        Command::Groups => {
            for group in registry.list_groups()? {
                println!(
                    "{}\t{}\t{}",
                    group.person_group_id,
                    group.name,
                    group.user_data.unwrap_or_default()
                );
            }
        }
        Command::Train => {
            registry.train(&cli.group)?;
            log::info!("Training requested for group {}", cli.group);
        }
    }

    Ok(())
}

fn build_registry(
    cli: &Cli,
    secrets: &Secrets,
) -> Result<Box<dyn FaceRegistry>, Box<dyn std::error::Error>> {
    let client: Box<dyn FaceRegistry> =
        Box::new(CognitiveFaceClient::new(secrets.cognitive_key()?, &cli.region)?);
    if cli.retries > 0 {
        Ok(Box::new(RetryingFaceRegistry::new(
            client,
            RetryPolicy::with_retries(cli.retries),
        )))
    } else {
        Ok(client)
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !is_valid_group_id(&cli.group) {
        return Err(format!(
            "Group id must be 1-{MAX_GROUP_ID_LEN} lowercase letters, digits, '-' or '_', got '{}'",
            cli.group
        )
        .into());
    }
    if cli.region.is_empty() || !cli.region.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(format!("Region must be alphanumeric, got '{}'", cli.region).into());
    }
    if let Some(path) = &cli.secrets {
        if !path.exists() {
            return Err(format!("Secrets file not found: {}", path.display()).into());
        }
    }
    match &cli.command {
        Command::Label {
            input,
            max_calls,
            period,
        } => {
            if !input.exists() {
                return Err(format!("Input file not found: {}", input.display()).into());
            }
            if *max_calls == 0 {
                return Err("--max-calls must be at least 1".into());
            }
            if *period == 0 {
                return Err("--period must be at least 1 second".into());
            }
        }
        Command::Populate { container, .. } => {
            if container.is_empty() {
                return Err("--container must not be empty".into());
            }
        }
        Command::Groups | Command::Train => {}
    }
    Ok(())
}

fn is_valid_group_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_GROUP_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}
