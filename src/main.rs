//! igsync - CLI entry point.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use igsync::{
    api::{Collection, Credentials, InstagramApi, RemotePlatform, Session},
    cli::Args,
    config::{fill_from_netrc, validate_config, Config},
    download::{sync_collections, CollectionSelection, JitteredDelay, SyncContext},
    error::{exit_codes, Error, Result},
    fs::{ContentCache, StoreLayout},
    output::{
        create_spinner, print_banner, print_collection_list, print_collection_stats,
        print_config_summary, print_error, print_info, print_run_summary, print_success,
        print_warning,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_)
                | Error::ConfigValidation { .. }
                | Error::MissingConfig(_)
                | Error::TomlParse(_) => ExitCode::from(exit_codes::CONFIG_ERROR as u8),
                Error::Authentication(_) => ExitCode::from(exit_codes::AUTH_ERROR as u8),
                Error::Transport(_) | Error::Http(_) | Error::Json(_) => {
                    ExitCode::from(exit_codes::API_ERROR as u8)
                }
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));

    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    // Load configuration
    let config_path = args.config.clone();
    let list_only = args.list_collections;
    let netrc_path = args.netrc.clone();
    let mut config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        print_warning(&format!(
            "Configuration file not found: {}",
            config_path.display()
        ));
        print_info("Using default configuration with CLI arguments");
        Config::default()
    };

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);

    // Credentials still missing come from .netrc
    if fill_from_netrc(&mut config, netrc_path.as_deref())? {
        print_info("Using credentials from .netrc");
    }

    validate_config(&config)?;

    let storage_dir = config.storage_directory();
    print_config_summary(
        &config.account.username,
        &config.options.collections,
        &storage_dir.display().to_string(),
    );

    // Initialize API client
    let api = Arc::new(
        InstagramApi::new(config.options.user_agent.clone())?
            .with_download_progress(config.options.show_downloads),
    );

    let session = login(api.as_ref(), &config).await?;
    print_info(&format!("Logged in as: {}", session.username));

    let collections = list_collections(api.as_ref(), &session).await?;

    if list_only {
        print_collection_list(&collections);
        return Ok(());
    }

    // Prepare the local store
    let layout = StoreLayout::new(&storage_dir);
    let cache = ContentCache::new(&layout, api.clone());
    cache.prepare().await?;

    let pacing = JitteredDelay::from_millis(
        config.options.page_delay_min_ms,
        config.options.page_delay_max_ms,
    );
    let ctx = SyncContext {
        platform: api.as_ref(),
        session: &session,
        cache: &cache,
        pacing: &pacing,
        save_metadata: config.options.save_metadata,
        show_downloads: config.options.show_downloads,
    };

    let selection = CollectionSelection::named(config.options.collections.iter().cloned());
    let report = sync_collections(&ctx, &layout, &collections, &selection).await;

    for state in &report.synced {
        print_collection_stats(state);
    }
    for failure in &report.failed {
        print_warning(&format!(
            "Collection '{}' stopped early: {}",
            failure.collection_name, failure.error
        ));
        print_collection_stats(&failure.partial);
    }

    print_run_summary(&report);

    if report.failed.is_empty() {
        print_success("Sync complete");
    }

    Ok(())
}

/// Open a session; any failure here means there is nothing to sync.
async fn login(api: &InstagramApi, config: &Config) -> Result<Session> {
    print_info("Connecting to Instagram...");

    let credentials = Credentials {
        username: config.account.username.trim_start_matches('@').to_string(),
        secret: config.account.session_id.clone(),
    };

    api.login(&credentials).await.map_err(|e| match e {
        Error::Authentication(_) => e,
        other => Error::Authentication(other.to_string()),
    })
}

/// Fetch the remote collection listing.
async fn list_collections(api: &InstagramApi, session: &Session) -> Result<Vec<Collection>> {
    let spinner = create_spinner("Fetching collections...");
    let result = api.list_collections(session).await;
    spinner.finish_and_clear();

    result.map_err(|e| match e {
        Error::Transport(_) | Error::Authentication(_) => e,
        other => Error::Transport(format!("Could not list collections: {}", other)),
    })
}
