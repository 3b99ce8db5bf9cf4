use std::sync::Arc;

use anyhow::Context;
use futures::StreamExt;
use secrecy::{ExposeSecret, SecretString};

use anna::cli::{CliChannel, CliCommand, HELP, INTRO};
use anna::config::AppConfig;
use anna::intake::{IntakeController, prompts};
use anna::outfits::{HttpOutfitService, OutfitService};
use anna::settings::{FileSettingsStore, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = AppConfig::from_env().context("reading configuration")?;

    let store = FileSettingsStore::open(&config.settings_path)
        .await
        .with_context(|| format!("opening settings at {}", config.settings_path.display()))?;
    let mut settings = Settings::load(&store).await.context("loading settings")?;

    eprintln!("👗 Anna v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: {}", settings.api_base);
    eprintln!("   Settings: {}", store.path().display());
    eprintln!("   Credentials: {:?}", config.credential_mode);

    let service = build_service(&settings.api_base, &config)
        .context("building outfit service client")?;
    let mut controller = IntakeController::new(
        service,
        config.credential_mode,
        clone_key(settings.serp_key.as_ref()),
    );
    controller.probe_capabilities().await;
    eprintln!("   Mode: {}", controller.generation_mode().label());
    eprintln!("   {HELP}");
    eprintln!("   {INTRO}\n");

    let cli = CliChannel::new();

    let mut lines = cli.start();
    while let Some(line) = lines.next().await {
        match CliCommand::parse(&line) {
            Some(CliCommand::Quit) => break,
            Some(CliCommand::Help) => cli.notice(HELP),
            Some(CliCommand::ShowSettings) => cli.notice(&format!(
                "API: {} · sleutel: {} · modus: {}",
                settings.api_base,
                if settings.serp_key.is_some() { "ingesteld" } else { "geen" },
                controller.generation_mode().label()
            )),
            Some(CliCommand::SetApiBase(base)) => {
                settings.update(Some(&base), None);
                save_settings(&cli, &store, &settings).await;
                match build_service(&settings.api_base, &config) {
                    Ok(service) => {
                        controller.set_service(service);
                        controller.probe_capabilities().await;
                    }
                    Err(e) => tracing::warn!("Keeping previous outfit service: {}", e),
                }
            }
            Some(CliCommand::SetKey(key)) => {
                settings.update(None, Some(&key));
                save_settings(&cli, &store, &settings).await;
                controller.set_client_key(clone_key(settings.serp_key.as_ref()));
            }
            None => {
                // The confirmation answer may start a generation call.
                let may_generate = controller.step().is_terminal();
                if may_generate {
                    cli.pause_input();
                }
                let replies = controller.submit(&line).await;
                if may_generate {
                    cli.resume_input(&mut lines);
                }
                cli.respond(&replies);
                if controller.is_complete() {
                    break;
                }
            }
        }
    }

    eprintln!();
    Ok(())
}

fn build_service(
    api_base: &str,
    config: &AppConfig,
) -> anna::error::Result<Arc<dyn OutfitService>> {
    let service = HttpOutfitService::new(api_base, config.request_timeout)?;
    Ok(Arc::new(service))
}

fn clone_key(key: Option<&SecretString>) -> Option<SecretString> {
    key.map(|k| SecretString::from(k.expose_secret().to_string()))
}

async fn save_settings(cli: &CliChannel, store: &FileSettingsStore, settings: &Settings) {
    match settings.save(store).await {
        Ok(()) => cli.notice(&format!("Anna: {}", prompts::SETTINGS_SAVED)),
        Err(e) => {
            tracing::warn!("Failed to save settings: {}", e);
            cli.notice("Anna: Instellingen konden niet worden opgeslagen.");
        }
    }
}
