//! Autoworld Player - command-line entry point.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use autoworld_player::infrastructure::platform::create_platform;
use autoworld_player::infrastructure::HttpApiAdapter;
use autoworld_player::ui::{drain_into, DioramaApp, PanelSkin, Skin, StudioSkin};
use autoworld_player::{ActionOutcome, Api, PlayerConfig, SkinKind, UiController};
use autoworld_shared::{InteractionDensity, ScenarioConfig};

#[derive(Debug, Parser)]
#[command(name = "autoworld-player", version, about = "Terminal client for the Autoworld simulation")]
struct Cli {
    /// Backend base URL (overrides AUTOWORLD_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Front-end to render with (overrides AUTOWORLD_SKIN)
    #[arg(long, value_enum, global = true)]
    skin: Option<SkinKind>,

    /// Where downloads are written (overrides AUTOWORLD_DOWNLOAD_DIR)
    #[arg(long, global = true)]
    download_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the simulation status
    Status,
    /// Seed a scenario from character placements
    Seed {
        /// CHARACTER_ID=LOCATION_ID, repeatable
        #[arg(long = "place", value_parser = parse_placement)]
        place: Vec<(String, String)>,
        #[arg(long, default_value_t = 0.75, value_parser = parse_unit)]
        autonomy: f64,
        #[arg(long, default_value_t = 0.25, value_parser = parse_unit)]
        randomness: f64,
        #[arg(long, default_value = "moderate")]
        density: String,
        /// Let the backend use its language model
        #[arg(long)]
        llm: bool,
    },
    /// Run the simulation
    Run {
        #[arg(long, default_value_t = 60)]
        minutes: u32,
    },
    /// Show the emergence report
    Report,
    /// Save the session on the backend
    Save {
        /// Skip the name prompt
        #[arg(long)]
        name: Option<String>,
    },
    /// Reset the simulation
    Reset {
        /// Skip the confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Extract paintable moments
    Moments {
        #[arg(long)]
        llm: bool,
        /// Also write the moments to a text file
        #[arg(long)]
        download: bool,
    },
    /// Analyze field-note quality
    Quality,
    /// Export the training dataset to a JSON file
    Export {
        #[arg(long)]
        llm: bool,
    },
    /// Show the most recent field notes
    Recent {
        #[arg(long, default_value_t = 10)]
        count: u32,
    },
    /// Watch the map (interactive with the diorama skin)
    Map,
}

fn parse_placement(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((character, location)) if !character.is_empty() && !location.is_empty() => {
            Ok((character.to_string(), location.to_string()))
        }
        _ => Err(format!("expected CHARACTER_ID=LOCATION_ID, got {value:?}")),
    }
}

fn parse_unit(value: &str) -> Result<f64, String> {
    let parsed: f64 = value
        .parse()
        .map_err(|_| format!("{value:?} is not a number"))?;
    if (0.0..=1.0).contains(&parsed) {
        Ok(parsed)
    } else {
        Err(format!("{parsed} is outside 0.0 - 1.0"))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "autoworld_player=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = PlayerConfig::from_env()?;
    if let Some(api_url) = &cli.api_url {
        config = config.with_api_url(api_url)?;
    }
    if let Some(skin) = cli.skin {
        config.skin = skin;
    }
    if let Some(dir) = &cli.download_dir {
        config.download_dir = dir.clone();
    }

    tracing::info!(api_url = %config.api_url, skin = ?config.skin, "Starting Autoworld player");

    let (preset_answer, assume_yes) = match &cli.command {
        Command::Save { name } => (name.clone(), false),
        Command::Reset { yes } => (None, *yes),
        _ => (None, false),
    };
    let platform = create_platform(config.download_dir.clone(), preset_answer, assume_yes);
    let adapter = HttpApiAdapter::new(config.api_url.clone(), config.request_timeout);
    let (controller, mut receiver) = UiController::create(Api::new(Arc::new(adapter)), platform);

    if matches!(cli.command, Command::Map) && config.skin == SkinKind::Diorama {
        controller.bootstrap().await;
        controller.refresh_map().await;
        controller.start_map_polling(config.map_poll_interval);
        controller.start_status_polling(config.status_poll_interval);
        let result = DioramaApp::new(controller.clone(), receiver)?.run().await;
        controller.teardown();
        result?;
        return Ok(ExitCode::SUCCESS);
    }

    let mut skin: Box<dyn Skin> = match config.skin {
        SkinKind::Studio => Box::new(StudioSkin::new(io::stdout())),
        SkinKind::Panel | SkinKind::Diorama => Box::new(PanelSkin::new(io::stdout())),
    };

    controller.bootstrap().await;
    drain_into(skin.as_mut(), &mut receiver)?;

    let outcome = match cli.command {
        Command::Map => {
            watch_map(&controller, &config, skin.as_mut(), &mut receiver).await?;
            ActionOutcome::Completed
        }
        command => execute(&controller, command, config.skin == SkinKind::Panel).await,
    };
    drain_into(skin.as_mut(), &mut receiver)?;
    controller.teardown();

    tracing::debug!(?outcome, "Command finished");
    Ok(if outcome.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

async fn execute(controller: &UiController, command: Command, quality_after_extract: bool) -> ActionOutcome {
    match command {
        // Bootstrap already rendered the status
        Command::Status => ActionOutcome::Completed,
        Command::Seed {
            place,
            autonomy,
            randomness,
            density,
            llm,
        } => {
            for (character, location) in &place {
                let outcome = controller.select_placement(character, Some(location)).await;
                if outcome != ActionOutcome::Completed {
                    return outcome;
                }
            }
            let config = ScenarioConfig {
                autonomy_level: autonomy,
                randomness,
                interaction_density: InteractionDensity::new(density),
                ..ScenarioConfig::default()
            };
            controller.seed_scenario(config, llm).await
        }
        Command::Run { minutes } => controller.run_simulation(minutes).await,
        Command::Report => controller.load_emergence_report().await,
        Command::Save { .. } => controller.save_session().await,
        Command::Reset { .. } => controller.reset().await,
        Command::Moments { llm, download } => {
            let outcome = controller
                .extract_paintable_moments(llm, quality_after_extract)
                .await;
            if download && outcome == ActionOutcome::Completed {
                controller.download_moments().await
            } else {
                outcome
            }
        }
        Command::Quality => controller.analyze_quality().await,
        Command::Export { llm } => controller.export_dataset(llm).await,
        Command::Recent { count } => controller.load_recent(count).await,
        Command::Map => controller.refresh_map().await,
    }
}

/// Keep polling and rendering the map until Ctrl-C
async fn watch_map(
    controller: &UiController,
    config: &PlayerConfig,
    skin: &mut dyn Skin,
    receiver: &mut tokio::sync::mpsc::UnboundedReceiver<autoworld_player::presentation::ViewUpdate>,
) -> anyhow::Result<()> {
    controller.refresh_map().await;
    controller.start_map_polling(config.map_poll_interval);
    controller.start_status_polling(config.status_poll_interval);

    loop {
        tokio::select! {
            update = receiver.recv() => match update {
                Some(update) => skin.apply(&update)?,
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, stopping map watch");
                break;
            }
        }
    }
    Ok(())
}
