// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application), the
// HTTP service (Layer 7) or the client (Layer 8).
//
//   1. `serve`   — run the HTTP service
//   2. `train`   — train offline, write a checkpoint
//   3. `predict` — load a checkpoint and classify one day
//   4. `client`  — call a running service

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{ClientArgs, ClientCommand, Commands, PredictArgs, ServeArgs, TrainArgs};

use crate::domain::record::Features;
use crate::domain::traits::WeatherPredictor;
use crate::domain::weather::WeatherCategory;

#[derive(Parser, Debug)]
#[command(
    name = "skycast",
    version,
    about = "Weather classification service that picks a matching skybox."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch. The CLI only routes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve(args)   => run_serve(args),
            Commands::Train(args)   => run_train(args),
            Commands::Predict(args) => run_predict(args),
            Commands::Client(args)  => run_client(args),
        }
    }
}

fn run_serve(args: ServeArgs) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(crate::server::serve(args.into()))
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on: {}", args.dataset);

    let use_case = TrainUseCase::new(args.into());
    let trained  = use_case.execute()?;

    let q = &trained.summary.data_quality;
    println!("Training complete. {} of {} rows used.", q.usable_rows, q.total_rows);
    if let Some(m) = &trained.summary.final_metrics {
        println!(
            "Final epoch: train_acc={:.1}% val_acc={}",
            m.train_acc * 100.0,
            m.val_acc.map(|v| format!("{:.1}%", v * 100.0)).unwrap_or_else(|| "-".into()),
        );
    }
    if let Some(dir) = &use_case.config().checkpoint_dir {
        println!("Checkpoint saved to '{dir}'.");
    }
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::infra::checkpoint::CheckpointManager;
    use crate::ml::inferencer::Inferencer;

    let ckpt = CheckpointManager::new(&args.checkpoint_dir);
    let predictor: Box<dyn WeatherPredictor> = Box::new(Inferencer::from_checkpoint(&ckpt)?);
    let result = predictor.predict(&Features::from(&args.features))?;

    println!("Prediction: {}", result.category);
    println!("Skybox:     {}", result.scene_id);
    println!("Confidence: {:.1}%", result.confidence * 100.0);
    for (category, p) in WeatherCategory::ALL.iter().zip(result.probabilities) {
        println!("  {:<8} {:.3}", category.as_str(), p);
    }
    Ok(())
}

fn run_client(args: ClientArgs) -> Result<()> {
    use crate::client::cues::{SceneState, SkyboxCatalog};
    use crate::client::ServiceClient;

    let client  = ServiceClient::new(args.url);
    let catalog = SkyboxCatalog::default();
    let mut scene = SceneState::default();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        match args.command {
            ClientCommand::Train => {
                println!("{}", client.train().await?);
            }
            ClientCommand::Predict(features) => {
                let reply = client.predict(&Features::from(&features)).await?;
                println!("Prediction: {}\nSkyBox: {}", reply.prediction, reply.skybox);
                scene.apply_prediction(&reply.prediction, reply.skybox.trim(), &catalog);
                println!("{scene:#?}");
            }
            ClientCommand::Skybox => {
                let skybox = client.skybox().await?;
                scene.apply_skybox(&skybox, &catalog);
                println!("Skybox: {}", scene.skybox);
            }
        }
        Ok::<(), anyhow::Error>(())
    })
}
