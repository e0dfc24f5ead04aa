// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the subcommands: `serve`, `train`, `predict`, `client`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)

use clap::{Args, Subcommand};

use crate::application::train_use_case::TrainConfig;
use crate::client::DEFAULT_URL;
use crate::domain::record::Features;
use crate::server::{ServeConfig, DEFAULT_ADDR};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP service
    Serve(ServeArgs),

    /// Train offline and write a checkpoint
    Train(TrainArgs),

    /// Classify one day of weather with a saved checkpoint
    Predict(PredictArgs),

    /// Talk to a running service
    Client(ClientArgs),
}

/// Hyperparameters shared by `serve` and `train`.
#[derive(Args, Debug, Clone)]
pub struct TrainingFlags {
    /// Number of full passes through the training data
    #[arg(long, default_value_t = 50)]
    pub epochs: usize,

    /// Rows per gradient step
    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Fraction of rows held out for validation
    #[arg(long, default_value_t = 0.2)]
    pub validation_split: f64,

    /// Shuffle rows before the split instead of holding out the tail
    #[arg(long)]
    pub shuffle_split: bool,

    /// Seed for every shuffle; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Data loader worker threads
    #[arg(long, default_value_t = 1)]
    pub num_workers: usize,
}

impl TrainingFlags {
    fn into_config(self, dataset_path: String, checkpoint_dir: Option<String>) -> TrainConfig {
        TrainConfig {
            dataset_path,
            checkpoint_dir,
            epochs:               self.epochs,
            batch_size:           self.batch_size,
            lr:                   self.lr,
            validation_split:     self.validation_split,
            shuffle_before_split: self.shuffle_split,
            seed:                 self.seed,
            num_workers:          self.num_workers,
        }
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, default_value = DEFAULT_ADDR)]
    pub addr: String,

    /// CSV file read on every POST /train
    #[arg(long, default_value = "seattle-weather.csv")]
    pub dataset: String,

    /// Restore from and save to this directory
    #[arg(long)]
    pub checkpoint_dir: Option<String>,

    #[command(flatten)]
    pub training: TrainingFlags,
}

impl From<ServeArgs> for ServeConfig {
    fn from(a: ServeArgs) -> Self {
        ServeConfig {
            addr:  a.addr,
            train: a.training.into_config(a.dataset, a.checkpoint_dir),
        }
    }
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    #[arg(long, default_value = "seattle-weather.csv")]
    pub dataset: String,

    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    #[command(flatten)]
    pub training: TrainingFlags,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        a.training.into_config(a.dataset, Some(a.checkpoint_dir))
    }
}

/// One day of weather. Negative values are accepted as-is.
#[derive(Args, Debug, Clone)]
pub struct FeatureArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub temp_min: f32,

    #[arg(long, allow_hyphen_values = true)]
    pub temp_max: f32,

    #[arg(long, allow_hyphen_values = true)]
    pub precipitation: f32,

    #[arg(long, allow_hyphen_values = true)]
    pub wind: f32,
}

impl From<&FeatureArgs> for Features {
    fn from(a: &FeatureArgs) -> Self {
        Features::new(a.temp_min, a.temp_max, a.precipitation, a.wind)
    }
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Directory written by `train`
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    #[command(flatten)]
    pub features: FeatureArgs,
}

#[derive(Args, Debug)]
pub struct ClientArgs {
    /// Base URL of the service
    #[arg(long, default_value = DEFAULT_URL)]
    pub url: String,

    #[command(subcommand)]
    pub command: ClientCommand,
}

#[derive(Subcommand, Debug)]
pub enum ClientCommand {
    /// POST /train
    Train,

    /// POST /predict and show the resulting scene cues
    Predict(FeatureArgs),

    /// GET /api/skybox
    Skybox,
}
