use anyhow::Result;
use clap::Parser;
use forage_core::{Agent, Configurable, Env};
use forage_env::SurvivalEnv;
use forage_policy::DqnPolicy;
use forage_tensorboard::ScalarEvents;
use forage_viz::{EpisodeRecorder, EvalResults, Visualizer};
use log::{info, warn};
use std::path::PathBuf;

/// Render charts and an episode video from the artifacts of a survival
/// gridworld training run.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Directory containing tensorboard event files
    #[arg(long)]
    tensorboard_dir: Option<PathBuf>,

    /// Evaluation results JSON file
    #[arg(long)]
    eval_results: PathBuf,

    /// Policy checkpoint for the episode video and the value function
    #[arg(long)]
    model: Option<PathBuf>,

    /// Directory to write artifacts into
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// Experiment timestamp naming the default save directory
    #[arg(long)]
    timestamp: Option<String>,
}

/// Explicit save dir wins; otherwise the directory is derived from the
/// timestamp, which in turn defaults to the current local time.
fn resolve_save_dir(args: &Args) -> PathBuf {
    match &args.save_dir {
        Some(dir) => dir.clone(),
        None => {
            let timestamp = args
                .timestamp
                .clone()
                .unwrap_or_else(|| chrono::Local::now().format("%Y%m%d_%H%M%S").to_string());
            PathBuf::from("results/evaluation").join(format!("experiment_{}", timestamp))
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let eval = if args.eval_results.exists() {
        Some(EvalResults::load(&args.eval_results)?)
    } else {
        warn!(
            "evaluation results not found at {}, using the default configuration",
            args.eval_results.display()
        );
        None
    };
    let config = eval.as_ref().map(|e| e.config.clone()).unwrap_or_default();

    let viz = Visualizer::new(resolve_save_dir(args))?;

    match &args.tensorboard_dir {
        Some(dir) if dir.exists() => {
            info!("plotting training curves");
            let events = ScalarEvents::load_dir(dir)?;
            viz.training_curves(&events)?;
        }
        _ => info!("skipping training curves (no tensorboard logs available)"),
    }

    if let Some(eval) = &eval {
        info!("plotting action distribution");
        viz.action_distribution(eval)?;
        info!("plotting state heatmap");
        viz.state_heatmap(eval)?;
    }

    match &args.model {
        Some(model) if model.exists() => {
            let mut env = SurvivalEnv::build(&config.environment, 0)?;
            let agent_config = config.agent.clone().board_size(config.environment.size);
            let mut agent = DqnPolicy::build(agent_config);
            agent.load_params(model)?;
            agent.eval();

            info!("recording episode video");
            let recorder = EpisodeRecorder::default();
            if let Err(err) = viz.episode_video(&mut env, &mut agent, &recorder) {
                warn!("failed to create episode video: {}", err);
            }

            info!("plotting value function");
            viz.value_function(&agent)?;
        }
        Some(model) => warn!(
            "model not found at {}, skipping episode video and value function",
            model.display()
        ),
        None => info!("skipping episode video and value function (no model given)"),
    }

    info!("visualizations saved to {}", viz.save_dir().display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    run(&args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> Args {
        Args {
            tensorboard_dir: None,
            eval_results: PathBuf::from("eval_results.json"),
            model: None,
            save_dir: None,
            timestamp: None,
        }
    }

    #[test]
    fn explicit_save_dir_wins_over_timestamp() {
        let args = Args {
            save_dir: Some(PathBuf::from("/tmp/out")),
            timestamp: Some("20260825_093000".into()),
            ..args()
        };
        assert_eq!(resolve_save_dir(&args), PathBuf::from("/tmp/out"));
    }

    #[test]
    fn timestamp_names_the_default_directory() {
        let args = Args {
            timestamp: Some("20260825_093000".into()),
            ..args()
        };
        assert_eq!(
            resolve_save_dir(&args),
            PathBuf::from("results/evaluation/experiment_20260825_093000")
        );
    }

    #[test]
    fn missing_timestamp_derives_one_from_the_clock() {
        let dir = resolve_save_dir(&args());
        let name = dir.file_name().and_then(|n| n.to_str()).unwrap();
        assert!(name.starts_with("experiment_"));
        assert_eq!(name.len(), "experiment_".len() + 15);
        assert!(dir.starts_with("results/evaluation"));
    }
}
