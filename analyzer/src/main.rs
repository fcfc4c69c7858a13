use anyhow::Context;
use clap::Parser;
use gazecore::cache::{JsonFileBackend, ResultCache};
use gazecore::processing::TrialStatistics;
use generator::profile::{write_synthetic_tests, GeneratorConfig};
use log::info;
use std::path::PathBuf;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod ingest;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Eye-movement statistics cache driver")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value = "data")]
    data_folder: PathBuf,
    #[arg(long, default_value = "data/statistics.json")]
    cache: PathBuf,
    #[arg(long, default_value_t = 10.0)]
    window_secs: f64,
    /// Write this many synthetic tests into the data folder before reconciling
    #[arg(long)]
    generate: Option<usize>,
    #[arg(long, default_value_t = 3)]
    trials_per_test: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Print the cached statistics of one test after the run
    #[arg(long)]
    show: Option<String>,
    /// Print how many cached trials share this type tag
    #[arg(long)]
    of_type: Option<String>,
    /// Trial id left out of the --of-type lookup
    #[arg(long, default_value = "")]
    except: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.data_folder, args.cache, args.window_secs)
    };

    if let Some(tests) = args.generate {
        let config = GeneratorConfig {
            tests,
            trials_per_test: args.trials_per_test,
            seed: args.seed,
            ..Default::default()
        };
        let written = write_synthetic_tests(&workflow_config.data_folder, &config)?;
        info!(
            "generated {} recordings under {}",
            written.len(),
            workflow_config.data_folder.display()
        );
    }

    let backend = JsonFileBackend::new(&workflow_config.cache_path);
    let mut cache: ResultCache<TrialStatistics, _> = ResultCache::open(backend)
        .with_context(|| format!("opening cache {}", workflow_config.cache_path.display()))?;

    let runner = Runner::new(workflow_config.clone())?;
    let result = runner.execute(&mut cache)?;

    println!(
        "Reconciled -> removed {}, requested {}, computed {}, failed {}",
        result.removed,
        result.requested,
        result.computed.len(),
        result.failed.len()
    );
    for (key, reason) in &result.failed {
        println!("  {} failed: {}", key, reason);
    }

    if let Some(test) = args.show.as_deref() {
        match cache.test(test) {
            Some(trials) => println!("{}", serde_json::to_string_pretty(trials)?),
            None => println!("no cached statistics for test \"{}\"", test),
        }
    }

    if let Some(kind) = args.of_type.as_deref() {
        let matches = cache.trials_of_type(kind, &args.except);
        println!("{} cached trials of type \"{}\"", matches.len(), kind);
    }

    let metrics = runner.metrics();
    info!(
        "metrics: computed={} failed={} removed={} requested={}",
        metrics.computed, metrics.failed, metrics.removed, metrics.requested
    );

    cache.close().context("closing statistics cache")?;
    Ok(())
}
