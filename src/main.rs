// src/main.rs
//
// Thin CLI harness around the glucosim library.
//
// - Config comes from defaults + GLUCOSIM_* env overrides, then CLI flags
//   (CLI wins).
// - Deterministic runs via --seed (episode i uses seed + i).
// - Prints a concise run header, then one summary line per episode
//   (or one JSON object per episode with --json).

use std::process;
use std::time::Duration;

use clap::{ArgAction, Parser, ValueEnum};

use glucosim::{
    Config, DiabetesEnv, EpisodeRunner, FixedPolicy, Medication, Policy, RandomPolicy,
    StderrSink, ThresholdPolicy,
};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum PolicyArg {
    Fixed,
    Random,
    Threshold,
}

#[derive(Debug, Parser)]
#[command(
    name = "glucosim",
    about = "Single-patient blood glucose simulator (Gym-style episodes)",
    version
)]
struct Args {
    /// Number of episodes to run.
    #[arg(long, default_value_t = 1)]
    episodes: u64,

    /// Base seed; episode i is reset with seed + i.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Policy used to pick medications.
    #[arg(long, value_enum, default_value_t = PolicyArg::Threshold)]
    policy: PolicyArg,

    /// Action code for --policy fixed
    /// (0 low_insulin, 1 high_insulin, 2 metformin, 3 glimepiride, 4 None).
    #[arg(long, default_value_t = 4)]
    action: i64,

    /// Fix the patient's age at every reset.
    #[arg(long)]
    age: Option<f64>,

    /// Fix the patient's BMI at every reset.
    #[arg(long)]
    bmi: Option<f64>,

    /// Fix the initial glucose at every reset.
    #[arg(long)]
    glucose: Option<f64>,

    /// Steps per episode (defaults to 365 or GLUCOSIM_STEP_LIMIT).
    #[arg(long)]
    step_limit: Option<u64>,

    /// Render the medication sequence after every step.
    #[arg(long)]
    render: bool,

    /// Sleep after each step (ms); only useful together with --render.
    #[arg(long)]
    step_delay_ms: Option<u64>,

    /// Print episode summaries as JSON lines.
    #[arg(long)]
    json: bool,

    /// Verbosity: -v (episodes), -vv (steps)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn build_config(args: &Args) -> Config {
    let mut cfg = Config::from_env_or_default();

    if args.age.is_some() {
        cfg.overrides.age = args.age;
    }
    if args.bmi.is_some() {
        cfg.overrides.bmi = args.bmi;
    }
    if args.glucose.is_some() {
        cfg.overrides.glucose = args.glucose;
    }
    if let Some(limit) = args.step_limit {
        cfg.episode.step_limit = limit;
    }
    if let Some(ms) = args.step_delay_ms {
        cfg.episode.step_delay = Duration::from_millis(ms);
    }
    cfg
}

fn build_policy(args: &Args) -> Result<Box<dyn Policy>, glucosim::EnvError> {
    let policy: Box<dyn Policy> = match args.policy {
        PolicyArg::Fixed => Box::new(FixedPolicy::new(Medication::from_code(args.action)?)),
        PolicyArg::Random => Box::new(RandomPolicy::new(args.seed)),
        PolicyArg::Threshold => Box::new(ThresholdPolicy::default()),
    };
    Ok(policy)
}

fn main() {
    let args = Args::parse();
    let cfg = build_config(&args);

    let mut policy = match build_policy(&args) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(2);
        }
    };

    // Under --json, stdout carries only summary lines.
    let header = format!(
        "glucosim | cfg={} | policy={} | episodes={} | step_limit={} | seed={}",
        cfg.version,
        policy.name(),
        args.episodes,
        cfg.episode.step_limit,
        args.seed
    );
    if args.json {
        eprintln!("{header}");
    } else {
        println!("{header}");
    }

    let mut env = match DiabetesEnv::new(cfg) {
        Ok(env) => env,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(2);
        }
    };

    let mut runner = EpisodeRunner::new(StderrSink::stderr(args.verbose)).with_render(args.render);

    for episode_id in 0..args.episodes {
        let seed = args.seed.wrapping_add(episode_id);
        let summary = match runner.run_episode(&mut env, &mut policy, seed, episode_id) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: episode {episode_id} (seed {seed}): {e}");
                process::exit(1);
            }
        };

        if args.json {
            match serde_json::to_string(&summary) {
                Ok(line) => println!("{line}"),
                Err(e) => {
                    eprintln!("error: could not serialise summary: {e}");
                    process::exit(1);
                }
            }
        } else {
            println!(
                "episode={} seed={} steps={} episode_score={} score={} reward={} tir={:.1}% glucose[min={:.1} mean={:.1} max={:.1}]",
                summary.episode_id,
                summary.seed,
                summary.steps,
                summary.episode_score,
                summary.cumulative_score,
                summary.total_reward,
                100.0 * summary.time_in_range,
                summary.min_glucose,
                summary.mean_glucose,
                summary.max_glucose,
            );
        }
    }

    env.close();
}
