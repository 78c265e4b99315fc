use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;
use steering_cli::{output, Simulation};
use steering_shared::{Formation, Scenario};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormationArg {
    Convoy,
    Pursuit,
}

impl From<FormationArg> for Formation {
    fn from(arg: FormationArg) -> Self {
        match arg {
            FormationArg::Convoy => Formation::Convoy,
            FormationArg::Pursuit => Formation::Pursuit,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless steering simulation", long_about = None)]
struct Args {
    /// Scenario JSON file; the built-in demo scenario is used when omitted
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,

    /// Override the scenario's initial agent count
    #[arg(short, long)]
    agents: Option<usize>,

    /// Seed for spawn positions and wander drift
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Override the scenario's formation
    #[arg(short, long, value_enum)]
    formation: Option<FormationArg>,

    /// Treat other agents as obstacles during avoidance
    #[arg(long)]
    agents_as_obstacles: bool,

    /// Record avoidance probes (logged at debug level)
    #[arg(long)]
    probes: bool,

    /// Remove agents whose lifespan has run out
    #[arg(long)]
    cull_expired: bool,

    /// Frame output file (JSON lines); stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write every Nth frame; 0 disables frame output
    #[arg(long, default_value_t = 10)]
    stride: u64,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn load_scenario(args: &Args) -> Result<Scenario> {
    let mut scenario = match &args.scenario {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read scenario {}", path.display()))?;
            Scenario::from_json(&text)
                .with_context(|| format!("Failed to parse scenario {}", path.display()))?
        }
        None => Scenario::default(),
    };

    if let Some(count) = args.agents {
        scenario.agent_count = count;
    }
    if let Some(formation) = args.formation {
        scenario.formation = formation.into();
    }
    if args.agents_as_obstacles {
        scenario.agents_as_obstacles = true;
    }
    Ok(scenario)
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    log::info!("Steering simulation starting...");
    match &args.scenario {
        Some(path) => log::info!("Scenario: {}", path.display()),
        None => log::info!("Scenario: built-in demo"),
    }

    let scenario = load_scenario(&args)?;
    let mut sim = Simulation::new(scenario, args.seed).context("Invalid scenario")?;
    sim.set_debug(args.probes);
    sim.set_cull_expired(args.cull_expired);

    let out = output::open(args.output.as_deref())?;
    let mut frames = output::FrameWriter::new(out, args.stride);

    frames.write(&sim.frame())?;
    for _ in 0..args.ticks {
        sim.step();
        frames.write(&sim.frame())?;
    }
    let written = frames.written();
    frames.finish()?;

    let totals = sim.totals();
    log::info!(
        "Done: {} ticks, {} agents, {} frames, {} collision alerts ({} overlapping)",
        sim.tick(),
        sim.fleet().agents.len(),
        written,
        totals.collisions,
        totals.imminent
    );

    Ok(())
}
