#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless runner for the mosquito population simulation.

mod report;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use mosquito_sim_core::{Command, TICKS_PER_DAY};
use mosquito_sim_persistence::{Checkpoint, BREEDING_SITE_FILE, MOSQUITO_FILE};
use mosquito_sim_world::{self as world, query, Config, World};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::report::Report;

#[derive(Parser, Debug)]
#[command(
    name = "mosquito-sim",
    version,
    about = "Simulate a mosquito population under a genetic-control release"
)]
struct Cli {
    /// TOML file holding `[world]` and `[run]` tables.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of simulated days to run.
    #[arg(long)]
    days: Option<u32>,

    /// Seed overriding the configured one.
    #[arg(long)]
    seed: Option<u64>,

    /// Days between report rows.
    #[arg(long)]
    report_every: Option<u32>,

    /// Kill every female inheriting the engineered allele.
    #[arg(long)]
    female_lethal: bool,

    /// Directory to resume from instead of bootstrapping a fresh population.
    #[arg(long)]
    load_dir: Option<PathBuf>,

    /// Directory receiving a checkpoint once the run ends.
    #[arg(long)]
    save_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    world: Config,
    run: RunSettings,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RunSettings {
    days: u32,
    report_every: u32,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            days: 60,
            report_every: 1,
        }
    }
}

impl ConfigFile {
    fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid simulation config")
    }

    fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(seed) = cli.seed {
            self.world.seed = seed;
        }
        if cli.female_lethal {
            self.world.female_lethal = true;
        }
        if let Some(days) = cli.days {
            self.run.days = days;
        }
        if let Some(every) = cli.report_every {
            self.run.report_every = every;
        }
    }
}

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();

    let cli = Cli::parse();
    let mut settings = match &cli.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    settings.apply_overrides(&cli);

    let mut world = match &cli.load_dir {
        Some(dir) => load_checkpoint(dir, settings.world.clone())?,
        None => World::new(settings.world.clone()).context("invalid simulation config")?,
    };

    let stdout = io::stdout();
    let report = Report::new(stdout.lock()).context("failed to write report")?;
    let _ = run(&mut world, &settings.run, report)?;

    if let Some(dir) = &cli.save_dir {
        save_checkpoint(dir, &world)?;
    }
    Ok(())
}

fn run<W: io::Write>(world: &mut World, run: &RunSettings, mut report: Report<W>) -> Result<W> {
    let every = run.report_every.max(1);
    let mut events = Vec::new();

    report
        .row(query::day(world), &query::population(world))
        .context("failed to write report")?;

    for day in 1..=run.days {
        for _ in 0..TICKS_PER_DAY {
            events.clear();
            world::apply(world, Command::Tick, &mut events);
        }

        let counts = query::population(world);
        if day % every == 0 || day == run.days {
            info!(
                day,
                total = counts.total,
                engineered = counts.homozygous_dominant + counts.heterozygous,
                pupae = query::pupa_count(world),
                "day complete"
            );
            report
                .row(query::day(world), &counts)
                .context("failed to write report")?;
        }

        if counts.total == 0
            && query::pupa_count(world) == 0
            && query::release_schedule(world).remaining() == 0
        {
            warn!(day, "population extinct");
            break;
        }
    }

    report.finish().context("failed to flush report")
}

fn load_checkpoint(dir: &Path, config: Config) -> Result<World> {
    let read = |name: &str| {
        let path = dir.join(name);
        fs::read_to_string(&path)
            .with_context(|| format!("failed to read checkpoint file {}", path.display()))
    };
    let mosquitoes = read(MOSQUITO_FILE)?;
    let sites = read(BREEDING_SITE_FILE)?;

    let checkpoint = Checkpoint::decode(&mosquitoes, &sites)
        .with_context(|| format!("corrupt checkpoint in {}", dir.display()))?;
    debug!(
        mosquitoes = checkpoint.mosquitoes.len(),
        breeding_sites = checkpoint.breeding_sites.len(),
        "loaded checkpoint"
    );
    checkpoint
        .into_world(config)
        .context("invalid simulation config")
}

fn save_checkpoint(dir: &Path, world: &World) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create checkpoint directory {}", dir.display()))?;
    let checkpoint = Checkpoint::capture(world);

    let write = |name: &str, contents: String| {
        let path = dir.join(name);
        fs::write(&path, contents)
            .with_context(|| format!("failed to write checkpoint file {}", path.display()))
    };
    write(MOSQUITO_FILE, checkpoint.encode_mosquitoes())?;
    write(BREEDING_SITE_FILE, checkpoint.encode_breeding_sites())?;
    info!(path = %dir.display(), "saved checkpoint");
    Ok(())
}
