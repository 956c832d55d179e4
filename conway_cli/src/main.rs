// main.rs - Headless host: runs the simulation and prints every generation as text

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use conway::{Dimensions, Simulation, SimulationConfig, Snapshot, patterns};
use log::info;

const DEFAULT_GENERATIONS: u64 = 50;

const USAGE: &str = "\
usage: conway_cli [--config <file.toml>] [--size 10x20|30x30|30x50]
                  [--pattern <name>] [--generations <n>]";

#[derive(Debug, PartialEq)]
struct Options {
    config: Option<PathBuf>,
    size: Option<Dimensions>,
    pattern: Option<String>,
    generations: u64,
    help: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options> {
    let mut options = Options {
        config: None,
        size: None,
        pattern: None,
        generations: DEFAULT_GENERATIONS,
        help: false,
    };

    while let Some(arg) = args.next() {
        let mut value = || args.next().with_context(|| format!("{} needs a value", arg));
        match arg.as_str() {
            "--config" => options.config = Some(PathBuf::from(value()?)),
            "--size" => options.size = Some(value()?.parse()?),
            "--pattern" => options.pattern = Some(value()?),
            "--generations" => {
                let text = value()?;
                options.generations = text
                    .parse()
                    .with_context(|| format!("'{}' is not a generation count", text))?;
            }
            "-h" | "--help" => options.help = true,
            other => bail!("unexpected argument '{}'\n{}", other, USAGE),
        }
    }
    Ok(options)
}

fn load_config(options: &Options) -> Result<SimulationConfig> {
    let mut config = match &options.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            SimulationConfig::from_toml_str(&text)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => SimulationConfig::default(),
    };
    if let Some(size) = options.size {
        config.dimensions = size;
    }
    Ok(config)
}

fn print_snapshot(snapshot: &Snapshot) {
    println!(
        "Generation {} | {} live | {}{}",
        snapshot.generation,
        snapshot.grid.population(),
        snapshot.dimensions,
        if snapshot.running { "" } else { " | stopped" }
    );
    print!("{}", snapshot.grid);
    println!();
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let options = parse_args(std::env::args().skip(1))?;
    if options.help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = load_config(&options)?;
    let mut sim = Simulation::new(config)?;
    match &options.pattern {
        Some(name) => {
            sim.load_pattern(patterns::find(name)?)?;
        }
        None => sim.seed_random()?,
    }

    run(&mut sim, options.generations, print_snapshot).await
}

/// Runs until `generations` have passed, the pattern settles, or Ctrl-C.
/// Every snapshot seen, including the starting one, goes to `on_snapshot`.
async fn run(
    sim: &mut Simulation,
    generations: u64,
    mut on_snapshot: impl FnMut(&Snapshot),
) -> Result<()> {
    if sim.generation() >= generations {
        on_snapshot(&sim.snapshot());
        return Ok(());
    }

    let mut updates = sim.subscribe();
    sim.start();
    on_snapshot(&updates.borrow_and_update());

    loop {
        tokio::select! {
            changed = updates.changed() => {
                changed?;
                let snapshot = updates.borrow_and_update().clone();
                on_snapshot(&snapshot);
                if !snapshot.running {
                    info!("Pattern settled after {} generations", snapshot.generation);
                    break;
                }
                if snapshot.generation >= generations {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    sim.stop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn no_arguments_give_defaults() {
        let options = parse_args(args(&[])).unwrap();
        assert_eq!(options.generations, DEFAULT_GENERATIONS);
        assert_eq!(options.size, None);
        assert!(!options.help);
    }

    #[test]
    fn flags_are_parsed() {
        let options = parse_args(args(&[
            "--size", "30x50", "--pattern", "Glider", "--generations", "7", "--config", "life.toml",
        ]))
        .unwrap();
        assert_eq!(options.size, Some(Dimensions::Wide));
        assert_eq!(options.pattern.as_deref(), Some("Glider"));
        assert_eq!(options.generations, 7);
        assert_eq!(options.config, Some(PathBuf::from("life.toml")));
    }

    #[test]
    fn bad_arguments_are_errors() {
        assert!(parse_args(args(&["--size", "12x12"])).is_err());
        assert!(parse_args(args(&["--generations", "many"])).is_err());
        assert!(parse_args(args(&["--pattern"])).is_err());
        assert!(parse_args(args(&["--fast"])).is_err());
    }

    fn block_simulation(stop_on_cycle: bool) -> Simulation {
        let config = SimulationConfig {
            stop_on_cycle,
            ..SimulationConfig::default()
        };
        let mut sim = Simulation::new(config).unwrap();
        sim.load_pattern(patterns::find("Block").unwrap()).unwrap();
        sim
    }

    #[tokio::test(start_paused = true)]
    async fn zero_generations_never_starts() {
        let mut sim = block_simulation(false);
        let mut seen = Vec::new();
        run(&mut sim, 0, |s| seen.push((s.generation, s.running))).await.unwrap();

        assert_eq!(seen, vec![(0, false)]);
        tokio::time::sleep(std::time::Duration::from_millis(1000)).await;
        assert_eq!(sim.generation(), 0);
        assert!(!sim.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn runs_exactly_the_requested_generations() {
        let mut sim = block_simulation(false);
        let mut seen = Vec::new();
        run(&mut sim, 3, |s| seen.push(s.generation)).await.unwrap();

        assert_eq!(seen, vec![0, 1, 2, 3]);
        assert_eq!(sim.generation(), 3);
        assert!(!sim.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn settled_pattern_ends_the_run_early() {
        let mut sim = block_simulation(true);
        let mut seen = Vec::new();
        run(&mut sim, 50, |s| seen.push(s.generation)).await.unwrap();

        assert_eq!(seen, vec![0, 1]);
        assert!(!sim.is_running());
    }

    #[test]
    fn size_flag_overrides_the_config() {
        let options = parse_args(args(&["--size", "10x20"])).unwrap();
        let config = load_config(&options).unwrap();
        assert_eq!(config.dimensions, Dimensions::Small);
        assert_eq!(config.tick_interval_ms, 150);
    }
}
