// simulation.rs - Controller that owns the grid and advances it on a fixed-delay timer
//
// The timer is a single spawned task: sleep, tick, repeat. Each start bumps the run
// epoch, and a tick only applies while its epoch is current, so a tick scheduled by
// an earlier run can never land after stop().

use std::collections::VecDeque;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::SimulationConfig;
use crate::dimensions::Dimensions;
use crate::error::{Result, SimulationError};
use crate::grid::Grid;
use crate::patterns::Pattern;

/// Everything an observer needs to redraw.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub grid: Grid,
    pub dimensions: Dimensions,
    pub running: bool,
    pub generation: u64,
}

struct State {
    grid: Grid,
    dimensions: Dimensions,
    running: bool,
    generation: u64,
    epoch: u64,
    history: VecDeque<u64>,
}

impl State {
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid.clone(),
            dimensions: self.dimensions,
            running: self.running,
            generation: self.generation,
        }
    }

    fn reset_grid(&mut self, grid: Grid) {
        self.grid = grid;
        self.generation = 0;
        self.history.clear();
    }

    /// Records the current grid; true if it matches one of the last `limit` grids.
    /// A limit of 0 still remembers the previous grid.
    fn record_and_check_cycle(&mut self, limit: usize) -> bool {
        let limit = limit.max(1);
        let hash = hash_grid(&self.grid);
        if self.history.contains(&hash) {
            return true;
        }
        self.history.push_back(hash);
        while self.history.len() > limit {
            self.history.pop_front();
        }
        false
    }
}

fn hash_grid(grid: &Grid) -> u64 {
    let mut hasher = DefaultHasher::new();
    grid.hash(&mut hasher);
    hasher.finish()
}

struct Shared {
    state: Mutex<State>,
    updates: watch::Sender<Snapshot>,
    stop_on_cycle: bool,
    cycle_history: usize,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &State) {
        self.updates.send_replace(state.snapshot());
    }

    /// Advances one generation for run `epoch`. Returns false once the run is over.
    fn tick(&self, epoch: u64) -> bool {
        let mut state = self.lock();
        if !state.running || state.epoch != epoch {
            return false;
        }

        state.grid = state.grid.next_generation();
        state.generation += 1;
        debug!(
            "Generation {}: {} live cells",
            state.generation,
            state.grid.population()
        );

        let mut keep_running = true;
        if self.stop_on_cycle && state.record_and_check_cycle(self.cycle_history) {
            info!("Generation {} repeats an earlier grid, stopping", state.generation);
            state.running = false;
            state.epoch += 1;
            keep_running = false;
        }

        self.publish(&state);
        keep_running
    }
}

/// Timer coroutine for one run: fixed delay after each completed tick.
async fn run_ticks(shared: Arc<Shared>, epoch: u64, interval: Duration) {
    loop {
        tokio::time::sleep(interval).await;
        if !shared.tick(epoch) {
            break;
        }
    }
}

pub struct Simulation {
    shared: Arc<Shared>,
    runtime: Handle,
    pending: Option<JoinHandle<()>>,
    rng: SmallRng,
    config: SimulationConfig,
}

impl Simulation {
    /// Creates a stopped simulation with an empty grid. Must be called inside a tokio runtime.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| SimulationError::NoRuntime)?;
        Ok(Self::with_runtime(runtime, config))
    }

    pub fn with_runtime(runtime: Handle, config: SimulationConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_rng(&mut rand::rng()),
        };

        let dimensions = config.dimensions;
        let state = State {
            grid: Grid::empty(dimensions.rows(), dimensions.cols()),
            dimensions,
            running: false,
            generation: 0,
            epoch: 0,
            history: VecDeque::new(),
        };
        let (updates, _) = watch::channel(state.snapshot());

        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                updates,
                stop_on_cycle: config.stop_on_cycle,
                cycle_history: config.cycle_history,
            }),
            runtime,
            pending: None,
            rng,
            config,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    // --- Queries ---

    pub fn snapshot(&self) -> Snapshot {
        self.shared.lock().snapshot()
    }

    pub fn grid(&self) -> Grid {
        self.shared.lock().grid.clone()
    }

    pub fn dimensions(&self) -> Dimensions {
        self.shared.lock().dimensions
    }

    pub fn is_running(&self) -> bool {
        self.shared.lock().running
    }

    pub fn generation(&self) -> u64 {
        self.shared.lock().generation
    }

    pub fn population(&self) -> usize {
        self.shared.lock().grid.population()
    }

    /// Receiver that sees a new snapshot on every change of grid, size or run state.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.shared.updates.subscribe()
    }

    // --- Run control ---

    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        // A finished or aborted earlier run may still hold a handle
        self.cancel_pending();

        let epoch = {
            let mut state = self.shared.lock();
            state.running = true;
            state.epoch += 1;
            state.history.clear();
            state.record_and_check_cycle(self.shared.cycle_history);
            self.shared.publish(&state);
            info!("Started at generation {}", state.generation);
            state.epoch
        };

        let task = run_ticks(Arc::clone(&self.shared), epoch, self.config.tick_interval());
        self.pending = Some(self.runtime.spawn(task));
    }

    pub fn stop(&mut self) {
        self.cancel_pending();

        let mut state = self.shared.lock();
        if state.running {
            state.running = false;
            state.epoch += 1;
            self.shared.publish(&state);
            info!("Stopped at generation {}", state.generation);
        }
    }

    pub fn toggle_running(&mut self) {
        if self.is_running() {
            self.stop();
        } else {
            self.start();
        }
    }

    // --- Grid edits, only while stopped ---

    pub fn set_dimensions(&mut self, dimensions: Dimensions) -> Result<()> {
        self.mutate("change the grid size", |state, _| {
            state.dimensions = dimensions;
            state.reset_grid(Grid::empty(dimensions.rows(), dimensions.cols()));
            Ok(())
        })?;
        self.cancel_pending();
        info!("Grid resized to {}", dimensions);
        Ok(())
    }

    pub fn seed_random(&mut self) -> Result<()> {
        let density = self.config.seed_density;
        let population = self.mutate("seed the grid", |state, rng| {
            let (rows, cols) = (state.dimensions.rows(), state.dimensions.cols());
            state.reset_grid(Grid::random(rows, cols, density, rng));
            Ok(state.grid.population())
        })?;
        info!("Seeded grid with {} live cells", population);
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.mutate("clear the grid", |state, _| {
            let (rows, cols) = (state.dimensions.rows(), state.dimensions.cols());
            state.reset_grid(Grid::empty(rows, cols));
            Ok(())
        })
    }

    /// Flips one cell and returns its new state. Out-of-range coordinates are an error.
    pub fn toggle_cell(&mut self, row: usize, col: usize) -> Result<bool> {
        self.mutate("toggle a cell", |state, _| state.grid.toggle(row, col))
    }

    /// Clears the grid and places `pattern` in the middle. Returns how many cells fit.
    pub fn load_pattern(&mut self, pattern: &Pattern) -> Result<usize> {
        let placed = self.mutate("load a pattern", |state, _| {
            let (rows, cols) = (state.dimensions.rows(), state.dimensions.cols());
            state.reset_grid(Grid::empty(rows, cols));
            let origin = state.grid.centered_origin(pattern);
            Ok(state.grid.stamp(pattern, origin))
        })?;
        if placed < pattern.cells.len() {
            warn!(
                "{} does not fit a {} grid, {} of {} cells placed",
                pattern.name,
                self.dimensions(),
                placed,
                pattern.cells.len()
            );
        } else {
            info!("Loaded {}", pattern.name);
        }
        Ok(placed)
    }

    fn mutate<T>(
        &mut self,
        operation: &'static str,
        edit: impl FnOnce(&mut State, &mut SmallRng) -> Result<T>,
    ) -> Result<T> {
        let mut state = self.shared.lock();
        if state.running {
            warn!("Refused to {} while running", operation);
            return Err(SimulationError::InvalidState { operation });
        }
        let value = edit(&mut *state, &mut self.rng)?;
        self.shared.publish(&state);
        Ok(value)
    }

    fn cancel_pending(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        self.cancel_pending();
        let mut state = self.shared.lock();
        state.running = false;
        state.epoch += 1;
    }
}
