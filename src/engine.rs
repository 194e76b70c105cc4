//! The puzzle engine: owns the current session and drives it through its lifecycle.
//!
//! ```text
//! Idle ──begin_load──▶ Loading ──finish_load ok──▶ Active ──solved──▶ Completed
//!                         │                          ▲  │                 │
//!                         └──finish_load err──▶ Failed  └────restart──────┘
//! ```
//!
//! Loading is split into [`PuzzleEngine::begin_load`] and [`PuzzleEngine::finish_load`] so the
//! host can decode images asynchronously. Starting a new load invalidates the ticket of any load
//! still in flight; finishing a stale ticket is an error and leaves the engine untouched.
//!
//! The engine owns no timer. The host calls [`PuzzleEngine::tick`] once a second and the engine
//! ignores ticks unless a session is active.

use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::coord::{Cell, Grid};
use crate::error::{PuzzleError, Result};
use crate::moves::{Move, MoveOutcome, MoveSequence};
use crate::partition::{self, ImageCatalog, ImageSource, Tile};
use crate::placement::PlacementState;
use crate::prefs::PendingImageSlot;
use crate::scatter::{ScatterLayoutGenerator, ScatterPosition};

/// Lifecycle of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineState {
    /// Nothing has been loaded yet.
    Idle,
    /// Waiting for an image to be decoded and cut.
    Loading,
    /// A session is being played and its timer runs.
    Active,
    /// Every tile is home. The timer is frozen.
    Completed,
    /// The last load failed. Retry with [`PuzzleEngine::restart`] or [`PuzzleEngine::load`].
    Failed,
}

/// Identifies one call to [`PuzzleEngine::begin_load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    grid: Grid,
}

impl LoadTicket {
    /// The grid the load will cut the image into.
    pub fn grid(&self) -> Grid {
        self.grid
    }
}

#[derive(Debug)]
struct Session {
    tiles: Vec<Tile>,
    placements: PlacementState,
    scatter: Vec<ScatterPosition>,
    elapsed_seconds: u64,
}

/// Where a tile is shown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PieceLocation {
    /// In a cell of the target grid.
    Placed(Cell),
    /// In the staging area at a decorative position.
    Staged(ScatterPosition),
}

/// One tile as the renderer sees it.
#[derive(Debug, Clone, Copy)]
pub struct PieceView<'a> {
    /// The tile.
    pub tile: &'a Tile,
    /// Where to draw it.
    pub location: PieceLocation,
}

/// A read-only snapshot of the engine for rendering.
#[derive(Debug, Clone)]
pub struct SessionView<'a> {
    /// Current lifecycle state.
    pub state: EngineState,
    /// The grid of the current session, if there is one.
    pub grid: Option<Grid>,
    /// Every tile in id order. Empty while there is no session.
    pub pieces: Vec<PieceView<'a>>,
    /// Seconds played so far.
    pub elapsed_seconds: u64,
}

impl SessionView<'_> {
    /// Whether the timer is running.
    pub fn active(&self) -> bool {
        self.state == EngineState::Active
    }

    /// Whether the puzzle has been solved.
    pub fn completed(&self) -> bool {
        self.state == EngineState::Completed
    }

    /// Elapsed time as `MM:SS`.
    pub fn elapsed_label(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.elapsed_seconds / 60,
            self.elapsed_seconds % 60
        )
    }
}

/// Runs puzzle sessions. See the [module documentation](self) for the lifecycle.
pub struct PuzzleEngine<C: ImageCatalog> {
    config: EngineConfig,
    catalog: C,
    scatter: ScatterLayoutGenerator,
    seed: Option<u64>,
    scatter_nonce: u64,
    state: EngineState,
    generation: u64,
    pending: Option<u64>,
    grid: Option<Grid>,
    last_source: Option<ImageSource>,
    session: Option<Session>,
}

impl<C: ImageCatalog> PuzzleEngine<C> {
    /// An idle engine resolving registered images through `catalog`. Fails if `config` does not
    /// pass [`EngineConfig::validate`].
    pub fn new(config: EngineConfig, catalog: C) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            scatter: ScatterLayoutGenerator::new(config.scatter),
            config,
            catalog,
            seed: None,
            scatter_nonce: 0,
            state: EngineState::Idle,
            generation: 0,
            pending: None,
            grid: None,
            last_source: None,
            session: None,
        })
    }

    /// Make staging layouts reproducible. Each regeneration still gets a different layout.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Placements of the current session.
    pub fn placements(&self) -> Option<&PlacementState> {
        self.session.as_ref().map(|s| &s.placements)
    }

    /// Start a load for `difficulty`, superseding any load in flight. The difficulty is checked
    /// before anything changes.
    pub fn begin_load(&mut self, difficulty: u32) -> Result<LoadTicket> {
        let grid = self.config.grid_for(difficulty)?;
        if self.pending.is_some() {
            debug!(generation = self.generation, "superseding pending load");
        }
        self.generation += 1;
        self.pending = Some(self.generation);
        self.grid = Some(grid);
        self.session = None;
        self.state = EngineState::Loading;
        Ok(LoadTicket {
            generation: self.generation,
            grid,
        })
    }

    /// Complete the load identified by `ticket` with the chosen image.
    ///
    /// A stale ticket fails with [`PuzzleError::StaleLoad`] without touching the engine. Decode
    /// and partition errors move the engine to [`EngineState::Failed`] and are returned.
    pub fn finish_load(&mut self, ticket: LoadTicket, source: ImageSource) -> Result<()> {
        if self.pending != Some(ticket.generation) {
            debug!(generation = ticket.generation, "discarding stale load");
            return Err(PuzzleError::StaleLoad);
        }
        self.pending = None;
        self.last_source = Some(source.clone());

        let side = ticket.grid.side();
        let tiles = source
            .decode(&self.catalog)
            .and_then(|image| partition::partition(&image, side, side));
        let tiles = match tiles {
            Ok(tiles) => tiles,
            Err(err) => {
                warn!("failed to load puzzle: {err}");
                self.state = EngineState::Failed;
                return Err(err);
            }
        };

        let scatter = self.next_layout(tiles.len());
        info!(
            difficulty = ticket.grid.difficulty(),
            tiles = tiles.len(),
            "puzzle session started"
        );
        self.session = Some(Session {
            tiles,
            placements: PlacementState::new(ticket.grid),
            scatter,
            elapsed_seconds: 0,
        });
        self.state = EngineState::Active;
        Ok(())
    }

    /// Load `source` cut for `difficulty` in one step.
    pub fn start(&mut self, source: ImageSource, difficulty: u32) -> Result<()> {
        let ticket = self.begin_load(difficulty)?;
        self.finish_load(ticket, source)
    }

    /// Start a session with the image waiting in `slot`, emptying it. An empty slot is a load
    /// failure.
    pub fn start_pending(&mut self, slot: &mut PendingImageSlot, difficulty: u32) -> Result<()> {
        let ticket = self.begin_load(difficulty)?;
        match slot.take() {
            Some(source) => self.finish_load(ticket, source),
            None => {
                self.pending = None;
                self.last_source = None;
                self.state = EngineState::Failed;
                Err(PuzzleError::ImageLoad("no image is waiting to be played".into()))
            }
        }
    }

    /// Cut a new image at the current difficulty, or the configured default before any session.
    pub fn load(&mut self, source: ImageSource) -> Result<()> {
        let difficulty = self
            .grid
            .map_or(self.config.game.default_difficulty, Grid::difficulty);
        self.start(source, difficulty)
    }

    /// Play the current puzzle again from scratch: every tile back in the staging area, a new
    /// staging layout and the timer at zero. The tiles are not cut again.
    ///
    /// After a failed load this retries the last image instead.
    pub fn restart(&mut self) -> Result<()> {
        match self.state {
            EngineState::Active | EngineState::Completed => {
                let nonce = self.bump_nonce();
                let Some(session) = self.session.as_mut() else {
                    return Err(PuzzleError::NotActive(self.state));
                };
                session.placements.reset();
                session.scatter = self.scatter.generate(session.tiles.len(), nonce);
                session.elapsed_seconds = 0;
                self.state = EngineState::Active;
                debug!("puzzle restarted");
                Ok(())
            }
            EngineState::Failed => match (self.last_source.clone(), self.grid) {
                (Some(source), Some(grid)) => self.start(source, grid.difficulty()),
                _ => Err(PuzzleError::NotActive(self.state)),
            },
            EngineState::Idle | EngineState::Loading => Err(PuzzleError::NotActive(self.state)),
        }
    }

    /// Apply one move. Only accepted while [`EngineState::Active`].
    ///
    /// Pointer targets are resolved against the bounds carried in the move; a pointer outside the
    /// grid sends the tile to the staging area. A tile already in the chosen cell is evicted to
    /// the staging area. When the move solves the puzzle the engine becomes
    /// [`EngineState::Completed`] and the timer stops.
    pub fn request_move(&mut self, mv: Move) -> Result<MoveOutcome> {
        if self.state != EngineState::Active {
            return Err(PuzzleError::NotActive(self.state));
        }
        let Some(session) = self.session.as_mut() else {
            return Err(PuzzleError::NotActive(self.state));
        };

        let cell = mv.target.resolve(session.placements.grid());
        let evicted = session.placements.move_tile(mv.tile_id, cell)?;
        let completed = session.placements.is_complete();
        if completed {
            info!(seconds = session.elapsed_seconds, "puzzle completed");
            self.state = EngineState::Completed;
        }
        Ok(MoveOutcome {
            tile_id: mv.tile_id,
            cell,
            evicted,
            completed,
        })
    }

    /// Apply moves in order, stopping at the first error.
    pub fn apply(&mut self, moves: MoveSequence) -> Result<Vec<MoveOutcome>> {
        moves.into_iter().map(|mv| self.request_move(mv)).collect()
    }

    /// Advance the timer by one second while a session is active.
    pub fn tick(&mut self) {
        if self.state != EngineState::Active {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.elapsed_seconds += 1;
        }
    }

    /// A snapshot for rendering.
    pub fn view(&self) -> SessionView<'_> {
        let Some(session) = &self.session else {
            return SessionView {
                state: self.state,
                grid: None,
                pieces: Vec::new(),
                elapsed_seconds: 0,
            };
        };
        let pieces = session
            .placements
            .entries()
            .zip(&session.tiles)
            .map(|(entry, tile)| PieceView {
                tile,
                location: match entry.cell {
                    Some(cell) => PieceLocation::Placed(cell),
                    None => PieceLocation::Staged(session.scatter[entry.tile_id]),
                },
            })
            .collect();
        SessionView {
            state: self.state,
            grid: Some(session.placements.grid()),
            pieces,
            elapsed_seconds: session.elapsed_seconds,
        }
    }

    fn bump_nonce(&mut self) -> Option<u64> {
        self.scatter_nonce = self.scatter_nonce.wrapping_add(1);
        self.seed.map(|seed| seed.wrapping_add(self.scatter_nonce))
    }

    fn next_layout(&mut self, count: usize) -> Vec<ScatterPosition> {
        let nonce = self.bump_nonce();
        self.scatter.generate(count, nonce)
    }
}
