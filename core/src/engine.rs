use core::ops::BitOr;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::{chord, loss, reveal};
use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    Ready,
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Outcome of activating or chording a cell.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ActivateOutcome {
    NoChange,
    Revealed,
    Won,
    Detonated,
}

impl ActivateOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

impl BitOr for ActivateOutcome {
    type Output = ActivateOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use ActivateOutcome::*;
        match (self, rhs) {
            (Detonated, _) | (_, Detonated) => Detonated,
            (Won, _) | (_, Won) => Won,
            (Revealed, _) | (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}

/// Outcome of toggling a flag or ending a chord.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// Outcome of feeding one scheduled explosion back into the engine.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FireOutcome {
    /// The captured generation no longer matches; the callback outlived its
    /// round and must change nothing.
    Stale,
    Exploded,
    /// Final step: the input lock is released and the round is lost.
    SequenceComplete,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct PendingLoss {
    schedule: LossSchedule,
    fired: usize,
}

/// The whole rules engine of one game: board, cover/flag overlays, chord
/// handling, loss sequencing, and the `ready → playing → won | lost` state
/// machine. All mutation happens through the input methods below; the
/// presentation layer only reads the observables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    config: GameConfig,
    seed: u64,
    generation: u64,
    status: GameStatus,
    board: Board,
    cover: CoverGrid,
    flags: FlagGrid,
    exploded: HashSet<Coord2>,
    chord_rejected: HashSet<Coord2>,
    pending_loss: Option<PendingLoss>,
    chord_active: Option<Coord2>,
}

impl Game {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut game = Self {
            config,
            seed,
            generation: 0,
            status: GameStatus::Ready,
            board: Board::empty(config.size),
            cover: CoverGrid::default(config.size.to_nd_index()),
            flags: FlagGrid::default(config.size.to_nd_index()),
            exploded: HashSet::new(),
            chord_rejected: HashSet::new(),
            pending_loss: None,
            chord_active: None,
        };
        game.reset();
        game
    }

    // ------------------------------------------------------------------
    // observables

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cover(&self) -> &CoverGrid {
        &self.cover
    }

    pub fn flags(&self) -> &FlagGrid {
        &self.flags
    }

    pub fn is_covered(&self, coords: Coord2) -> bool {
        self.board.in_bounds(coords) && self.cover[coords.to_nd_index()]
    }

    pub fn is_flagged(&self, coords: Coord2) -> bool {
        self.board.in_bounds(coords) && self.flags[coords.to_nd_index()]
    }

    pub fn is_exploded(&self, coords: Coord2) -> bool {
        self.exploded.contains(&coords)
    }

    pub fn exploded(&self) -> &HashSet<Coord2> {
        &self.exploded
    }

    pub fn chord_rejected(&self) -> &HashSet<Coord2> {
        &self.chord_rejected
    }

    pub fn bomb_neighbor_count(&self, coords: Coord2) -> u8 {
        self.board.adjacent_mine_count(coords)
    }

    pub fn total_mines(&self) -> CellCount {
        self.board.mine_count()
    }

    pub fn total_flags(&self) -> CellCount {
        self.flags
            .iter()
            .filter(|&&flagged| flagged)
            .count()
            .try_into()
            .unwrap()
    }

    pub fn remaining_mines(&self) -> isize {
        (self.total_mines() as isize) - (self.total_flags() as isize)
    }

    /// True while a loss sequence is pending; every input is locked until the
    /// final scheduled explosion fires.
    pub fn is_loss_processing(&self) -> bool {
        self.pending_loss.is_some()
    }

    pub fn loss_schedule(&self) -> Option<&LossSchedule> {
        self.pending_loss.as_ref().map(|pending| &pending.schedule)
    }

    // ------------------------------------------------------------------
    // inputs

    /// Discards the round and returns to `Ready` with a fresh preview board.
    /// The preview layout is replaced at the first activation, which is when
    /// the safe zone is known.
    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.clear_overlays();
        self.board = BernoulliGenerator::new(self.round_seed()).generate(self.config);
        self.status = GameStatus::Ready;
        log::debug!(
            "round {} ready, {}x{} preview board",
            self.generation,
            self.config.size.0,
            self.config.size.1
        );
    }

    pub fn configure(&mut self, config: GameConfig) {
        self.config = config;
        self.reset();
    }

    /// Replaces the board with a handcrafted layout and commits it to play.
    /// This is the manual set-map path; dimensions must match the current
    /// configuration.
    pub fn set_board(&mut self, board: Board) -> Result<()> {
        if board.size() != self.config.size {
            return Err(GameError::InvalidBoardShape);
        }

        self.generation = self.generation.wrapping_add(1);
        self.clear_overlays();
        self.board = board;
        self.status = GameStatus::Playing;
        Ok(())
    }

    /// Primary activation of a cell. On the first activation of a round this
    /// commits the board (regenerated with a safe zone around the click) and
    /// then reveals; afterwards it reveals safe cells and detonates mines.
    /// Flag state is not consulted: activating a flagged mine still detonates.
    pub fn activate_cell(&mut self, coords: Coord2) -> ActivateOutcome {
        use ActivateOutcome::*;

        if !self.accepts_input() || self.chord_active.is_some() || !self.board.in_bounds(coords) {
            return NoChange;
        }

        match self.status {
            GameStatus::Ready => {
                self.board = BernoulliGenerator::with_safe_zone(self.round_seed(), coords)
                    .generate(self.config);
                self.status = GameStatus::Playing;
                log::debug!(
                    "board committed at {:?} with {} mines",
                    coords,
                    self.board.mine_count()
                );
                // board creation and the opening reveal are two separate
                // steps, in that order; the click itself is safe by
                // construction
                self.reveal_at(coords)
            }
            GameStatus::Playing => {
                if self.is_covered(coords) && self.board.contains_mine(coords) {
                    self.detonate(coords);
                    Detonated
                } else {
                    self.reveal_at(coords)
                }
            }
            GameStatus::Won | GameStatus::Lost => NoChange,
        }
    }

    /// Pure toggle of a single covered cell's flag. Allowed in `Ready` and
    /// `Playing`; flags placed before the first activation survive the board
    /// commit.
    pub fn toggle_flag(&mut self, coords: Coord2) -> MarkOutcome {
        if !self.accepts_input() || !self.is_covered(coords) {
            return MarkOutcome::NoChange;
        }

        let flag = &mut self.flags[coords.to_nd_index()];
        *flag = !*flag;
        log::trace!("flag at {:?} now {}", coords, *flag);
        self.check_win();
        MarkOutcome::Changed
    }

    /// Entry point for the chord gesture. Acts only on uncovered numbered
    /// cells; the flag-count rule itself lives in [`chord::evaluate`]. A
    /// start while another chord is active is a no-op.
    pub fn chord_start(&mut self, coords: Coord2) -> ActivateOutcome {
        use ActivateOutcome::*;

        if !self.accepts_input() || !self.board.in_bounds(coords) || self.chord_active.is_some() {
            return NoChange;
        }

        self.chord_active = Some(coords);
        self.chord_rejected.clear();

        if self.status != GameStatus::Playing
            || self.is_covered(coords)
            || self.board.adjacent_mine_count(coords) == 0
        {
            return NoChange;
        }

        match chord::evaluate(&self.board, &self.cover, &self.flags, coords) {
            ChordOutcome::Reveal(neighbors) => {
                let mut outcome = NoChange;
                for pos in neighbors {
                    if self.board.contains_mine(pos) {
                        self.detonate(pos);
                        return Detonated;
                    }
                    outcome = outcome | self.reveal_at(pos);
                }
                outcome
            }
            ChordOutcome::Rejected(neighbors) => {
                log::trace!("chord rejected at {coords:?}");
                self.chord_rejected.extend(neighbors);
                NoChange
            }
        }
    }

    /// Ends a chord and clears the transient rejection feedback. Always
    /// honored, even in terminal states, so a cancelled gesture never leaves
    /// feedback behind.
    pub fn chord_end(&mut self, coords: Coord2) -> MarkOutcome {
        let was_active = self.chord_active.take().is_some();
        let had_feedback = !self.chord_rejected.is_empty();
        self.chord_rejected.clear();

        if was_active || had_feedback {
            log::trace!("chord end at {coords:?}");
            MarkOutcome::Changed
        } else {
            MarkOutcome::NoChange
        }
    }

    /// Feeds one scheduled explosion back into the engine. Callbacks carry
    /// the generation stamped into their [`LossSchedule`]; a stale generation
    /// means the round was reset underneath the timer and nothing happens.
    /// The final live step transitions to `Lost` and releases the input lock
    /// in the same call.
    pub fn fire_explosion(&mut self, generation: u64, step: usize) -> FireOutcome {
        if generation != self.generation {
            return FireOutcome::Stale;
        }
        let Some(pending) = self.pending_loss.as_mut() else {
            return FireOutcome::Stale;
        };
        let Some(coords) = pending.schedule.steps.get(step).map(|step| step.coords) else {
            return FireOutcome::Stale;
        };

        pending.fired += 1;
        let done = pending.fired >= pending.schedule.steps.len();
        self.cover[coords.to_nd_index()] = false;
        self.exploded.insert(coords);

        if done {
            self.pending_loss = None;
            self.status = GameStatus::Lost;
            log::debug!("loss sequence complete, {} cells exploded", self.exploded.len());
            FireOutcome::SequenceComplete
        } else {
            FireOutcome::Exploded
        }
    }

    /// Drives a pending loss sequence to completion synchronously, for hosts
    /// and tests without a timer.
    pub fn run_loss_sequence(&mut self) -> FireOutcome {
        let Some(schedule) = self.loss_schedule().cloned() else {
            return FireOutcome::Stale;
        };

        let mut outcome = FireOutcome::Stale;
        for step in 0..schedule.steps.len() {
            outcome = self.fire_explosion(schedule.generation, step);
        }
        outcome
    }

    // ------------------------------------------------------------------
    // internals

    fn accepts_input(&self) -> bool {
        !self.status.is_finished() && self.pending_loss.is_none()
    }

    fn round_seed(&self) -> u64 {
        mix64(self.seed ^ self.generation)
    }

    fn clear_overlays(&mut self) {
        self.cover = CoverGrid::from_elem(self.config.size.to_nd_index(), true);
        self.flags = FlagGrid::default(self.config.size.to_nd_index());
        self.exploded.clear();
        self.chord_rejected.clear();
        self.pending_loss = None;
        self.chord_active = None;
    }

    fn reveal_at(&mut self, coords: Coord2) -> ActivateOutcome {
        let opened = reveal::open_set(&self.board, &self.cover, coords);
        if opened.is_empty() {
            return ActivateOutcome::NoChange;
        }

        for &pos in &opened {
            self.cover[pos.to_nd_index()] = false;
        }
        log::debug!("revealed {} cells from {:?}", opened.len(), coords);

        if self.check_win() {
            ActivateOutcome::Won
        } else {
            ActivateOutcome::Revealed
        }
    }

    /// Win whenever no mines remain unflagged, recomputed after every flag
    /// and reveal mutation while playing.
    fn check_win(&mut self) -> bool {
        if self.status == GameStatus::Playing && self.remaining_mines() == 0 {
            self.status = GameStatus::Won;
            log::debug!("all mines accounted for, round won");
            true
        } else {
            false
        }
    }

    fn detonate(&mut self, origin: Coord2) {
        self.cover[origin.to_nd_index()] = false;
        let schedule = loss::build_schedule(&self.board, &self.flags, origin, self.generation);
        log::debug!(
            "mine hit at {:?}, scheduling {} explosions over {:?}",
            origin,
            schedule.steps.len(),
            schedule.total
        );
        self.pending_loss = Some(PendingLoss { schedule, fired: 0 });
    }
}
