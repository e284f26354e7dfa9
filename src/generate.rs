//! Board generation: unconditionally random placement and the timed
//! parallel search for boards solvable without guessing.
//!
//! Solvable mode samples mine permutations in parallel workers until one
//! candidate passes the solvability check or the shared timer expires.
//! The first successful worker terminates the timer, which cancels its
//! siblings at their next poll site.

use std::thread;

use log::debug;

use crate::board::{Board, CellState, MAX_COLUMN_COUNT, MAX_ROW_COUNT};
use crate::rng::GameRng;
use crate::solver;
use crate::timer::Timer;

/// Largest accepted generation budget, in milliseconds.
pub const MAX_GENERATE_TIME_LIMIT_MS: u64 = 60_000;

/// Largest accepted worker count on this machine.
pub fn max_thread_count() -> usize {
    num_cpus::get().max(8).min(64)
}

/// Per-cell placement constraint. Generator input only.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Restriction {
    #[default]
    Unrestricted,
    IsMine,
    NotMine,
}

/// What kind of board to generate.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GenerateMode {
    /// Unconditionally random placement.
    Normal,
    /// Random placement that is solvable without guessing, best-effort
    /// within the time budget.
    Solvable,
}

/// Per-cell placement restrictions for a whole board.
#[derive(Clone)]
pub struct RestrictionMap {
    rows: usize,
    cols: usize,
    cells: Vec<Restriction>,
}

impl RestrictionMap {
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!((1..=MAX_ROW_COUNT).contains(&rows));
        assert!((1..=MAX_COLUMN_COUNT).contains(&cols));
        Self {
            rows,
            cols,
            cells: vec![Restriction::Unrestricted; rows * cols],
        }
    }

    #[inline(always)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline(always)]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline(always)]
    pub fn get(&self, row: usize, column: usize) -> Restriction {
        self.cells[(row - 1) * self.cols + (column - 1)]
    }

    #[inline(always)]
    pub fn set(&mut self, row: usize, column: usize, value: Restriction) {
        self.cells[(row - 1) * self.cols + (column - 1)] = value;
    }
}

/// Per-cell initial visible states for a whole board.
#[derive(Clone)]
pub struct StateMap {
    rows: usize,
    cols: usize,
    cells: Vec<CellState>,
}

impl StateMap {
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!((1..=MAX_ROW_COUNT).contains(&rows));
        assert!((1..=MAX_COLUMN_COUNT).contains(&cols));
        Self {
            rows,
            cols,
            cells: vec![CellState::Unknown; rows * cols],
        }
    }

    #[inline(always)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline(always)]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline(always)]
    pub fn get(&self, row: usize, column: usize) -> CellState {
        self.cells[(row - 1) * self.cols + (column - 1)]
    }

    #[inline(always)]
    pub fn set(&mut self, row: usize, column: usize, value: CellState) {
        self.cells[(row - 1) * self.cols + (column - 1)] = value;
    }
}

// ─── Normal mode ────────────────────────────────────────────────────────────

/// Random placement over the unrestricted slots. The requested count
/// includes `IsMine` pre-placements; `None` if the remainder is negative
/// or exceeds the free slots.
fn generate_normal(
    rows: usize,
    cols: usize,
    mine_count: usize,
    restriction: &RestrictionMap,
    rng: &mut GameRng,
) -> Option<Board> {
    let mut board = Board::new(rows, cols);
    let mut slots = Vec::new();
    let mut remaining = mine_count as i64;
    for row in 1..=rows {
        for column in 1..=cols {
            match restriction.get(row, column) {
                Restriction::Unrestricted => slots.push((row, column)),
                Restriction::IsMine => {
                    remaining -= 1;
                    board.cell_mut(row, column).is_mine = true;
                }
                Restriction::NotMine => {}
            }
        }
    }
    if remaining < 0 || remaining as usize > slots.len() {
        return None;
    }
    rng.shuffle(&mut slots);
    for &(row, column) in &slots[..remaining as usize] {
        board.cell_mut(row, column).is_mine = true;
    }
    board.refresh();
    Some(board)
}

// ─── Solvable mode ──────────────────────────────────────────────────────────

/// One worker's loop: sample permutations until a candidate passes the
/// solvability check or the shared timer expires.
fn try_generate_solvable(
    mine_count: usize,
    initial: &Board,
    slots: &[(usize, usize)],
    timer: &Timer,
    rng: &mut GameRng,
) -> Option<Board> {
    let mut slots = slots.to_vec();
    let mut attempts = 0u32;
    while !timer.time_is_up() {
        attempts += 1;
        let mut candidate = initial.clone();
        rng.shuffle(&mut slots);
        for &(row, column) in &slots[..mine_count] {
            candidate.cell_mut(row, column).is_mine = true;
        }
        candidate.refresh();
        if solver::solvable_with(&candidate, timer, rng) {
            timer.terminate();
            debug!("solvable candidate found after {} attempts", attempts);
            return Some(candidate);
        }
    }
    None
}

fn generate_solvable(
    rows: usize,
    cols: usize,
    time_limit_ms: u64,
    mine_count: usize,
    threads: usize,
    restriction: &RestrictionMap,
    states: &StateMap,
) -> Option<Board> {
    let timer = Timer::new(time_limit_ms);

    let mut initial = Board::new(rows, cols);
    let mut slots = Vec::new();
    for row in 1..=rows {
        for column in 1..=cols {
            match restriction.get(row, column) {
                Restriction::IsMine => initial.cell_mut(row, column).is_mine = true,
                Restriction::Unrestricted => slots.push((row, column)),
                Restriction::NotMine => {}
            }
            initial.cell_mut(row, column).state = states.get(row, column);
        }
    }

    debug!(
        "solvable search: {}x{}, {} mines over {} slots, {} workers, {} ms budget",
        rows,
        cols,
        mine_count,
        slots.len(),
        threads,
        time_limit_ms
    );

    let mut seeder = GameRng::new();
    let (sender, receiver) = crossbeam_channel::unbounded::<Board>();
    thread::scope(|scope| {
        for _ in 0..threads {
            let sender = sender.clone();
            let seed = seeder.derive_seed();
            let timer = &timer;
            let initial = &initial;
            let slots = &slots;
            scope.spawn(move || {
                let mut rng = GameRng::from_seed(seed);
                if let Some(board) =
                    try_generate_solvable(mine_count, initial, slots, timer, &mut rng)
                {
                    let _ = sender.send(board);
                }
            });
        }
        drop(sender);
        // First published success; the channel disconnects once every
        // worker has given up.
        receiver.recv().ok()
    })
}

// ─── Public entry points ────────────────────────────────────────────────────

/// Generate a board honoring per-cell restrictions and initial states.
///
/// A `mine_count` of zero selects the default
/// `min(floor(0.15 * rows * cols), unrestricted_slots / 4)`. Normal mode
/// ignores `states`, `time_limit_ms` and `threads`. Returns `None` when
/// the restrictions cannot be satisfied or no solvable candidate was
/// found within the budget.
pub fn generate(
    rows: usize,
    cols: usize,
    restriction: &RestrictionMap,
    states: &StateMap,
    mode: GenerateMode,
    time_limit_ms: u64,
    threads: usize,
    mine_count: usize,
) -> Option<Board> {
    assert!((1..=MAX_ROW_COUNT).contains(&rows));
    assert!((1..=MAX_COLUMN_COUNT).contains(&cols));
    assert_eq!(restriction.rows(), rows);
    assert_eq!(restriction.cols(), cols);
    assert_eq!(states.rows(), rows);
    assert_eq!(states.cols(), cols);
    assert!((1..=MAX_GENERATE_TIME_LIMIT_MS).contains(&time_limit_ms));
    assert!((1..=max_thread_count()).contains(&threads));

    let mut unrestricted = 0usize;
    for row in 1..=rows {
        for column in 1..=cols {
            if restriction.get(row, column) == Restriction::Unrestricted {
                unrestricted += 1;
            }
        }
    }
    let mine_count = if mine_count == 0 {
        (((rows * cols) as f64 * 0.15) as usize).min(unrestricted / 4)
    } else {
        mine_count
    };
    assert!(mine_count <= unrestricted);

    match mode {
        GenerateMode::Normal => {
            generate_normal(rows, cols, mine_count, restriction, &mut GameRng::new())
        }
        GenerateMode::Solvable => generate_solvable(
            rows,
            cols,
            time_limit_ms,
            mine_count,
            threads,
            restriction,
            states,
        ),
    }
}

/// Generate a board with a guaranteed-safe starting position, opened up
/// front. A start coordinate of zero is chosen uniformly at random.
pub fn generate_from_start(
    rows: usize,
    cols: usize,
    start_row: usize,
    start_column: usize,
    mode: GenerateMode,
    time_limit_ms: u64,
    threads: usize,
    mine_count: usize,
) -> Option<Board> {
    assert!((1..=MAX_ROW_COUNT).contains(&rows));
    assert!((1..=MAX_COLUMN_COUNT).contains(&cols));

    let mut rng = GameRng::new();
    let start_row = if start_row == 0 {
        rng.random_below(rows) + 1
    } else {
        start_row
    };
    let start_column = if start_column == 0 {
        rng.random_below(cols) + 1
    } else {
        start_column
    };
    assert!((1..=rows).contains(&start_row));
    assert!((1..=cols).contains(&start_column));

    let mut restriction = RestrictionMap::new(rows, cols);
    let mut states = StateMap::new(rows, cols);
    restriction.set(start_row, start_column, Restriction::NotMine);
    states.set(start_row, start_column, CellState::Opened);
    generate(
        rows,
        cols,
        &restriction,
        &states,
        mode,
        time_limit_ms,
        threads,
        mine_count,
    )
}
