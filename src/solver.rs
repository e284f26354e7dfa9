//! Deduction engine: region decomposition, free-variable enumeration,
//! the one-step deducer, and the solvability driver.
//!
//! Each deduction step divides the unknown frontier into independent
//! regions, reduces every region's constraint system, and falls back to
//! enumerating free-variable assignments when elimination alone forces
//! nothing. The driver repeats steps to a fixed point.

use log::trace;

use crate::board::{neighbors, Board, CellState, Situation};
use crate::gaussian::{self, approx_eq, is_zero};
use crate::rng::GameRng;
use crate::timer::Timer;

// ─── Region decomposition ───────────────────────────────────────────────────

/// One independent constraint region: the unknown cells (one per matrix
/// column, in randomized order) and the equations over them.
pub(crate) struct Region {
    pub positions: Vec<(usize, usize)>,
    pub matrix: Vec<Vec<f64>>,
}

/// Partition the unknown frontier into independent regions.
///
/// Constraint cells are opened cells with at least one unknown neighbor.
/// Constraint cells and their unknown neighbors form a bipartite graph;
/// each connected component becomes one region. Variable order within a
/// region is shuffled so timer truncation does not bias which forced
/// cells are found first.
pub(crate) fn divide(
    rows: usize,
    cols: usize,
    situation: &Situation,
    rng: &mut GameRng,
) -> Vec<Region> {
    let index = |row: usize, column: usize| (row - 1) * cols + (column - 1);

    let mut is_constraint = vec![false; rows * cols];
    for row in 1..=rows {
        for column in 1..=cols {
            if situation.state(row, column) != CellState::Opened {
                continue;
            }
            let unsolved = neighbors(row, column, rows, cols)
                .any(|(nr, nc)| situation.state(nr, nc) == CellState::Unknown);
            if unsolved {
                is_constraint[index(row, column)] = true;
            }
        }
    }

    let mut visited = vec![false; rows * cols];
    let mut regions = Vec::new();

    for row in 1..=rows {
        for column in 1..=cols {
            if !is_constraint[index(row, column)] || visited[index(row, column)] {
                continue;
            }

            // Flood the bipartite component: opened cells reach their
            // unknown neighbors, unknown cells reach adjacent constraint
            // cells.
            let mut constraint_cells = Vec::new();
            let mut unknown_positions = Vec::new();
            let mut queue = vec![(row, column)];
            visited[index(row, column)] = true;
            let mut head = 0;
            while head < queue.len() {
                let (r, c) = queue[head];
                head += 1;
                let opened = situation.state(r, c) == CellState::Opened;
                if opened {
                    constraint_cells.push((r, c));
                } else {
                    unknown_positions.push((r, c));
                }
                for (nr, nc) in neighbors(r, c, rows, cols) {
                    if visited[index(nr, nc)] {
                        continue;
                    }
                    let joins = if opened {
                        situation.state(nr, nc) == CellState::Unknown
                    } else {
                        is_constraint[index(nr, nc)]
                    };
                    if joins {
                        visited[index(nr, nc)] = true;
                        queue.push((nr, nc));
                    }
                }
            }

            rng.shuffle(&mut unknown_positions);
            let mut variable_of = vec![usize::MAX; rows * cols];
            for (variable, &(r, c)) in unknown_positions.iter().enumerate() {
                variable_of[index(r, c)] = variable;
            }

            let mut matrix = Vec::with_capacity(constraint_cells.len());
            for &(r, c) in &constraint_cells {
                let mut equation = vec![0.0; unknown_positions.len() + 1];
                let mut remaining = situation.mine_count(r, c) as f64;
                for (nr, nc) in neighbors(r, c, rows, cols) {
                    match situation.state(nr, nc) {
                        CellState::Flagged => remaining -= 1.0,
                        CellState::Unknown => {
                            let variable = variable_of[index(nr, nc)];
                            debug_assert!(variable != usize::MAX);
                            equation[variable] = 1.0;
                        }
                        CellState::Opened => {}
                    }
                }
                *equation.last_mut().unwrap() = remaining;
                matrix.push(equation);
            }

            regions.push(Region {
                positions: unknown_positions,
                matrix,
            });
        }
    }
    regions
}

// ─── Free-variable enumeration ──────────────────────────────────────────────

/// Tallies from a complete enumeration of a region's solutions.
pub(crate) struct EnumerationTally {
    /// Number of feasible assignments.
    pub legal: u64,
    /// Per matrix column: in how many feasible assignments that cell is a
    /// mine. 0 forces safe, `legal` forces mine.
    pub mine_counts: Vec<u64>,
}

/// Enumerate every assignment of the free variables of an already-reduced
/// matrix. Returns `None` on timer expiry (no information), otherwise the
/// feasibility tallies.
///
/// Pivot columns are read off the reduced rows (first non-zero column);
/// free columns are the complement. All tallies are indexed by matrix
/// column, which indexes the region's position list directly.
pub(crate) fn enumerate_mines(matrix: &[Vec<f64>], timer: &Timer) -> Option<EnumerationTally> {
    let variable_count = matrix[0].len() - 1;

    let mut pivot_columns = Vec::with_capacity(matrix.len());
    for row in matrix {
        for column in 0..variable_count {
            if !is_zero(row[column]) {
                pivot_columns.push(column);
                break;
            }
        }
    }
    let free_columns: Vec<usize> =
        (0..variable_count).filter(|column| !pivot_columns.contains(column)).collect();

    // 2^63 assignments cannot finish under any representable budget; the
    // timer would gate this region into "no information" regardless.
    if free_columns.len() >= 63 {
        trace!("enumeration skipped: {} free variables", free_columns.len());
        return None;
    }

    let total_assignments = 1u64 << free_columns.len();
    let mut legal = 0u64;
    let mut mine_counts = vec![0u64; variable_count];
    let mut pivot_values = Vec::with_capacity(pivot_columns.len());

    for assignment in (0..total_assignments).rev() {
        if timer.time_is_up() {
            trace!("enumeration timed out");
            return None;
        }

        pivot_values.clear();
        let mut feasible = true;
        for row in matrix {
            let mut value = row[variable_count];
            for (bit, &column) in free_columns.iter().enumerate() {
                if assignment >> bit & 1 == 1 {
                    value -= row[column];
                }
            }
            if !approx_eq(value, 0.0) && !approx_eq(value, 1.0) {
                feasible = false;
                break;
            }
            pivot_values.push(value);
        }
        if !feasible {
            continue;
        }

        legal += 1;
        for (bit, &column) in free_columns.iter().enumerate() {
            if assignment >> bit & 1 == 1 {
                mine_counts[column] += 1;
            }
        }
        for (row, &column) in pivot_columns.iter().enumerate() {
            if approx_eq(pivot_values[row], 1.0) {
                mine_counts[column] += 1;
            }
        }
    }

    Some(EnumerationTally { legal, mine_counts })
}

// ─── One-step deduction ─────────────────────────────────────────────────────

pub(crate) fn solve_one_step_with(
    rows: usize,
    cols: usize,
    situation: &mut Situation,
    timer: &Timer,
    rng: &mut GameRng,
) -> bool {
    assert_eq!(situation.rows(), rows);
    assert_eq!(situation.cols(), cols);

    let mut regions = divide(rows, cols, situation, rng);
    rng.shuffle(&mut regions);
    trace!("deduction step over {} regions", regions.len());

    let mut progress = false;
    for region in &mut regions {
        if timer.time_is_up() {
            trace!("deduction step timed out");
            break;
        }

        let forced = gaussian::eliminate(&mut region.matrix);
        if !forced.is_empty() {
            for (variable, is_mine) in forced {
                let (row, column) = region.positions[variable];
                let state = if is_mine {
                    CellState::Flagged
                } else {
                    CellState::Opened
                };
                situation.set_state(row, column, state);
            }
            progress = true;
            continue;
        }

        let Some(tally) = enumerate_mines(&region.matrix, timer) else {
            continue;
        };
        if tally.legal == 0 {
            continue;
        }
        for (variable, &mines) in tally.mine_counts.iter().enumerate() {
            let (row, column) = region.positions[variable];
            if mines == 0 {
                situation.set_state(row, column, CellState::Opened);
            } else if mines == tally.legal {
                situation.set_state(row, column, CellState::Flagged);
            } else {
                continue;
            }
            progress = true;
        }
    }
    progress
}

/// Run one deduction sweep over the situation: flag or open every cell the
/// current constraints force. Returns whether any cell changed state.
pub fn solve_one_step(
    rows: usize,
    cols: usize,
    situation: &mut Situation,
    timer: &Timer,
) -> bool {
    solve_one_step_with(rows, cols, situation, timer, &mut GameRng::new())
}

// ─── Solvability driver ─────────────────────────────────────────────────────

pub(crate) fn solvable_with(board: &Board, timer: &Timer, rng: &mut GameRng) -> bool {
    let mut work = board.clone();
    while !timer.time_is_up() {
        if work.solved() {
            return true;
        }
        let mut situation = work.situation();
        if !solve_one_step_with(work.rows(), work.cols(), &mut situation, timer, rng) {
            return false;
        }
        work.set_situation(&situation);
    }
    trace!("solvability check timed out");
    false
}

/// Can every cell of the board be resolved by deduction alone before the
/// shared timer expires? The caller's board is not mutated.
pub fn solvable(board: &Board, timer: &Timer) -> bool {
    solvable_with(board, timer, &mut GameRng::new())
}

/// `solvable` with a private timer of the given millisecond budget.
pub fn solvable_within(board: &Board, time_limit_ms: u64) -> bool {
    solvable(board, &Timer::new(time_limit_ms))
}
