use minegen::{
    generate_from_start, solvable_within, solve_one_step, Board, CellState, GameRng,
    GenerateMode, Situation, Timer,
};

/// Data-model integration: flood-open against a known layout.
mod board_integration {
    use super::*;

    #[test]
    fn flood_open_leaves_only_the_mine_hidden() {
        let mut board = Board::new(5, 5);
        board.cell_mut(1, 1).is_mine = true;
        board.refresh();
        board.open(5, 5);

        let mut opened = 0;
        for row in 1..=5 {
            for column in 1..=5 {
                if board.cell(row, column).is_opened() {
                    opened += 1;
                }
            }
        }
        assert_eq!(opened, 24);
        assert!(board.cell(1, 1).is_unknown());
        assert_eq!(board.cell(1, 2).mine_count, 1);
        assert_eq!(board.cell(2, 1).mine_count, 1);
        assert_eq!(board.cell(2, 2).mine_count, 1);
        assert_eq!(board.cell(3, 3).mine_count, 0);
    }
}

/// Solver integration through the public surface only.
mod solver_integration {
    use super::*;

    #[test]
    fn one_step_flags_a_proven_mine() {
        let mut situation = Situation::new(3, 3);
        for row in 1..=3 {
            for column in 1..=3 {
                if (row, column) != (1, 1) {
                    situation.set_state(row, column, CellState::Opened);
                }
            }
        }
        situation.set_mine_count(1, 2, 1);
        situation.set_mine_count(2, 1, 1);
        situation.set_mine_count(2, 2, 1);

        let timer = Timer::new(5_000);
        assert!(solve_one_step(3, 3, &mut situation, &timer));
        assert_eq!(situation.state(1, 1), CellState::Flagged);
    }

    #[test]
    fn one_step_reports_no_progress_on_ambiguity() {
        let mut situation = Situation::new(1, 3);
        situation.set_state(1, 2, CellState::Opened);
        situation.set_mine_count(1, 2, 1);

        let timer = Timer::new(5_000);
        assert!(!solve_one_step(1, 3, &mut situation, &timer));
    }

    /// Soundness over random layouts: drive deduction to its fixed point
    /// and check every flag sits on a mine and every opened cell does not.
    /// The true configuration is always feasible, so a sound deducer can
    /// never contradict it.
    #[test]
    fn deduction_never_contradicts_the_true_board() {
        for seed in 0..20 {
            let mut rng = GameRng::from_seed(seed);
            let mut board = Board::new(6, 6);
            for row in 1..=6 {
                for column in 1..=6 {
                    if (row, column) != (6, 6) && rng.random_below(100) < 20 {
                        board.cell_mut(row, column).is_mine = true;
                    }
                }
            }
            board.refresh();
            board.open(6, 6);

            let timer = Timer::new(5_000);
            loop {
                if board.solved() {
                    break;
                }
                let mut situation = board.situation();
                if !solve_one_step(6, 6, &mut situation, &timer) {
                    break;
                }
                board.set_situation(&situation);
            }

            for row in 1..=6 {
                for column in 1..=6 {
                    let cell = board.cell(row, column);
                    if cell.is_flagged() {
                        assert!(cell.is_mine, "seed {}: flagged a safe cell", seed);
                    }
                    if cell.is_opened() {
                        assert!(!cell.is_mine, "seed {}: opened a mine", seed);
                    }
                }
            }
        }
    }
}

/// Generator integration: the end-to-end scenarios.
mod generator_integration {
    use super::*;
    use std::time::Instant;

    #[test]
    fn normal_generation_around_a_safe_start() {
        let board = generate_from_start(3, 3, 2, 2, GenerateMode::Normal, 1_000, 1, 2)
            .expect("normal generation cannot fail with free slots");
        assert_eq!(board.mine_total(), 2);
        assert!(!board.cell(2, 2).is_mine);
        assert_eq!(board.cell(2, 2).mine_count, 2);
    }

    #[test]
    fn solvable_generation_roundtrip() {
        let board = generate_from_start(5, 5, 3, 3, GenerateMode::Solvable, 1_500, 1, 5);
        if let Some(board) = board {
            assert!(board.cell(3, 3).is_opened());
            assert!(solvable_within(&board, 1_500));
        }
    }

    #[test]
    fn generation_respects_its_budget() {
        let start = Instant::now();
        let _ = generate_from_start(10, 10, 5, 5, GenerateMode::Solvable, 60, 2, 35);
        assert!(start.elapsed().as_millis() < 2_000);
    }
}
