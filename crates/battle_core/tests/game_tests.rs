//! Turn driver and scoring tests.

use battle_core::prelude::*;
use battle_test_utils::determinism::run_parallel_games;
use battle_test_utils::fixtures::{
    blue_seat, empty_board, position, red_seat, two_player_game, unit_ids, UnitBuilder,
    BLUE_PLAYER, RED_PLAYER,
};
use battle_test_utils::init_test_logging;
use battle_test_utils::players::{ApproachPlayer, ScriptedPlayer};

fn path(hexes: &[(i32, i32)]) -> Vec<HexCoord> {
    hexes.iter().copied().map(HexCoord::from).collect()
}

// =============================================================================
// Turn flow
// =============================================================================

mod turns {
    use super::*;

    #[test]
    fn test_play_turn_moves_and_notifies() {
        init_test_logging();
        let mut board = empty_board();
        let red = UnitBuilder::red(1).place(&mut board, 5, 4);
        UnitBuilder::blue(2).place(&mut board, 8, 8);

        let red_player = ScriptedPlayer::new(vec![vec![MovementPlan::new(
            red,
            path(&[(5, 4), (4, 4), (3, 4)]),
        )]]);
        let blue_player = ScriptedPlayer::idle();
        let (red_log, blue_log) = (red_player.log(), blue_player.log());
        let mut game = two_player_game(board, Box::new(red_player), Box::new(blue_player), 1);

        let results = game.play_turn().unwrap();
        assert!(results.is_empty());
        assert_eq!(position(game.board(), red), HexCoord::new(3, 4));

        let red_log = red_log.borrow();
        assert_eq!(red_log.movement_requests, 1);
        assert_eq!(red_log.movement_callbacks, 1);
        assert_eq!(red_log.combat_results.len(), 1);

        let blue_log = blue_log.borrow();
        assert_eq!(blue_log.movement_requests, 0);
        assert_eq!(blue_log.movement_callbacks, 0);
        assert_eq!(blue_log.combat_results.len(), 1);
    }

    #[test]
    fn test_combat_results_reach_every_player() {
        let mut board = empty_board();
        UnitBuilder::red(1).place(&mut board, 6, 4);
        let blue = UnitBuilder::blue(2).place(&mut board, 6, 5);

        let red_player = ScriptedPlayer::idle();
        let blue_player = ScriptedPlayer::idle();
        let (red_log, blue_log) = (red_player.log(), blue_player.log());
        let mut game = two_player_game(board, Box::new(red_player), Box::new(blue_player), 6);

        let results = game.play_turn().unwrap();
        assert_eq!(results.battles()[0].combat_result(), CombatResult::AttackerEliminated);
        assert_eq!(unit_ids(game.board()), vec![blue]);
        assert!(game.is_game_over());

        for log in [red_log, blue_log] {
            let log = log.borrow();
            assert_eq!(log.combat_results.len(), 1);
            assert_eq!(log.combat_results[0], results);
        }
    }

    #[test]
    fn test_invalid_plan_stops_the_turn() {
        let mut board = empty_board();
        let red = UnitBuilder::red(1).place(&mut board, 5, 4);
        UnitBuilder::blue(2).place(&mut board, 8, 8);

        let red_player =
            ScriptedPlayer::new(vec![vec![MovementPlan::new(red, path(&[(5, 4), (2, 4)]))]]);
        let mut game = two_player_game(
            board,
            Box::new(red_player),
            Box::new(ScriptedPlayer::idle()),
            1,
        );

        assert!(matches!(
            game.play_turn(),
            Err(BattleError::InvalidPath { .. })
        ));
        assert_eq!(position(game.board(), red), HexCoord::new(5, 4));
    }

    #[test]
    fn test_play_until_one_side_remains() {
        init_test_logging();
        let mut board = empty_board();
        let red = UnitBuilder::red(1).place(&mut board, 4, 4);
        UnitBuilder::blue(2).place(&mut board, 4, 7);

        let blue_player = ScriptedPlayer::idle();
        let blue_log = blue_player.log();
        let mut game = two_player_game(
            board,
            Box::new(ApproachPlayer::new(red_seat(PlayerKind::Cpu))),
            Box::new(blue_player),
            1,
        );

        game.play().unwrap();
        assert!(game.is_game_over());
        assert_eq!(unit_ids(game.board()), vec![red]);
        assert_eq!(game.turn(), 1);
        assert!(blue_log.borrow().ended);
    }

    #[test]
    fn test_play_rejects_human_seats() {
        let mut board = empty_board();
        UnitBuilder::red(1).place(&mut board, 4, 4);
        UnitBuilder::blue(2).place(&mut board, 4, 7);

        let mut game = Game::new(
            board,
            vec![
                (
                    red_seat(PlayerKind::Human),
                    Box::new(ScriptedPlayer::idle()) as Box<dyn Player>,
                ),
                (
                    blue_seat(PlayerKind::Cpu),
                    Box::new(ScriptedPlayer::idle()) as Box<dyn Player>,
                ),
            ],
            RulesConfig::default(),
            Box::new(SeededDie::new(7)),
        )
        .unwrap();
        assert!(matches!(game.play(), Err(BattleError::InvalidState(_))));
    }

    #[test]
    fn test_parallel_games_agree() {
        let setup = || {
            let mut board = empty_board();
            UnitBuilder::red(1).place(&mut board, 1, 1);
            UnitBuilder::red(2).place(&mut board, 2, 1);
            UnitBuilder::blue(3).place(&mut board, 8, 8);
            UnitBuilder::blue(4).place(&mut board, 8, 7);
            Game::new(
                board,
                vec![
                    (
                        red_seat(PlayerKind::Cpu),
                        Box::new(ApproachPlayer::new(red_seat(PlayerKind::Cpu)))
                            as Box<dyn Player>,
                    ),
                    (
                        blue_seat(PlayerKind::Cpu),
                        Box::new(ApproachPlayer::new(blue_seat(PlayerKind::Cpu)))
                            as Box<dyn Player>,
                    ),
                ],
                RulesConfig {
                    max_turns: 40,
                    ..RulesConfig::default()
                },
                Box::new(SeededDie::new(1234)),
            )
            .unwrap()
        };

        let hashes = run_parallel_games(setup, 4);
        assert_eq!(hashes.len(), 4);
        assert!(hashes.windows(2).all(|w| w[0] == w[1]), "{hashes:?}");
    }

    #[test]
    fn test_update_applies_sparse_positions() {
        let mut board = empty_board();
        let red = UnitBuilder::red(1).place(&mut board, 0, 0);
        let mut game = two_player_game(
            board,
            Box::new(ScriptedPlayer::idle()),
            Box::new(ScriptedPlayer::idle()),
            1,
        );

        game.update(&SparseBoard {
            units: vec![SparseUnit {
                id: red,
                row: 7,
                column: 2,
            }],
        })
        .unwrap();
        assert_eq!(position(game.board(), red), HexCoord::new(7, 2));
    }
}

// =============================================================================
// Objective scoring
// =============================================================================

mod scoring {
    use super::*;

    #[test]
    fn test_holding_objective_after_movement_scores() {
        let mut board = empty_board();
        board.add_objective(Objective::hold(HexCoord::new(3, 4), 3)).unwrap();
        let red = UnitBuilder::red(1).place(&mut board, 5, 4);
        UnitBuilder::blue(2).place(&mut board, 8, 8);

        let red_player = ScriptedPlayer::new(vec![vec![MovementPlan::new(
            red,
            path(&[(5, 4), (4, 4), (3, 4)]),
        )]]);
        let mut game = two_player_game(
            board,
            Box::new(red_player),
            Box::new(ScriptedPlayer::idle()),
            1,
        );

        game.play_turn().unwrap();
        assert_eq!(game.score_tracker().get_score(RED_PLAYER), 3);
        assert_eq!(game.score_tracker().get_score(BLUE_PLAYER), 0);
    }

    #[test]
    fn test_engaged_unit_scores_only_after_winning() {
        let mut board = empty_board();
        board.add_objective(Objective::hold(HexCoord::new(6, 4), 2)).unwrap();
        UnitBuilder::red(1).place(&mut board, 6, 4);
        UnitBuilder::blue(2).place(&mut board, 6, 5);
        let mut game = two_player_game(
            board,
            Box::new(ScriptedPlayer::idle()),
            Box::new(ScriptedPlayer::idle()),
            1,
        );

        let scorer = ObjectiveScorer;
        assert_eq!(scorer.award_hold_objectives(&mut game), 0);

        let results = game.resolve_combat().unwrap();
        assert_eq!(results.battles()[0].combat_result(), CombatResult::DefenderEliminated);
        assert_eq!(scorer.award_hold_objectives_after_combat(&mut game, &results), 2);
        assert_eq!(game.score_tracker().get_score(RED_PLAYER), 2);
    }

    #[test]
    fn test_retreating_attacker_does_not_score() {
        let mut board = empty_board();
        board.add_objective(Objective::hold(HexCoord::new(4, 4), 5)).unwrap();
        let red = UnitBuilder::red(1).place(&mut board, 4, 4);
        UnitBuilder::blue(2).place(&mut board, 3, 5);
        let mut game = two_player_game(
            board,
            Box::new(ScriptedPlayer::idle()),
            Box::new(ScriptedPlayer::idle()),
            4,
        );

        game.play_turn().unwrap();
        assert_eq!(position(game.board(), red), HexCoord::new(5, 2));
        assert_eq!(game.score_tracker().get_score(RED_PLAYER), 0);
    }

    #[test]
    fn test_other_objective_kinds_are_ignored() {
        let mut board = empty_board();
        board
            .add_objective(Objective {
                coord: HexCoord::new(5, 4),
                points: 4,
                kind: ObjectiveKind::Other("capture".to_string()),
            })
            .unwrap();
        UnitBuilder::red(1).place(&mut board, 5, 4);
        UnitBuilder::blue(2).place(&mut board, 8, 8);
        let mut game = two_player_game(
            board,
            Box::new(ScriptedPlayer::idle()),
            Box::new(ScriptedPlayer::idle()),
            1,
        );

        game.play_turn().unwrap();
        assert_eq!(game.score_tracker().get_score(RED_PLAYER), 0);
    }

    #[test]
    fn test_objective_scores_once_for_stacked_units() {
        let mut board = empty_board();
        board.add_objective(Objective::hold(HexCoord::new(2, 2), 1)).unwrap();
        UnitBuilder::red(1).place(&mut board, 2, 2);
        UnitBuilder::red(2).place(&mut board, 2, 2);
        UnitBuilder::blue(3).place(&mut board, 8, 8);
        let mut game = two_player_game(
            board,
            Box::new(ScriptedPlayer::idle()),
            Box::new(ScriptedPlayer::idle()),
            1,
        );

        game.play_turn().unwrap();
        assert_eq!(game.score_tracker().get_score(RED_PLAYER), 1);
    }
}
