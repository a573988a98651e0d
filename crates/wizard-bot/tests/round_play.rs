use rand::SeedableRng;
use rand::rngs::StdRng;
use wizard_bot::bot::BotParams;
use wizard_bot::policy::{Strategy, StrategyContext, StrategyKind};
use wizard_bot::probability::ProbabilityMode;
use wizard_bot::search::{Position, SearchConfig, TreeSearch};
use wizard_core::game::match_state::{MatchState, TrumpIndicator};
use wizard_core::model::board::Board;
use wizard_core::model::card::Card;
use wizard_core::model::player::Seat;
use wizard_core::model::suit::Suit;
use wizard_core::model::trick::Trick;

fn quick_params() -> BotParams {
    BotParams {
        search_iterations: 4,
        simulation_iterations: 40,
        probability_mode: ProbabilityMode::Simulated,
        ..BotParams::default()
    }
}

/// Plays one round between the given strategies and returns every card played.
fn play_round(state: &mut MatchState, strategies: &mut [Box<dyn Strategy>]) -> (Board, Vec<Card>) {
    let players = state.player_count();
    let deal = state.deal();
    let mut hands = deal.hands;
    let mut board = Board::new(
        players,
        state.round_number(),
        deal.trump_card,
        None,
        state.first_player(),
    );
    for strategy in strategies.iter_mut() {
        strategy.begin_round(&board);
    }

    let trump = match TrumpIndicator::from_card(deal.trump_card) {
        TrumpIndicator::NoTrump => None,
        TrumpIndicator::Suit(suit) => Some(suit),
        TrumpIndicator::DealerChooses => {
            let dealer = state.dealer();
            let ctx = StrategyContext {
                seat: dealer,
                hand: &hands[dealer.index()],
                board: &board,
            };
            Some(strategies[dealer.index()].choose_trump(&ctx))
        }
    };
    board.set_trump(trump);

    for seat in state.first_player().cycle_from(players) {
        let ctx = StrategyContext {
            seat,
            hand: &hands[seat.index()],
            board: &board,
        };
        let bid = strategies[seat.index()].select_bid(&ctx);
        assert!(bid as usize <= state.round_number() + 1);
        board.set_bid(seat, bid);
    }

    let mut sequence = Vec::new();
    let mut leader = state.first_player();
    for _ in 0..state.round_number() {
        let mut trick = Trick::new(leader, trump, players);
        for seat in leader.cycle_from(players) {
            let legal = trick.legal_cards(hands[seat.index()].cards());
            let ctx = StrategyContext {
                seat,
                hand: &hands[seat.index()],
                board: &board,
            };
            let card = strategies[seat.index()].select_card(&ctx, &trick, &legal);
            assert!(legal.contains(&card), "{seat} played illegal {card}");
            assert!(hands[seat.index()].remove(card));
            trick.play(seat, card).unwrap();
            board.card_played(seat, card);
            sequence.push(card);
        }
        let winner = trick.winner().unwrap();
        board.trick_won(winner);
        for strategy in strategies.iter_mut() {
            strategy.observe_trick_result(&trick);
        }
        leader = winner;
    }
    (board, sequence)
}

fn lineup(seed: u64) -> Vec<Box<dyn Strategy>> {
    [StrategyKind::Search, StrategyKind::Probabilistic, StrategyKind::Random, StrategyKind::Probabilistic]
        .into_iter()
        .enumerate()
        .map(|(index, kind)| kind.build(quick_params(), seed + index as u64))
        .collect()
}

#[test]
fn mixed_table_plays_legal_rounds() {
    let mut state = MatchState::with_seed(4, 99).unwrap();
    let mut strategies = lineup(99);
    for _ in 0..4 {
        let (board, sequence) = play_round(&mut state, &mut strategies);
        assert_eq!(sequence.len(), 4 * state.round_number());
        assert_eq!(board.tricks_completed(), state.round_number());
        let scores = board.round_scores();
        state.finish_round(&scores);
    }
}

#[test]
fn seeded_tables_replay_identically() {
    let run = || {
        let mut state = MatchState::with_seed(4, 5).unwrap();
        let mut strategies = lineup(5);
        let mut played = Vec::new();
        for _ in 0..3 {
            let (board, sequence) = play_round(&mut state, &mut strategies);
            played.extend(sequence);
            state.finish_round(&board.round_scores());
        }
        played
    };
    assert_eq!(run(), run());
}

#[test]
fn wizard_and_low_cards_bid_at_least_once() {
    // Seat 2 bids with {4Y, Z, 3Y}; seat 0 starts and Blue is trump.
    let hand: Vec<Card> = ["4Y", "Z", "3Y"].iter().map(|t| t.parse().unwrap()).collect();
    let board = Board::new(4, 3, Some("10B".parse().unwrap()), Some(Suit::Blue), Seat::new(0));
    let position = Position {
        seat: Seat::new(2),
        hand: &hand,
        board: &board,
        knowledge: None,
    };
    let search = TreeSearch::new(SearchConfig::new(5, 5));
    let mut rng = StdRng::seed_from_u64(2024);
    let estimates: Vec<u8> = (0..5)
        .map(|_| search.estimate_bid(&position, &mut rng).estimate)
        .collect();
    assert!(estimates.iter().any(|&estimate| estimate > 0), "{estimates:?}");
}
