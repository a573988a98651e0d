use wizard_core::belief::SuitKnowledge;
use wizard_core::game::match_state::{MatchState, TrumpIndicator};
use wizard_core::model::board::Board;
use wizard_core::model::card::Card;
use wizard_core::model::player::Seat;
use wizard_core::model::suit::Suit;
use wizard_core::model::trick::Trick;

/// Plays one round where every seat bids one and leads or follows with its
/// first legal card.
fn play_round(state: &mut MatchState) -> (Board, SuitKnowledge) {
    let players = state.player_count();
    let deal = state.deal();
    let mut hands = deal.hands;
    let trump = match TrumpIndicator::from_card(deal.trump_card) {
        TrumpIndicator::NoTrump => None,
        TrumpIndicator::Suit(suit) => Some(suit),
        TrumpIndicator::DealerChooses => Some(Suit::Blue),
    };
    let mut board = Board::new(
        players,
        state.round_number(),
        deal.trump_card,
        trump,
        state.first_player(),
    );
    for seat in state.first_player().cycle_from(players) {
        board.set_bid(seat, 1);
    }

    let mut knowledge = SuitKnowledge::new(players);
    let mut leader = state.first_player();
    for _ in 0..state.round_number() {
        let mut trick = Trick::new(leader, trump, players);
        for seat in leader.cycle_from(players) {
            let legal = trick.legal_cards(hands[seat.index()].cards());
            let card = legal[0];
            assert!(hands[seat.index()].remove(card));
            trick.play(seat, card).expect("legal play in turn");
            board.card_played(seat, card);
        }
        let winner = trick.winner().expect("complete trick has a winner");
        board.trick_won(winner);
        knowledge.observe_trick(&trick);
        leader = winner;
    }

    assert!(hands.iter().all(|hand| hand.is_empty()));
    (board, knowledge)
}

#[test]
fn seeded_rounds_resolve_every_trick() {
    let mut state = MatchState::with_seed(4, 2024).unwrap();
    while !state.is_complete() {
        let (board, _) = play_round(&mut state);
        assert_eq!(board.tricks_completed(), state.round_number());
        let played: usize = Seat::all(4).map(|seat| board.played_by(seat).len()).sum();
        assert_eq!(played, 4 * state.round_number());
        let scores = board.round_scores();
        state.finish_round(&scores);
    }
    assert_eq!(state.round_number(), 16);
}

#[test]
fn seen_cards_never_repeat_within_a_round() {
    let mut state = MatchState::with_seed(5, 11).unwrap();
    for _ in 0..6 {
        let (board, _) = play_round(&mut state);
        let expected = 5 * state.round_number() + usize::from(board.trump_card().is_some());
        assert_eq!(board.seen_cards().len(), expected);
        let scores = board.round_scores();
        state.finish_round(&scores);
    }
}

#[test]
fn wizard_always_takes_the_trick_it_opens() {
    let mut trick = Trick::new(Seat::new(0), Some(Suit::Yellow), 3);
    trick.play(Seat::new(0), Card::Wizard(0)).unwrap();
    trick.play(Seat::new(1), "13Y".parse().unwrap()).unwrap();
    trick.play(Seat::new(2), Card::Wizard(1)).unwrap();
    assert_eq!(trick.winner(), Some(Seat::new(0)));
}
