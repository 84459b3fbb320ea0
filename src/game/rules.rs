use serde::{Deserialize, Serialize};

use super::deck::deck_from_seed;
use super::state::GameState;

/// 驱动状态机的全部动作。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Action {
    FlipCard { index: usize },
    CheckMatch,
    ResetFlipped,
    IncrementTurn,
    ResetGame { seed: u64 },
}

/// 纯转移函数：输入状态加动作，输出新状态。
/// 不满足前置条件的动作原样返回输入，不报错也不 panic。
pub fn transition(state: &GameState, action: &Action) -> GameState {
    match action {
        Action::FlipCard { index } => flip_card(state, *index),
        Action::CheckMatch => check_match(state),
        Action::ResetFlipped => reset_flipped(state),
        Action::IncrementTurn => increment_turn(state),
        Action::ResetGame { seed } => reset_game(state, *seed),
    }
}

fn flip_card(state: &GameState, index: usize) -> GameState {
    if !state.can_flip(index) {
        return state.clone();
    }
    let mut next = state.clone();
    next.flipped.push(index);
    next
}

fn check_match(state: &GameState) -> GameState {
    let (first, second) = match state.flipped.as_slice() {
        &[first, second] => (first, second),
        _ => return state.clone(),
    };
    let (a, b) = match (state.deck.get(first), state.deck.get(second)) {
        (Some(a), Some(b)) => (*a, *b),
        _ => return state.clone(),
    };

    let mut next = state.clone();
    if a.color == b.color {
        next.matched.push(a.color);
        next.score = next.score.saturating_add(1);
        next.flipped.clear();
        next.pending_reset = false;
        next.game_over = next.matched.len() == next.pair_count();
    } else {
        // 牌留在桌面上，由编排层延迟派发 ResetFlipped
        next.pending_reset = true;
    }
    next
}

fn reset_flipped(state: &GameState) -> GameState {
    let mut next = state.clone();
    next.flipped.clear();
    next.pending_reset = false;
    next
}

fn increment_turn(state: &GameState) -> GameState {
    let mut next = state.clone();
    next.turns = next.turns.saturating_add(1);
    next
}

fn reset_game(state: &GameState, seed: u64) -> GameState {
    GameState::new(deck_from_seed(seed)).with_turn_limit(state.turn_limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::deck::{Card, CardColor};
    use crate::game::state::GameOutcome;

    fn two_pair_state() -> GameState {
        // 固定排列 [Olive, Sage, Olive, Sage]，便于手工推演
        GameState::new(vec![
            Card::new(CardColor::Olive),
            Card::new(CardColor::Sage),
            Card::new(CardColor::Olive),
            Card::new(CardColor::Sage),
        ])
    }

    #[test]
    fn flip_card_queues_index() {
        let state = two_pair_state();
        let next = transition(&state, &Action::FlipCard { index: 1 });
        assert_eq!(next.flipped, vec![1]);
        assert_eq!(state.flipped, Vec::<usize>::new(), "input is untouched");
    }

    #[test]
    fn flip_card_ignores_duplicates_and_overflow() {
        let state = two_pair_state();
        let one = transition(&state, &Action::FlipCard { index: 0 });
        let dup = transition(&one, &Action::FlipCard { index: 0 });
        assert_eq!(dup, one, "same index twice is a no-op");

        let two = transition(&one, &Action::FlipCard { index: 1 });
        let three = transition(&two, &Action::FlipCard { index: 3 });
        assert_eq!(three, two, "third flip is a no-op");
    }

    #[test]
    fn flip_card_ignores_matched_and_out_of_range() {
        let mut state = two_pair_state();
        state.matched = vec![CardColor::Olive];
        state.score = 1;
        assert_eq!(transition(&state, &Action::FlipCard { index: 0 }), state);
        assert_eq!(transition(&state, &Action::FlipCard { index: 42 }), state);
    }

    #[test]
    fn flip_card_ignored_on_completed_board() {
        let mut state = two_pair_state();
        state.matched = vec![CardColor::Olive, CardColor::Sage];
        state.score = 2;
        state.game_over = true;
        // 所有花色都已配对，任何下标都翻不动
        assert_eq!(transition(&state, &Action::FlipCard { index: 0 }), state);
        assert_eq!(transition(&state, &Action::FlipCard { index: 3 }), state);
    }

    #[test]
    fn check_match_records_pair() {
        let mut state = two_pair_state();
        state.flipped = vec![0, 2];
        let next = transition(&state, &Action::CheckMatch);
        assert_eq!(next.matched, vec![CardColor::Olive]);
        assert_eq!(next.score, 1);
        assert!(next.flipped.is_empty(), "matched cards leave the queue");
        assert!(!next.pending_reset);
        assert!(!next.game_over, "one of two pairs is not a win");
    }

    #[test]
    fn check_match_flags_mismatch_for_delayed_reset() {
        let mut state = two_pair_state();
        state.flipped = vec![0, 1];
        let next = transition(&state, &Action::CheckMatch);
        assert!(next.pending_reset);
        assert_eq!(next.flipped, vec![0, 1], "mismatched cards stay visible");
        assert_eq!(next.score, 0);
        assert!(next.matched.is_empty());
    }

    #[test]
    fn check_match_needs_exactly_two_flips() {
        let state = two_pair_state();
        assert_eq!(transition(&state, &Action::CheckMatch), state);

        let one = transition(&state, &Action::FlipCard { index: 0 });
        assert_eq!(transition(&one, &Action::CheckMatch), one);
    }

    #[test]
    fn final_pair_sets_game_over() {
        let mut state = two_pair_state();
        state.matched = vec![CardColor::Olive];
        state.score = 1;
        state.flipped = vec![1, 3];
        let next = transition(&state, &Action::CheckMatch);
        assert!(next.game_over);
        assert_eq!(next.score, 2);
        assert_eq!(
            next.outcome(),
            Some(GameOutcome::Won { score: 2, turns: 0 })
        );
    }

    #[test]
    fn reset_flipped_clears_queue_and_flag() {
        let mut state = two_pair_state();
        state.flipped = vec![0, 1];
        state.pending_reset = true;
        let next = transition(&state, &Action::ResetFlipped);
        assert!(next.flipped.is_empty());
        assert!(!next.pending_reset);
        assert_eq!(next.turns, state.turns, "reset does not consume a turn");
    }

    #[test]
    fn increment_turn_counts_up() {
        let state = two_pair_state();
        let next = transition(&state, &Action::IncrementTurn);
        assert_eq!(next.turns, 1);
    }

    #[test]
    fn reset_game_starts_fresh_with_seeded_deck() {
        let mut state = GameState::from_seed(11).with_turn_limit(20);
        state.turns = 9;
        state.score = 2;
        state.matched = vec![CardColor::White, CardColor::Brown];
        state.flipped = vec![0];
        state.pending_reset = true;

        let next = transition(&state, &Action::ResetGame { seed: 99 });
        assert_eq!(next.deck, deck_from_seed(99));
        assert!(next.flipped.is_empty());
        assert!(next.matched.is_empty());
        assert_eq!(next.turns, 0);
        assert_eq!(next.score, 0);
        assert!(!next.pending_reset);
        assert!(!next.game_over);
        assert_eq!(next.turn_limit, 20, "configured limit survives a reset");
        next.integrity_check().expect("reset state passes integrity");
    }

    #[test]
    fn transitions_keep_integrity() {
        let mut state = GameState::from_seed(21);
        let actions = [
            Action::FlipCard { index: 0 },
            Action::FlipCard { index: 1 },
            Action::CheckMatch,
            Action::IncrementTurn,
            Action::ResetFlipped,
            Action::FlipCard { index: 2 },
            Action::FlipCard { index: 5 },
            Action::CheckMatch,
            Action::IncrementTurn,
            Action::ResetFlipped,
        ];
        for action in &actions {
            state = transition(&state, action);
            state
                .integrity_check()
                .unwrap_or_else(|error| panic!("integrity broken after {:?}: {:?}", action, error));
        }
    }

    #[test]
    fn two_pair_walkthrough() {
        let mut state = two_pair_state();

        // 第一回合：0 和 1 花色不同，配对失败
        state = transition(&state, &Action::FlipCard { index: 0 });
        state = transition(&state, &Action::FlipCard { index: 1 });
        state = transition(&state, &Action::CheckMatch);
        state = transition(&state, &Action::IncrementTurn);
        assert!(state.pending_reset);
        assert_eq!(state.flipped, vec![0, 1]);
        assert_eq!(state.score, 0);
        assert_eq!(state.turns, 1);

        state = transition(&state, &Action::ResetFlipped);
        assert!(state.flipped.is_empty());

        // 第二回合：0 和 2 配对成功
        state = transition(&state, &Action::FlipCard { index: 0 });
        state = transition(&state, &Action::FlipCard { index: 2 });
        state = transition(&state, &Action::CheckMatch);
        state = transition(&state, &Action::IncrementTurn);
        assert_eq!(state.score, 1);
        assert_eq!(state.turns, 2);
        assert!(!state.game_over);

        // 第三回合：剩下的 1 和 3 收尾
        state = transition(&state, &Action::FlipCard { index: 1 });
        state = transition(&state, &Action::FlipCard { index: 3 });
        state = transition(&state, &Action::CheckMatch);
        state = transition(&state, &Action::IncrementTurn);
        assert_eq!(state.score, 2);
        assert_eq!(state.turns, 3);
        assert!(state.game_over);
        assert_eq!(
            state.outcome(),
            Some(GameOutcome::Won { score: 2, turns: 3 })
        );
    }

    #[test]
    fn action_json_shape_is_tagged() {
        let action = Action::FlipCard { index: 3 };
        let json = serde_json::to_string(&action).expect("serialize action");
        assert_eq!(json, r#"{"type":"FlipCard","index":3}"#);

        let parsed: Action =
            serde_json::from_str(r#"{"type":"ResetGame","seed":7}"#).expect("deserialize action");
        assert_eq!(parsed, Action::ResetGame { seed: 7 });
    }
}
