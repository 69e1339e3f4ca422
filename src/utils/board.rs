use uuid::Uuid;

use super::dispatch::{DispatchUpdate, RequestOutcome};

/// Visual lifecycle of one model's card: placeholder, then optionally
/// streamed content-so-far, then exactly one settled state.
#[derive(Debug, Clone, PartialEq)]
pub enum CardState {
    Pending,
    Streaming(String),
    Settled(RequestOutcome),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseCard {
    pub model_id: String,
    pub state: CardState,
}

/// Presenter state for the current dispatch: one card per selected model, in
/// selection order. Every mutation is keyed by model id and generation, so a
/// late update from a superseded dispatch, or for a card that no longer
/// exists, is silently dropped rather than treated as a fault.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseBoard {
    generation: Option<Uuid>,
    cards: Vec<ResponseCard>,
}

impl ResponseBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cards(&self) -> &[ResponseCard] {
        &self.cards
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn generation(&self) -> Option<Uuid> {
        self.generation
    }

    /// Replace the board with one pending card per id, in the given order,
    /// and start a new generation. Updates tagged with older generations are
    /// ignored from this point on.
    pub fn show_placeholders(&mut self, model_ids: &[String]) -> Uuid {
        let generation = Uuid::new_v4();
        self.generation = Some(generation);
        self.cards = model_ids
            .iter()
            .map(|model_id| ResponseCard {
                model_id: model_id.clone(),
                state: CardState::Pending,
            })
            .collect();
        generation
    }

    pub fn apply(&mut self, generation: Uuid, update: DispatchUpdate) {
        match update {
            DispatchUpdate::Delta { model_id, content } => {
                self.apply_delta(generation, &model_id, &content)
            }
            DispatchUpdate::Settled { model_id, outcome } => {
                self.apply_outcome(generation, &model_id, outcome)
            }
        }
    }

    /// Update the content region of a still-pending card. A settled card is
    /// never demoted back to streaming.
    pub fn apply_delta(&mut self, generation: Uuid, model_id: &str, content: &str) {
        if self.generation != Some(generation) {
            return;
        }
        if let Some(card) = self.card_mut(model_id) {
            if !matches!(card.state, CardState::Settled(_)) {
                card.state = CardState::Streaming(content.to_string());
            }
        }
    }

    /// Settle a card exactly once; repeated outcomes keep the first.
    pub fn apply_outcome(&mut self, generation: Uuid, model_id: &str, outcome: RequestOutcome) {
        if self.generation != Some(generation) {
            return;
        }
        if let Some(card) = self.card_mut(model_id) {
            if !matches!(card.state, CardState::Settled(_)) {
                card.state = CardState::Settled(outcome);
            }
        }
    }

    pub fn all_settled(&self) -> bool {
        !self.cards.is_empty()
            && self
                .cards
                .iter()
                .all(|card| matches!(card.state, CardState::Settled(_)))
    }

    fn card_mut(&mut self, model_id: &str) -> Option<&mut ResponseCard> {
        self.cards.iter_mut().find(|card| card.model_id == model_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    fn success(content: &str) -> RequestOutcome {
        RequestOutcome::Success {
            content: content.to_string(),
            elapsed_ms: 5,
            tokens_used: 1,
        }
    }

    #[test]
    fn test_placeholders_match_selection_order() {
        let mut board = ResponseBoard::new();
        board.show_placeholders(&ids(&["b", "a"]));

        let cards: Vec<_> = board.cards().iter().map(|c| c.model_id.as_str()).collect();
        assert_eq!(cards, ["b", "a"]);
        assert!(board
            .cards()
            .iter()
            .all(|c| c.state == CardState::Pending));
    }

    #[test]
    fn test_delta_then_outcome_shows_final_state() {
        let mut board = ResponseBoard::new();
        let generation = board.show_placeholders(&ids(&["a"]));

        board.apply_delta(generation, "a", "Hel");
        assert_eq!(
            board.cards()[0].state,
            CardState::Streaming("Hel".to_string())
        );

        board.apply_outcome(generation, "a", success("Hello"));
        assert_eq!(board.cards()[0].state, CardState::Settled(success("Hello")));

        // Deltas only precede finalization; a stray late one changes nothing.
        board.apply_delta(generation, "a", "Hello again");
        assert_eq!(board.cards()[0].state, CardState::Settled(success("Hello")));
    }

    #[test]
    fn test_cards_settle_independently() {
        let mut board = ResponseBoard::new();
        let generation = board.show_placeholders(&ids(&["a", "b"]));

        board.apply_outcome(
            generation,
            "b",
            RequestOutcome::Failure {
                elapsed_ms: 0,
                error: "boom".to_string(),
            },
        );

        assert_eq!(board.cards()[0].state, CardState::Pending);
        assert!(matches!(board.cards()[1].state, CardState::Settled(_)));
        assert!(!board.all_settled());

        board.apply_outcome(generation, "a", success("done"));
        assert!(board.all_settled());
    }

    #[test]
    fn test_outcome_applies_exactly_once() {
        let mut board = ResponseBoard::new();
        let generation = board.show_placeholders(&ids(&["a"]));

        board.apply_outcome(generation, "a", success("first"));
        board.apply_outcome(generation, "a", success("second"));
        assert_eq!(board.cards()[0].state, CardState::Settled(success("first")));
    }

    #[test]
    fn test_missing_card_is_a_no_op() {
        let mut board = ResponseBoard::new();
        let generation = board.show_placeholders(&ids(&["a"]));

        board.apply_delta(generation, "ghost", "...");
        board.apply_outcome(generation, "ghost", success("x"));
        assert_eq!(board.cards().len(), 1);
        assert_eq!(board.cards()[0].state, CardState::Pending);
    }

    #[test]
    fn test_superseded_generation_is_dropped() {
        let mut board = ResponseBoard::new();
        let old = board.show_placeholders(&ids(&["a"]));
        let new = board.show_placeholders(&ids(&["a"]));

        board.apply_outcome(old, "a", success("stale"));
        assert_eq!(board.cards()[0].state, CardState::Pending);

        board.apply_outcome(new, "a", success("fresh"));
        assert_eq!(board.cards()[0].state, CardState::Settled(success("fresh")));
    }
}
