//! Tests for session orchestration: budget, turn locking and outcomes.

use std::cell::RefCell;
use std::rc::Rc;

use strictly_scratch::{
    BudgetRange, CardId, CardState, Deal, InvariantSet, Outcome, PrizeId, Resolution,
    ScratchInvariants, ScratchPoint, SessionConfig, SessionController, SessionEvent,
    SessionObserver, SessionResult,
};

/// Tiny cards: one center stamp erases the whole 4x4 raster.
fn quick_session(prizes: &[&str], budget: u32) -> SessionController {
    let config = SessionConfig::default()
        .with_card_count(prizes.len())
        .with_budget(BudgetRange::new(budget, budget))
        .with_resolution(Resolution::new(4, 4))
        .with_brush_radius(4);
    let deal = Deal::new(prizes.iter().copied().map(PrizeId::from).collect(), budget);
    let mut session = SessionController::with_deal(config, deal).expect("valid session");
    session.begin();
    session
}

fn reveal(session: &mut SessionController, index: usize) -> Vec<SessionEvent> {
    session.scratch(CardId::new(index), ScratchPoint::CENTER)
}

#[test]
fn test_no_match_within_budget_loses() {
    let mut session = quick_session(&["A", "B", "A"], 3);

    reveal(&mut session, 0);
    reveal(&mut session, 1);
    assert_eq!(session.outcome(), Outcome::InProgress);
    let events = reveal(&mut session, 2);

    assert_eq!(session.outcome(), Outcome::Lost);
    assert_eq!(session.remaining_budget(), 0);
    let result = session.result().expect("terminal result");
    assert_eq!(result.matched_prize(), &None);
    assert_eq!(
        result.revealed(),
        &vec![PrizeId::from("A"), PrizeId::from("B"), PrizeId::from("A")]
    );
    assert!(matches!(events.last(), Some(SessionEvent::Finished(_))));
}

#[test]
fn test_third_match_wins_and_stops_processing() {
    let mut session = quick_session(&["A", "A", "A", "B", "C"], 5);

    reveal(&mut session, 0);
    reveal(&mut session, 1);
    let events = reveal(&mut session, 2);

    assert_eq!(session.outcome(), Outcome::Won);
    assert_eq!(session.remaining_budget(), 2);
    assert_eq!(
        session.result().unwrap().matched_prize(),
        &Some(PrizeId::from("A"))
    );
    assert!(matches!(events.last(), Some(SessionEvent::Finished(_))));

    // Remaining cards are locked and never processed.
    for index in 3..5 {
        assert!(reveal(&mut session, index).is_empty());
        let card = session.card(CardId::new(index)).unwrap();
        assert!(card.is_locked());
        assert_eq!(card.state(), CardState::Idle);
    }
    assert_eq!(session.revealed_prizes().len(), 3);
}

#[test]
fn test_second_start_while_turn_held_is_ignored() {
    let config = SessionConfig::default()
        .with_card_count(2)
        .with_budget(BudgetRange::new(2, 2))
        .with_resolution(Resolution::new(10, 10))
        .with_brush_radius(1);
    let deal = Deal::new(vec![PrizeId::from("A"), PrizeId::from("B")], 2);
    let mut session = SessionController::with_deal(config, deal).unwrap();
    session.begin();

    let first = session.scratch(CardId::new(0), ScratchPoint::CENTER);
    let second = session.scratch(CardId::new(1), ScratchPoint::CENTER);

    assert_eq!(first, vec![SessionEvent::CardStarted(CardId::new(0))]);
    assert!(second.is_empty());
    assert_eq!(session.active_card(), Some(CardId::new(0)));

    let other = session.card(CardId::new(1)).unwrap();
    assert_eq!(other.state(), CardState::Idle);
    assert!(other.is_locked());
    assert_eq!(other.surface().erased_cells(), 0);
}

#[test]
fn test_unlock_releases_turn_to_other_cards() {
    let config = SessionConfig::default()
        .with_card_count(3)
        .with_budget(BudgetRange::new(2, 2))
        .with_resolution(Resolution::new(10, 10))
        .with_brush_radius(4);
    let deal = Deal::new(vec![PrizeId::from("A"); 3], 2);
    let mut session = SessionController::with_deal(config, deal).unwrap();
    session.begin();

    // Radius 4 from the center erases 49 cells: started, not yet unlocked.
    session.scratch(CardId::new(0), ScratchPoint::CENTER);
    assert_eq!(session.active_card(), Some(CardId::new(0)));
    assert!(session.card(CardId::new(1)).unwrap().is_locked());

    // A second stamp pushes card 0 past the unlock threshold only.
    let events = session.scratch(CardId::new(0), ScratchPoint::new(0.15, 0.15));
    assert_eq!(events, vec![SessionEvent::CardUnlocked(CardId::new(0))]);
    assert_eq!(session.active_card(), None);
    assert!(session.cards().iter().all(|c| !c.is_locked()));

    // Another card may now take the turn, locking the first one.
    let events = session.scratch(CardId::new(2), ScratchPoint::CENTER);
    assert_eq!(events, vec![SessionEvent::CardStarted(CardId::new(2))]);
    assert!(session.card(CardId::new(0)).unwrap().is_locked());
    assert!(ScratchInvariants::check_all(&session).is_ok());
}

#[test]
fn test_input_before_begin_is_ignored() {
    let config = SessionConfig::default()
        .with_card_count(2)
        .with_budget(BudgetRange::new(1, 2))
        .with_resolution(Resolution::new(4, 4));
    let mut session = SessionController::start_seeded(config, 17).unwrap();

    assert!(!session.is_begun());
    assert!(session.scratch(CardId::new(0), ScratchPoint::CENTER).is_empty());
    assert_eq!(session.card(CardId::new(0)).unwrap().state(), CardState::Idle);
}

#[test]
fn test_input_after_end_is_dropped() {
    let mut session = quick_session(&["A", "B"], 1);
    reveal(&mut session, 0);
    assert_eq!(session.outcome(), Outcome::Lost);

    assert!(reveal(&mut session, 1).is_empty());
    assert_eq!(session.revealed_prizes().len(), 1);
    assert_eq!(session.remaining_budget(), 0);
}

#[test]
fn test_invalid_config_is_rejected_before_dealing() {
    let config = SessionConfig::default()
        .with_unlock_threshold(0.9)
        .with_reveal_threshold(0.8);
    assert!(SessionController::start_seeded(config, 1).is_err());

    let config = SessionConfig::default().with_card_count(0);
    assert!(SessionController::start(config).is_err());
}

struct Recorder {
    log: Rc<RefCell<Vec<String>>>,
}

impl SessionObserver for Recorder {
    fn on_card_started(&mut self, card: CardId) {
        self.log.borrow_mut().push(format!("started {card}"));
    }

    fn on_card_unlocked(&mut self, card: CardId) {
        self.log.borrow_mut().push(format!("unlocked {card}"));
    }

    fn on_card_revealed(&mut self, card: CardId, prize: &PrizeId) {
        self.log.borrow_mut().push(format!("revealed {card} {prize}"));
    }

    fn on_finished(&mut self, result: &SessionResult) {
        self.log.borrow_mut().push(format!("finished {}", result.outcome()));
    }
}

#[test]
fn test_observers_see_causal_order_and_one_finish() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut session = quick_session(&["A", "B"], 2);
    session.subscribe(Box::new(Recorder { log: log.clone() }));

    reveal(&mut session, 0);
    reveal(&mut session, 1);
    reveal(&mut session, 1);

    assert_eq!(
        *log.borrow(),
        vec![
            "started card-0",
            "unlocked card-0",
            "revealed card-0 A",
            "started card-1",
            "unlocked card-1",
            "revealed card-1 B",
            "finished Lost",
        ]
    );
}

#[test]
fn test_seeded_sessions_deal_identically() {
    let config = SessionConfig::default().with_resolution(Resolution::new(8, 8));
    let a = SessionController::start_seeded(config.clone(), 2024).unwrap();
    let b = SessionController::start_seeded(config, 2024).unwrap();

    assert_eq!(a.budget(), b.budget());
    let prizes_a: Vec<_> = a.cards().iter().map(|c| c.prize().clone()).collect();
    let prizes_b: Vec<_> = b.cards().iter().map(|c| c.prize().clone()).collect();
    assert_eq!(prizes_a, prizes_b);
    assert!(BudgetRange::default().contains(a.budget()));
}
