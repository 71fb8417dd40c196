use higherlower_lib::{
    data::CompanyStore,
    game::{GamePhase, GameSession, GuessDirection},
};

// Drives the store and the state machine together the way the controller
// does, with no backend configured: the game must be fully playable on the
// embedded demo data.
#[tokio::test]
async fn demo_session_plays_rounds_end_to_end() {
    let store = CompanyStore::connect(None);
    assert!(store.is_demo());
    assert_eq!(store.load_pool().await, 10);

    let candidates = store.draw_initial(4).await;
    assert_eq!(candidates.len(), 4);

    let mut session = GameSession::new(store.is_demo());
    session.initialize(candidates, store.is_demo()).unwrap();
    assert_eq!(session.phase, GamePhase::Ready);
    assert!(session.demo_mode);

    for _ in 0..8 {
        let left = session.left.clone().unwrap();
        let right = session.right.clone().unwrap();
        assert_ne!(left.id, right.id);

        // Guess whichever direction the data supports, so the run only ends
        // when we stop; equal display buckets make either direction correct.
        let direction = if right.rounded_valuation() >= left.rounded_valuation() {
            GuessDirection::Higher
        } else {
            GuessDirection::Lower
        };
        assert!(session.apply_guess(direction).unwrap());
        assert_eq!(session.phase, GamePhase::Advancing);

        let used = session.used_ids.clone();
        let displayed = session.in_play_ids();
        let replacement = store.random_company(&used, &displayed).await;
        session.advance(replacement).unwrap();

        // Identity preserved across the shift.
        assert_eq!(session.left.as_ref().unwrap().id, right.id);
        assert_eq!(session.phase, GamePhase::Ready);
    }

    assert_eq!(session.score, 8);
}

#[tokio::test]
async fn wrong_guess_is_terminal_until_reset() {
    let store = CompanyStore::connect(None);
    let candidates = store.draw_initial(4).await;

    let mut session = GameSession::new(true);
    session.initialize(candidates, true).unwrap();

    let left = session.left.clone().unwrap();
    let right = session.right.clone().unwrap();
    let wrong = if right.rounded_valuation() > left.rounded_valuation() {
        GuessDirection::Lower
    } else if right.rounded_valuation() < left.rounded_valuation() {
        GuessDirection::Higher
    } else {
        // Equal buckets cannot produce a wrong guess; nothing to test here.
        return;
    };

    assert!(!session.apply_guess(wrong).unwrap());
    assert!(session.game_over);
    assert_eq!(session.phase, GamePhase::GameOver);
    assert!(session.apply_guess(GuessDirection::Higher).is_err());

    let candidates = store.draw_initial(4).await;
    session.initialize(candidates, true).unwrap();
    assert_eq!(session.score, 0);
    assert!(!session.game_over);
    assert_eq!(session.phase, GamePhase::Ready);
}
