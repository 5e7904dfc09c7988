use cardroom_engine::cards::{full_deck, parse_cards, Card, Rank as R, Suit as S};
use cardroom_engine::hand::{Category, Hand, HandFamily, HandRanking};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn c(s: S, r: R) -> Card {
    Card { suit: s, rank: r }
}

fn eval(cards: &str) -> Hand {
    HandRanking::standard()
        .best_hand(&parse_cards(cards).expect("valid cards"))
        .expect("non-empty hand")
}

#[test]
fn detects_royal_flush() {
    let cards = [
        c(S::Hearts, R::Ten),
        c(S::Hearts, R::Jack),
        c(S::Hearts, R::Queen),
        c(S::Hearts, R::King),
        c(S::Hearts, R::Ace),
        c(S::Clubs, R::Two),
        c(S::Diamonds, R::Three),
    ];
    let hand = HandRanking::standard().best_hand(&cards).unwrap();
    assert_eq!(hand.category(), Category::StraightFlush);
    assert_eq!(hand.to_string(), "Straight Flush, Ace high");
}

#[test]
fn category_ordering_is_correct() {
    let ladder = [
        "Ac Kd 9s 8d 7c 3d 2h",
        "Ac Ah 2s 3d 4c 9d 7h",
        "Ac Ah 2s 2d 4c 9d 7h",
        "Qc Qh Qd 2s 3c 4h 9d",
        "5c 6h 7c 8h 9d 2s 3c",
        "2h 7h Jh Qh 9h Ac Kd",
        "Kc Kd Kh Qc Qd 2h 3s",
        "Ac Ad Ah As Kc Qd 2h",
        "9h Th Jh Qh Kh 2c 3d",
    ];
    let hands: Vec<Hand> = ladder.iter().map(|s| eval(s)).collect();
    for w in hands.windows(2) {
        assert!(w[0] < w[1], "{} should lose to {}", w[0], w[1]);
        assert!(w[0].category() < w[1].category());
    }
}

#[test]
fn kickers_break_ties_within_a_category() {
    assert!(eval("Ac Ah Kd 9s 5c 3d 2h") > eval("As Ad Qd Js 9c 3c 2d"));
    assert!(eval("Kc Kh 7d 7s 2c 3d 4h") > eval("Kd Ks 6d 6s Ac 3c 4c"));
    assert_eq!(eval("Ac Ah Kd Qs 9c 3d 2h"), eval("As Ad Kh Qd 9h 4c 2c"));
}

#[test]
fn wheel_loses_to_six_high_straight() {
    let wheel = eval("Ac 2d 3h 4s 5c 9d Jh");
    let six = eval("2d 3h 4s 5c 6c 9d Jh");
    assert_eq!(wheel.category(), Category::Straight);
    assert!(wheel < six);
}

#[test]
fn families_are_registered_weakest_first() {
    let ranking = HandRanking::standard();
    let cats: Vec<Category> = ranking.families().iter().map(HandFamily::category).collect();
    assert_eq!(cats.first(), Some(&Category::HighCard));
    assert_eq!(cats.last(), Some(&Category::StraightFlush));
    assert!(cats.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn partial_ranking_falls_back_to_registered_families() {
    let mut ranking = HandRanking::new();
    ranking.register(HandFamily::HIGH_CARD);
    ranking.register(HandFamily::ONE_PAIR);
    let hand = ranking
        .best_hand(&parse_cards("Ac Ad Ah As Kc").unwrap())
        .unwrap();
    assert_eq!(hand.category(), Category::OnePair);
}

#[test]
fn hand_order_is_total_over_random_deals() {
    let ranking = HandRanking::standard();
    let mut rng = ChaCha20Rng::seed_from_u64(99);
    let mut deck = full_deck();
    for _ in 0..400 {
        deck.shuffle(&mut rng);
        let hands: Vec<Hand> = deck
            .chunks(7)
            .take(3)
            .map(|cards| ranking.best_hand(cards).unwrap())
            .collect();
        let (a, b, c) = (hands[0], hands[1], hands[2]);
        // antisymmetry
        assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
        // transitivity
        if a <= b && b <= c {
            assert!(a <= c);
        }
        if a >= b && b >= c {
            assert!(a >= c);
        }
        // strength never drops below what any single family finds
        for h in &hands {
            assert!(h.category() >= Category::HighCard);
        }
    }
}
