use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank, Suit};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl Category {
    pub fn name(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::OnePair => "Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
        }
    }
}

/// A ranked hand. Ordering compares the category first and then the
/// tiebreak ranks, high to low, so any two hands are comparable.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Hand {
    category: Category,
    // ordered high -> low, zero padded
    tiebreak: [u8; 5],
}

impl Hand {
    pub fn new(category: Category, tiebreak: [u8; 5]) -> Self {
        Self { category, tiebreak }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn tiebreak(&self) -> [u8; 5] {
        self.tiebreak
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |v: u8| Rank::from_u8(v).map(Rank::plural).unwrap_or("?");
        let [a, b, ..] = self.tiebreak;
        match self.category {
            Category::FullHouse => write!(f, "Full House, {} over {}", name(a), name(b)),
            Category::TwoPair => write!(f, "Two Pair, {} and {}", name(a), name(b)),
            Category::OnePair | Category::ThreeOfAKind | Category::FourOfAKind => {
                write!(f, "{}, {}", self.category.name(), name(a))
            }
            Category::HighCard
            | Category::Straight
            | Category::Flush
            | Category::StraightFlush => {
                write!(f, "{}, {} high", self.category.name(), high_name(a))
            }
        }
    }
}

fn high_name(v: u8) -> &'static str {
    match Rank::from_u8(v) {
        Some(Rank::Ace) => "Ace",
        Some(Rank::King) => "King",
        Some(Rank::Queen) => "Queen",
        Some(Rank::Jack) => "Jack",
        Some(Rank::Ten) => "Ten",
        Some(Rank::Nine) => "Nine",
        Some(Rank::Eight) => "Eight",
        Some(Rank::Seven) => "Seven",
        Some(Rank::Six) => "Six",
        Some(Rank::Five) => "Five",
        Some(Rank::Four) => "Four",
        Some(Rank::Three) => "Three",
        Some(Rank::Two) => "Two",
        None => "?",
    }
}

/// Rank and suit counts of an arbitrary set of cards.
#[derive(Debug, Clone)]
pub struct Tally {
    rank_counts: [u8; 15], // 2..=14 used
    rank_mask: u16,
    suit_masks: [u16; 4],
    suit_counts: [u8; 4],
}

impl Tally {
    pub fn of(cards: &[Card]) -> Option<Self> {
        if cards.is_empty() {
            return None;
        }
        let mut t = Tally {
            rank_counts: [0; 15],
            rank_mask: 0,
            suit_masks: [0; 4],
            suit_counts: [0; 4],
        };
        for c in cards {
            let r = c.rank.value();
            let s = suit_index(c.suit);
            t.rank_counts[r as usize] += 1;
            t.rank_mask |= 1 << r;
            t.suit_masks[s] |= 1 << r;
            t.suit_counts[s] += 1;
        }
        Some(t)
    }

    /// Ranks with at least `n` copies, high to low.
    fn ranks_with(&self, n: u8) -> impl Iterator<Item = u8> + '_ {
        (2..=14u8).rev().filter(move |&r| self.rank_counts[r as usize] >= n)
    }

    /// Distinct ranks present, high to low, skipping `exclude`.
    fn kickers(&self, exclude: &[u8], take: usize) -> Vec<u8> {
        self.ranks_with(1)
            .filter(|r| !exclude.contains(r))
            .take(take)
            .collect()
    }
}

fn suit_index(s: Suit) -> usize {
    match s {
        Suit::Clubs => 0,
        Suit::Diamonds => 1,
        Suit::Hearts => 2,
        Suit::Spades => 3,
    }
}

fn pack(lead: &[u8], rest: &[u8]) -> [u8; 5] {
    let mut k = [0u8; 5];
    for (slot, v) in k.iter_mut().zip(lead.iter().chain(rest.iter())) {
        *slot = *v;
    }
    k
}

fn straight_high_from_mask(mask: u16) -> Option<u8> {
    let mut m = mask;
    // Ace also plays low
    if (m & (1 << 14)) != 0 {
        m |= 1 << 1;
    }
    (5..=14u8).rev().find(|&high| {
        let window = 0b1_1111u16 << (high - 4);
        (m & window) == window
    })
}

fn detect_straight_flush(t: &Tally) -> Option<[u8; 5]> {
    (0..4)
        .filter(|&s| t.suit_counts[s] >= 5)
        .filter_map(|s| straight_high_from_mask(t.suit_masks[s]))
        .max()
        .map(|high| [high, 0, 0, 0, 0])
}

fn detect_quads(t: &Tally) -> Option<[u8; 5]> {
    let quad = t.ranks_with(4).next()?;
    Some(pack(&[quad], &t.kickers(&[quad], 1)))
}

fn detect_full_house(t: &Tally) -> Option<[u8; 5]> {
    let trip = t.ranks_with(3).next()?;
    let pair = t.ranks_with(2).find(|&r| r != trip)?;
    Some([trip, pair, 0, 0, 0])
}

fn detect_flush(t: &Tally) -> Option<[u8; 5]> {
    (0..4)
        .filter(|&s| t.suit_counts[s] >= 5)
        .map(|s| {
            let mask = t.suit_masks[s];
            let top: Vec<u8> = (2..=14u8)
                .rev()
                .filter(|&r| mask & (1 << r) != 0)
                .take(5)
                .collect();
            pack(&top, &[])
        })
        .max()
}

fn detect_straight(t: &Tally) -> Option<[u8; 5]> {
    straight_high_from_mask(t.rank_mask).map(|high| [high, 0, 0, 0, 0])
}

fn detect_trips(t: &Tally) -> Option<[u8; 5]> {
    let trip = t.ranks_with(3).next()?;
    Some(pack(&[trip], &t.kickers(&[trip], 2)))
}

fn detect_two_pair(t: &Tally) -> Option<[u8; 5]> {
    let mut pairs = t.ranks_with(2);
    let high = pairs.next()?;
    let low = pairs.next()?;
    Some(pack(&[high, low], &t.kickers(&[high, low], 1)))
}

fn detect_pair(t: &Tally) -> Option<[u8; 5]> {
    let pair = t.ranks_with(2).next()?;
    Some(pack(&[pair], &t.kickers(&[pair], 3)))
}

fn detect_high_card(t: &Tally) -> Option<[u8; 5]> {
    Some(pack(&t.kickers(&[], 5), &[]))
}

/// Detector for one hand category. Given any cards, it yields the best hand
/// of its own category or nothing.
#[derive(Clone, Copy)]
pub struct HandFamily {
    category: Category,
    detect: fn(&Tally) -> Option<[u8; 5]>,
}

impl fmt::Debug for HandFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HandFamily").field(&self.category).finish()
    }
}

impl HandFamily {
    pub const HIGH_CARD: HandFamily = HandFamily::new(Category::HighCard, detect_high_card);
    pub const ONE_PAIR: HandFamily = HandFamily::new(Category::OnePair, detect_pair);
    pub const TWO_PAIR: HandFamily = HandFamily::new(Category::TwoPair, detect_two_pair);
    pub const THREE_OF_A_KIND: HandFamily =
        HandFamily::new(Category::ThreeOfAKind, detect_trips);
    pub const STRAIGHT: HandFamily = HandFamily::new(Category::Straight, detect_straight);
    pub const FLUSH: HandFamily = HandFamily::new(Category::Flush, detect_flush);
    pub const FULL_HOUSE: HandFamily = HandFamily::new(Category::FullHouse, detect_full_house);
    pub const FOUR_OF_A_KIND: HandFamily = HandFamily::new(Category::FourOfAKind, detect_quads);
    pub const STRAIGHT_FLUSH: HandFamily =
        HandFamily::new(Category::StraightFlush, detect_straight_flush);

    pub const fn new(category: Category, detect: fn(&Tally) -> Option<[u8; 5]>) -> Self {
        Self { category, detect }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn find(&self, cards: &[Card]) -> Option<Hand> {
        Tally::of(cards).and_then(|t| self.find_in(&t))
    }

    fn find_in(&self, tally: &Tally) -> Option<Hand> {
        (self.detect)(tally).map(|k| Hand::new(self.category, k))
    }
}

/// Ordered set of hand families. Families are registered weakest first and
/// evaluated strongest first; the first family that matches decides.
#[derive(Debug, Clone, Default)]
pub struct HandRanking {
    families: Vec<HandFamily>,
}

impl HandRanking {
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard high-hand order used by every supported variant.
    pub fn standard() -> Self {
        let mut r = Self::new();
        for f in [
            HandFamily::HIGH_CARD,
            HandFamily::ONE_PAIR,
            HandFamily::TWO_PAIR,
            HandFamily::THREE_OF_A_KIND,
            HandFamily::STRAIGHT,
            HandFamily::FLUSH,
            HandFamily::FULL_HOUSE,
            HandFamily::FOUR_OF_A_KIND,
            HandFamily::STRAIGHT_FLUSH,
        ] {
            r.register(f);
        }
        r
    }

    pub fn register(&mut self, family: HandFamily) {
        self.families.push(family);
    }

    pub fn families(&self) -> &[HandFamily] {
        &self.families
    }

    pub fn best_hand(&self, cards: &[Card]) -> Option<Hand> {
        let tally = Tally::of(cards)?;
        self.families.iter().rev().find_map(|f| f.find_in(&tally))
    }
}

/// All `k`-element subsets of `items`, preserving input order.
pub fn combinations<T: Copy>(items: &[T], k: usize) -> Vec<Vec<T>> {
    let mut out = Vec::new();
    if k > items.len() {
        return out;
    }
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        out.push(idx.iter().map(|&i| items[i]).collect());
        // advance the rightmost index that still has room
        let Some(pos) = (0..k).rev().find(|&i| idx[i] != i + items.len() - k) else {
            return out;
        };
        idx[pos] += 1;
        for j in pos + 1..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
}
