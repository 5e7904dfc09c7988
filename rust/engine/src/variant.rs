//! Game variants and their per-round card state.
//!
//! A [`VariantKind`] is a tagged descriptor; [`VariantKind::new_game`] hands
//! out a fresh [`GameVariant`] for one round. Hold'em and Omaha share
//! [`CommunityGame`], parameterized by [`CommunityRules`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardView, DECK_SIZE};
use crate::deck::Deck;
use crate::errors::GameError;
use crate::hand::{combinations, Hand, HandRanking};

pub type Seat = usize;

const COMMUNITY_CARDS: usize = 5;
const HOLDEM_BURNS: usize = 3;
const STUD_CARDS: usize = 7;
const DRAW_HAND: usize = 5;
/// Most cards one seat may replace in Five-Card Draw.
pub const MAX_DRAW: usize = 3;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantKind {
    TexasHoldem,
    Omaha,
    SevenCardStud,
    FiveCardDraw,
}

impl VariantKind {
    pub fn name(self) -> &'static str {
        match self {
            VariantKind::TexasHoldem => "Texas Hold'em",
            VariantKind::Omaha => "Omaha",
            VariantKind::SevenCardStud => "Seven-Card Stud",
            VariantKind::FiveCardDraw => "Five-Card Draw",
        }
    }

    /// Largest table the deck can serve: deck size divided by the cards one
    /// seat can consume, after shared cards are set aside.
    pub fn max_players(self) -> usize {
        match self {
            VariantKind::TexasHoldem => (DECK_SIZE - COMMUNITY_CARDS - HOLDEM_BURNS) / 2,
            VariantKind::Omaha => (DECK_SIZE - COMMUNITY_CARDS - HOLDEM_BURNS) / 4,
            VariantKind::SevenCardStud => DECK_SIZE / STUD_CARDS,
            VariantKind::FiveCardDraw => DECK_SIZE / (DRAW_HAND + MAX_DRAW),
        }
    }

    pub fn new_game(self, deck: Deck) -> Box<dyn GameVariant> {
        match self {
            VariantKind::TexasHoldem => Box::new(CommunityGame::new(CommunityRules::HOLDEM, deck)),
            VariantKind::Omaha => Box::new(CommunityGame::new(CommunityRules::OMAHA, deck)),
            VariantKind::SevenCardStud => Box::new(StudGame::new(deck)),
            VariantKind::FiveCardDraw => Box::new(DrawGame::new(deck)),
        }
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VariantKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "holdem" | "texas_holdem" | "texas" => Ok(VariantKind::TexasHoldem),
            "omaha" => Ok(VariantKind::Omaha),
            "stud" | "seven_card_stud" => Ok(VariantKind::SevenCardStud),
            "draw" | "five_card_draw" => Ok(VariantKind::FiveCardDraw),
            other => Err(GameError::InvalidConfig(format!("unknown variant {other:?}"))),
        }
    }
}

/// Card event produced between betting streets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Deal {
    /// Shared cards turned face up.
    Community(Vec<Card>),
    /// One more private card to every live seat.
    Single { face_up: bool },
    /// Live seats may now replace cards.
    DrawPhase,
}

/// One seat tied for the best hand at round end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub seat: Seat,
    pub hand: Hand,
}

/// Per-round card mechanics of one variant.
pub trait GameVariant: fmt::Debug + Send {
    /// Validates the player count and deals the initial cards.
    fn begin_round(&mut self, player_count: usize) -> Result<(), GameError>;

    /// Performs the card event that follows a betting street, or returns
    /// `None` once no streets remain.
    fn advance(&mut self) -> Result<Option<Deal>, GameError>;

    fn player_count(&self) -> usize;

    fn cards(&self, seat: Seat) -> &[Card];

    fn community(&self) -> &[Card] {
        &[]
    }

    fn is_face_up(&self, _seat: Seat, _index: usize) -> bool {
        false
    }

    fn fold(&mut self, seat: Seat) -> Result<(), GameError>;

    fn is_folded(&self, seat: Seat) -> bool;

    /// Replaces up to the remaining draw allowance of `discards`. Returns the
    /// replacement cards.
    fn draw(&mut self, _seat: Seat, _discards: &[Card]) -> Result<Vec<Card>, GameError> {
        Err(GameError::DrawNotSupported)
    }

    fn draws_remaining(&self, _seat: Seat) -> usize {
        0
    }

    fn best_hand(&self, seat: Seat) -> Option<Hand>;

    /// Results for every live seat holding the best hand.
    fn end_round(&mut self) -> Vec<GameResult> {
        let hands: Vec<GameResult> = (0..self.player_count())
            .filter(|&s| !self.is_folded(s))
            .filter_map(|s| self.best_hand(s).map(|hand| GameResult { seat: s, hand }))
            .collect();
        let Some(top) = hands.iter().map(|r| r.hand).max() else {
            return Vec::new();
        };
        hands.into_iter().filter(|r| r.hand == top).collect()
    }

    /// Cards of `seat` as `viewer` sees them. `None` is a spectator.
    fn view(&self, seat: Seat, viewer: Option<Seat>) -> Vec<CardView> {
        self.cards(seat)
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                if viewer == Some(seat) || self.is_face_up(seat, i) {
                    CardView::Face(c)
                } else {
                    CardView::Hidden
                }
            })
            .collect()
    }
}

/// Private cards, folded flags and the card source shared by all variants.
#[derive(Debug)]
struct Seats {
    deck: Deck,
    hands: Vec<Vec<Card>>,
    folded: Vec<bool>,
    ranking: HandRanking,
}

impl Seats {
    fn new(deck: Deck) -> Self {
        Self {
            deck,
            hands: Vec::new(),
            folded: Vec::new(),
            ranking: HandRanking::standard(),
        }
    }

    fn reset(&mut self, kind: VariantKind, player_count: usize) -> Result<(), GameError> {
        let max = kind.max_players();
        if player_count == 0 || player_count > max {
            return Err(GameError::InvalidPlayerCount {
                count: player_count,
                max,
            });
        }
        self.hands = vec![Vec::new(); player_count];
        self.folded = vec![false; player_count];
        Ok(())
    }

    /// Deals `rounds` cards to each live seat, one at a time around the table.
    fn deal_around(&mut self, rounds: usize) -> Result<(), GameError> {
        for _ in 0..rounds {
            for seat in 0..self.hands.len() {
                if !self.folded[seat] {
                    let c = self.deck.deal_card()?;
                    self.hands[seat].push(c);
                }
            }
        }
        Ok(())
    }

    fn check_seat(&self, seat: Seat) -> Result<(), GameError> {
        if seat >= self.hands.len() {
            Err(GameError::UnknownSeat(seat))
        } else {
            Ok(())
        }
    }

    fn fold(&mut self, seat: Seat) -> Result<(), GameError> {
        self.check_seat(seat)?;
        self.folded[seat] = true;
        Ok(())
    }

    fn cards(&self, seat: Seat) -> &[Card] {
        self.hands.get(seat).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Shape of a community-card game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommunityRules {
    pub kind: VariantKind,
    pub private_cards: usize,
    /// When set, every hand uses exactly this many private cards and makes
    /// up the rest from the board.
    pub exact_private: Option<usize>,
}

impl CommunityRules {
    pub const HOLDEM: CommunityRules = CommunityRules {
        kind: VariantKind::TexasHoldem,
        private_cards: 2,
        exact_private: None,
    };
    pub const OMAHA: CommunityRules = CommunityRules {
        kind: VariantKind::Omaha,
        private_cards: 4,
        exact_private: Some(2),
    };
}

/// Hold'em-family game: private cards plus five shared cards revealed
/// flop (3), turn (1), river (1).
#[derive(Debug)]
pub struct CommunityGame {
    rules: CommunityRules,
    seats: Seats,
    board: Vec<Card>,
    stage: usize,
}

impl CommunityGame {
    pub fn new(rules: CommunityRules, deck: Deck) -> Self {
        Self {
            rules,
            seats: Seats::new(deck),
            board: Vec::with_capacity(COMMUNITY_CARDS),
            stage: 0,
        }
    }
}

impl GameVariant for CommunityGame {
    fn begin_round(&mut self, player_count: usize) -> Result<(), GameError> {
        self.seats.reset(self.rules.kind, player_count)?;
        self.board.clear();
        self.stage = 0;
        self.seats.deal_around(self.rules.private_cards)
    }

    fn advance(&mut self) -> Result<Option<Deal>, GameError> {
        let count = match self.stage {
            0 => 3,
            1 | 2 => 1,
            _ => return Ok(None),
        };
        self.stage += 1;
        self.seats.deck.burn_card()?;
        let cards = self.seats.deck.deal_n(count)?;
        self.board.extend_from_slice(&cards);
        Ok(Some(Deal::Community(cards)))
    }

    fn player_count(&self) -> usize {
        self.seats.hands.len()
    }

    fn cards(&self, seat: Seat) -> &[Card] {
        self.seats.cards(seat)
    }

    fn community(&self) -> &[Card] {
        &self.board
    }

    fn fold(&mut self, seat: Seat) -> Result<(), GameError> {
        self.seats.fold(seat)
    }

    fn is_folded(&self, seat: Seat) -> bool {
        self.seats.folded.get(seat).copied().unwrap_or(true)
    }

    fn best_hand(&self, seat: Seat) -> Option<Hand> {
        let private = self.seats.cards(seat);
        let ranking = &self.seats.ranking;
        match self.rules.exact_private {
            None => {
                let mut all = private.to_vec();
                all.extend_from_slice(&self.board);
                ranking.best_hand(&all)
            }
            Some(take) => {
                let from_board = (COMMUNITY_CARDS - take).min(self.board.len());
                let boards = combinations(&self.board, from_board);
                combinations(private, take.min(private.len()))
                    .iter()
                    .flat_map(|p| {
                        boards.iter().filter_map(move |b| {
                            let mut five = p.clone();
                            five.extend_from_slice(b);
                            ranking.best_hand(&five)
                        })
                    })
                    .max()
            }
        }
    }
}

/// Seven-Card Stud: two down and one up, three more up, the last down.
#[derive(Debug)]
pub struct StudGame {
    seats: Seats,
    dealt: usize,
}

impl StudGame {
    const INITIAL: usize = 3;

    pub fn new(deck: Deck) -> Self {
        Self {
            seats: Seats::new(deck),
            dealt: 0,
        }
    }
}

impl GameVariant for StudGame {
    fn begin_round(&mut self, player_count: usize) -> Result<(), GameError> {
        self.seats.reset(VariantKind::SevenCardStud, player_count)?;
        self.seats.deal_around(Self::INITIAL)?;
        self.dealt = Self::INITIAL;
        Ok(())
    }

    fn advance(&mut self) -> Result<Option<Deal>, GameError> {
        if self.dealt >= STUD_CARDS {
            return Ok(None);
        }
        let face_up = self.is_face_up(0, self.dealt);
        self.seats.deal_around(1)?;
        self.dealt += 1;
        Ok(Some(Deal::Single { face_up }))
    }

    fn player_count(&self) -> usize {
        self.seats.hands.len()
    }

    fn cards(&self, seat: Seat) -> &[Card] {
        self.seats.cards(seat)
    }

    fn is_face_up(&self, _seat: Seat, index: usize) -> bool {
        (2..STUD_CARDS - 1).contains(&index)
    }

    fn fold(&mut self, seat: Seat) -> Result<(), GameError> {
        self.seats.fold(seat)
    }

    fn is_folded(&self, seat: Seat) -> bool {
        self.seats.folded.get(seat).copied().unwrap_or(true)
    }

    fn best_hand(&self, seat: Seat) -> Option<Hand> {
        self.seats.ranking.best_hand(self.seats.cards(seat))
    }
}

/// Five-Card Draw: five private cards and a single replacement phase.
#[derive(Debug)]
pub struct DrawGame {
    seats: Seats,
    drawn: Vec<usize>,
    muck: Vec<Card>,
    stage: usize,
}

impl DrawGame {
    pub fn new(deck: Deck) -> Self {
        Self {
            seats: Seats::new(deck),
            drawn: Vec::new(),
            muck: Vec::new(),
            stage: 0,
        }
    }

    pub fn muck(&self) -> &[Card] {
        &self.muck
    }
}

impl GameVariant for DrawGame {
    fn begin_round(&mut self, player_count: usize) -> Result<(), GameError> {
        self.seats.reset(VariantKind::FiveCardDraw, player_count)?;
        self.drawn = vec![0; player_count];
        self.muck.clear();
        self.stage = 0;
        self.seats.deal_around(DRAW_HAND)
    }

    fn advance(&mut self) -> Result<Option<Deal>, GameError> {
        if self.stage == 0 {
            self.stage = 1;
            Ok(Some(Deal::DrawPhase))
        } else {
            Ok(None)
        }
    }

    fn player_count(&self) -> usize {
        self.seats.hands.len()
    }

    fn cards(&self, seat: Seat) -> &[Card] {
        self.seats.cards(seat)
    }

    fn fold(&mut self, seat: Seat) -> Result<(), GameError> {
        self.seats.fold(seat)
    }

    fn is_folded(&self, seat: Seat) -> bool {
        self.seats.folded.get(seat).copied().unwrap_or(true)
    }

    fn draw(&mut self, seat: Seat, discards: &[Card]) -> Result<Vec<Card>, GameError> {
        self.seats.check_seat(seat)?;
        if self.seats.folded[seat] {
            return Err(GameError::SeatFolded(seat));
        }
        let allowance = self.draws_remaining(seat);
        let hand = &self.seats.hands[seat];
        let mut chosen: Vec<Card> = Vec::with_capacity(allowance);
        // unknown and repeated cards are ignored, extras beyond the allowance dropped
        for c in discards {
            if chosen.len() == allowance {
                break;
            }
            if hand.contains(c) && !chosen.contains(c) {
                chosen.push(*c);
            }
        }
        let fresh = self.seats.deck.deal_n(chosen.len())?;
        let hand = &mut self.seats.hands[seat];
        for (old, new) in chosen.iter().zip(&fresh) {
            if let Some(slot) = hand.iter_mut().find(|c| *c == old) {
                *slot = *new;
            }
        }
        self.muck.extend_from_slice(&chosen);
        self.drawn[seat] += chosen.len();
        Ok(fresh)
    }

    fn draws_remaining(&self, seat: Seat) -> usize {
        self.drawn
            .get(seat)
            .map(|d| MAX_DRAW.saturating_sub(*d))
            .unwrap_or(0)
    }

    fn best_hand(&self, seat: Seat) -> Option<Hand> {
        self.seats.ranking.best_hand(self.seats.cards(seat))
    }
}
