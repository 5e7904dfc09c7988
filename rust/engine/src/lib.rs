//! # cardroom-engine: Multiplayer Poker Round Engine
//!
//! A deterministic round orchestrator for multiplayer poker tables. It runs
//! Texas Hold'em, Omaha, Seven-Card Stud and Five-Card Draw with antes,
//! blinds, side pots and tournament blind escalation, and stays agnostic to
//! how player decisions are obtained.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation and the redacted [`cards::CardView`]
//! - [`deck`] - Seeded ChaCha20 shuffles and stacked decks
//! - [`hand`] - Hand families, ranking and comparable [`hand::Hand`] values
//! - [`variant`] - Per-variant dealing rules behind the [`variant::GameVariant`] trait
//! - [`pot`] - Betting ledger and side-pot splitting
//! - [`player`] - Player money, street bet and cards
//! - [`rules`] - Decision requests and clamping into legal actions
//! - [`helper`] - Notification sink and decision source boundary
//! - [`channel`] - Channel-backed decision source for session threads
//! - [`registry`] - Lock-guarded seat registry owned by the boundary
//! - [`config`] - Table configuration
//! - [`engine`] - The round state machine
//! - [`invariant`] - Money-conservation checks
//! - [`errors`] - Error types
//!
//! ## Quick Start
//!
//! ```rust
//! use cardroom_engine::cards::parse_cards;
//! use cardroom_engine::hand::{Category, HandRanking};
//!
//! let cards = parse_cards("Ah Kh Qh Jh Th 2c 3d").unwrap();
//! let hand = HandRanking::standard().best_hand(&cards).unwrap();
//! assert_eq!(hand.category(), Category::StraightFlush);
//! ```
//!
//! ## Deterministic Gameplay
//!
//! Every shuffle derives from the table seed, so a seeded table replays the
//! same cards:
//!
//! ```rust
//! use cardroom_engine::deck::Deck;
//!
//! let mut a = Deck::shuffled(42);
//! let mut b = Deck::shuffled(42);
//! assert_eq!(a.deal_n(52).unwrap(), b.deal_n(52).unwrap());
//! ```

pub mod cards;
pub mod channel;
pub mod config;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod hand;
pub mod helper;
pub mod invariant;
pub mod player;
pub mod pot;
pub mod registry;
pub mod rules;
pub mod variant;
