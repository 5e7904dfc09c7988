//! A [`DecisionSource`] backed by in-process channels.
//!
//! Each seated player is served by a session holding a [`SeatHandle`]. The
//! source sends prompts down the seat's channel and waits for the reply for at
//! most the decision budget. A session that drops its handle, or that the
//! boundary marks faulted in the [`SeatRegistry`], is reported as
//! disconnected.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::{DecisionError, GameError};
use crate::helper::DecisionSource;
use crate::registry::SeatRegistry;
use crate::rules::{BettingDecision, BettingRequest, DrawRequest};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prompt {
    Betting(BettingRequest),
    Draw(DrawRequest),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reply {
    Betting(BettingDecision),
    Draw(Vec<Card>),
}

/// The session side of one seat.
#[derive(Debug)]
pub struct SeatHandle {
    pub prompts: Receiver<Prompt>,
    pub replies: Sender<Reply>,
}

#[derive(Debug)]
struct SeatLink {
    prompts: Sender<Prompt>,
    replies: Receiver<Reply>,
}

#[derive(Debug)]
pub struct ChannelSource {
    links: HashMap<String, SeatLink>,
    waiting: VecDeque<String>,
    registry: Arc<SeatRegistry<()>>,
    stop: Arc<AtomicBool>,
}

impl ChannelSource {
    pub fn new(registry: Arc<SeatRegistry<()>>) -> Self {
        Self {
            links: HashMap::new(),
            waiting: VecDeque::new(),
            registry,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Registers `name` and returns the handle its session answers through.
    /// The name waits in line until the engine seats it.
    pub fn join(&mut self, name: &str) -> Result<SeatHandle, GameError> {
        self.registry.register(name, ())?;
        let (prompt_tx, prompt_rx) = mpsc::channel();
        let (reply_tx, reply_rx) = mpsc::channel();
        self.links.insert(
            name.to_string(),
            SeatLink {
                prompts: prompt_tx,
                replies: reply_rx,
            },
        );
        self.waiting.push_back(name.to_string());
        Ok(SeatHandle {
            prompts: prompt_rx,
            replies: reply_tx,
        })
    }

    /// Takes every name still waiting for a seat.
    pub fn take_waiting(&mut self) -> Vec<String> {
        self.waiting.drain(..).collect()
    }

    /// Setting the flag ends the game after the current round.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    fn ask(&mut self, name: &str, prompt: Prompt, budget: Duration) -> Result<Reply, DecisionError> {
        if self.registry.is_faulted(name) {
            return Err(DecisionError::Disconnected);
        }
        let link = self.links.get(name).ok_or(DecisionError::Disconnected)?;
        // a reply that missed its deadline must not answer this prompt
        while link.replies.try_recv().is_ok() {}
        if link.prompts.send(prompt).is_err() {
            self.registry.mark_faulted(name);
            return Err(DecisionError::Disconnected);
        }
        match link.replies.recv_timeout(budget) {
            Ok(reply) => Ok(reply),
            Err(RecvTimeoutError::Timeout) => Err(DecisionError::Timeout),
            Err(RecvTimeoutError::Disconnected) => {
                self.registry.mark_faulted(name);
                Err(DecisionError::Disconnected)
            }
        }
    }
}

impl DecisionSource for ChannelSource {
    fn request_betting(
        &mut self,
        request: &BettingRequest,
        budget: Duration,
    ) -> Result<BettingDecision, DecisionError> {
        match self.ask(&request.name, Prompt::Betting(request.clone()), budget)? {
            Reply::Betting(decision) => Ok(decision),
            Reply::Draw(_) => Err(DecisionError::Malformed("draw reply to betting prompt".into())),
        }
    }

    fn request_draw(
        &mut self,
        request: &DrawRequest,
        budget: Duration,
    ) -> Result<Vec<Card>, DecisionError> {
        match self.ask(&request.name, Prompt::Draw(request.clone()), budget)? {
            Reply::Draw(cards) => Ok(cards),
            Reply::Betting(_) => Err(DecisionError::Malformed("betting reply to draw prompt".into())),
        }
    }

    fn new_players(&mut self, open_seats: usize) -> Vec<String> {
        let n = open_seats.min(self.waiting.len());
        self.waiting.drain(..n).collect()
    }

    fn should_continue(&mut self, _round: u64) -> bool {
        for name in self.registry.purge_faulted() {
            self.links.remove(&name);
        }
        !self.stop.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn request(name: &str) -> BettingRequest {
        BettingRequest {
            round: 1,
            seat: 0,
            name: name.into(),
            call_amount: 10,
            min_raise: 20,
            money: 100,
            pot: 30,
            all_in_forced: false,
            can_raise: true,
        }
    }

    #[test]
    fn replies_are_forwarded() {
        let mut source = ChannelSource::new(Arc::new(SeatRegistry::new()));
        let handle = source.join("ann").unwrap();
        let session = thread::spawn(move || {
            if let Ok(Prompt::Betting(req)) = handle.prompts.recv() {
                handle.replies.send(Reply::Betting(BettingDecision::Raise(req.min_raise))).unwrap();
            }
        });
        let got = source.request_betting(&request("ann"), Duration::from_secs(5));
        session.join().unwrap();
        assert_eq!(got, Ok(BettingDecision::Raise(20)));
    }

    #[test]
    fn silent_session_times_out() {
        let mut source = ChannelSource::new(Arc::new(SeatRegistry::new()));
        let _handle = source.join("ann").unwrap();
        let got = source.request_betting(&request("ann"), Duration::from_millis(20));
        assert_eq!(got, Err(DecisionError::Timeout));
    }

    #[test]
    fn dropped_session_is_disconnected_and_faulted() {
        let registry = Arc::new(SeatRegistry::new());
        let mut source = ChannelSource::new(Arc::clone(&registry));
        drop(source.join("ann").unwrap());
        let got = source.request_betting(&request("ann"), Duration::from_millis(20));
        assert_eq!(got, Err(DecisionError::Disconnected));
        assert!(registry.is_faulted("ann"));
        assert!(source.should_continue(1));
        assert!(registry.is_empty());
    }

    #[test]
    fn wrong_reply_kind_is_malformed() {
        let mut source = ChannelSource::new(Arc::new(SeatRegistry::new()));
        let handle = source.join("ann").unwrap();
        handle.replies.send(Reply::Draw(Vec::new())).unwrap();
        // stale replies are drained, so answer after the prompt arrives
        let session = thread::spawn(move || {
            if handle.prompts.recv().is_ok() {
                handle.replies.send(Reply::Draw(Vec::new())).unwrap();
            }
        });
        let got = source.request_betting(&request("ann"), Duration::from_secs(5));
        session.join().unwrap();
        assert!(matches!(got, Err(DecisionError::Malformed(_))));
    }

    #[test]
    fn late_joiners_fill_open_seats_in_order() {
        let mut source = ChannelSource::new(Arc::new(SeatRegistry::new()));
        let _a = source.join("ann").unwrap();
        assert_eq!(source.take_waiting(), vec!["ann"]);
        let _b = source.join("bob").unwrap();
        let _c = source.join("cat").unwrap();
        assert_eq!(source.new_players(1), vec!["bob"]);
        assert_eq!(source.new_players(5), vec!["cat"]);
        source.stop_flag().store(true, Ordering::SeqCst);
        assert!(!source.should_continue(2));
    }
}
