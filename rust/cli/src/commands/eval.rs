//! Hand evaluation command handler.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::io::Write;

use cardroom_engine::cards::{parse_cards, Card};
use cardroom_engine::hand::{Hand, HandRanking};

use crate::error::CliError;

/// Prints the best hand in `cards`, and which set wins when `against` is
/// given.
pub fn handle_eval_command(
    cards: &str,
    against: Option<&str>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let ranking = HandRanking::standard();
    let (first_cards, first) = best_hand(&ranking, cards)?;
    writeln!(out, "{} => {}", join(&first_cards), first)?;

    let Some(other) = against else {
        return Ok(());
    };
    let (second_cards, second) = best_hand(&ranking, other)?;
    writeln!(out, "{} => {}", join(&second_cards), second)?;
    let verdict = match first.cmp(&second) {
        Ordering::Greater => "first",
        Ordering::Less => "second",
        Ordering::Equal => "tie",
    };
    writeln!(out, "Winner: {}", verdict)?;
    Ok(())
}

fn best_hand(ranking: &HandRanking, text: &str) -> Result<(Vec<Card>, Hand), CliError> {
    let cards = parse_cards(text).map_err(|e| CliError::InvalidInput(e.to_string()))?;
    let mut seen = HashSet::new();
    if let Some(dup) = cards.iter().find(|c| !seen.insert(**c)) {
        return Err(CliError::InvalidInput(format!("duplicate card {}", dup)));
    }
    let hand = ranking
        .best_hand(&cards)
        .ok_or_else(|| CliError::InvalidInput("no cards given".into()))?;
    Ok((cards, hand))
}

fn join(cards: &[Card]) -> String {
    cards
        .iter()
        .map(Card::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(cards: &str, against: Option<&str>) -> Result<String, CliError> {
        let mut out = Vec::new();
        handle_eval_command(cards, against, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn describes_the_best_hand() {
        let text = eval("Kc Kd 2h 2s Ks 9c 3d", None).unwrap();
        assert_eq!(text, "Kc Kd 2h 2s Ks 9c 3d => Full House, Kings over Twos\n");
    }

    #[test]
    fn compares_two_sets() {
        let text = eval("Ac 2d 3h 4s 5c", Some("2d 3h 4s 5c 6c")).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Ac 2d 3h 4s 5c => Straight, Five high");
        assert_eq!(lines[2], "Winner: second");

        let text = eval("Ah Kd", Some("As Kc")).unwrap();
        assert!(text.ends_with("Winner: tie\n"));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(eval("Ah Ah Kd", None), Err(CliError::InvalidInput(_))));
        assert!(matches!(eval("Zz", None), Err(CliError::InvalidInput(_))));
        assert!(matches!(eval("   ", None), Err(CliError::InvalidInput(_))));
    }
}
