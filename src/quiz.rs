//! Quiz engine — linear round flow with score accumulation.
//!
//! Rounds are built up front from the country catalog; the quiz itself is
//! plain in-memory state: current index, score, finished flag.

use crate::countries::CountryCatalog;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

pub const POINTS_PER_CORRECT: u32 = 10;

/// One question: a target country plus shuffled multiple-choice names.
#[derive(Debug, Clone, Serialize)]
pub struct QuizRound {
    pub country: String,
    pub code: String,
    pub choices: Vec<String>,
}

/// Result of answering one round.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_answer: String,
    pub score: u32,
    pub finished: bool,
}

/// Build `rounds` rounds with `choices` options each (target + decoys).
/// Round count is capped by the catalog size; decoys are drawn from the
/// remaining countries.
pub fn build_rounds(
    catalog: &CountryCatalog,
    rounds: usize,
    choices: usize,
    rng: &mut impl Rng,
) -> Vec<QuizRound> {
    let targets = catalog.sample(rng, rounds);

    targets
        .iter()
        .map(|target| {
            let decoys: Vec<&str> = catalog
                .all()
                .iter()
                .filter(|c| c.name != target.name)
                .map(|c| c.name.as_str())
                .collect();

            let mut options: Vec<String> = decoys
                .choose_multiple(rng, choices.saturating_sub(1))
                .map(|name| name.to_string())
                .collect();
            options.push(target.name.clone());
            options.shuffle(rng);

            QuizRound {
                country: target.name.clone(),
                code: target.code.clone(),
                choices: options,
            }
        })
        .collect()
}

/// The quiz state machine: attempting → (answer)* → finished.
pub struct Quiz {
    rounds: Vec<QuizRound>,
    index: usize,
    score: u32,
}

impl Quiz {
    pub fn new(rounds: Vec<QuizRound>) -> Self {
        Self { rounds, index: 0, score: 0 }
    }

    /// The round awaiting an answer, or None once the quiz is over.
    pub fn current(&self) -> Option<&QuizRound> {
        self.rounds.get(self.index)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.rounds.len()
    }

    /// (answered, total)
    pub fn progress(&self) -> (usize, usize) {
        (self.index, self.rounds.len())
    }

    /// Check an answer against the current round and advance. Answering a
    /// finished quiz is a no-op that reports the terminal state.
    pub fn answer(&mut self, choice: &str) -> AnswerOutcome {
        let round = match self.rounds.get(self.index) {
            Some(r) => r,
            None => {
                return AnswerOutcome {
                    correct: false,
                    correct_answer: String::new(),
                    score: self.score,
                    finished: true,
                }
            }
        };

        let correct = round.country.to_lowercase() == choice.trim().to_lowercase();
        let correct_answer = round.country.clone();

        if correct {
            self.score += POINTS_PER_CORRECT;
        }
        self.index += 1;

        AnswerOutcome {
            correct,
            correct_answer,
            score: self.score,
            finished: self.is_finished(),
        }
    }
}
