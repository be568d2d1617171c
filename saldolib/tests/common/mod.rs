#![allow(dead_code)]

use saldolib::{traits::Ui, Kind, Movement, MovementInput};
use std::collections::VecDeque;

/// Answers confirmations and prompts from a script, recording what was shown.
#[derive(Default)]
pub struct ScriptedUi {
    pub confirms: VecDeque<bool>,
    pub prompts: VecDeque<Option<String>>,
    pub notes: Vec<String>,
    pub questions: Vec<String>,
    pub renders: Vec<usize>,
}

impl ScriptedUi {
    pub fn confirming(answers: &[bool]) -> Self {
        ScriptedUi {
            confirms: answers.iter().copied().collect(),
            ..Default::default()
        }
    }

    pub fn prompting(answers: &[Option<&str>]) -> Self {
        ScriptedUi {
            prompts: answers.iter().copied().map(|a| a.map(str::to_string)).collect(),
            ..Default::default()
        }
    }
}

impl Ui for ScriptedUi {
    fn confirm(&mut self, message: &str) -> bool {
        self.questions.push(message.to_string());
        self.confirms.pop_front().expect("unexpected confirmation")
    }

    fn notify(&mut self, message: &str) {
        self.notes.push(message.to_string());
    }

    fn prompt(&mut self, message: &str, _default: &str) -> Option<String> {
        self.questions.push(message.to_string());
        self.prompts.pop_front().expect("unexpected prompt")
    }

    fn render(&mut self, ledger: &[Movement]) {
        self.renders.push(ledger.len());
    }
}

pub fn input(amount: f64, purpose: &str, date: &str, kind: Kind) -> MovementInput {
    MovementInput {
        amount,
        purpose: purpose.to_string(),
        date: date.to_string(),
        kind,
    }
}
