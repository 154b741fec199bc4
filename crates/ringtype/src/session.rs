//! Explicitly owned typing state, advanced one controller frame at a time.

use crate::config::Config;
use crate::corpus::CorpusSink;
use crate::events::{Control, ControllerFrame};
use crate::layout::{CaseMode, Token};
use crate::predict::{Predictor, Suggestion};
use crate::selector::{RadialSelector, SelectionState};
use crate::sentence::SentenceBuffer;
use keytap::{Keystroke, NamedKey};
use std::time::Instant;

const ARROWS: &[(Control, NamedKey)] = &[
    (Control::Up, NamedKey::Up),
    (Control::Down, NamedKey::Down),
    (Control::Left, NamedKey::Left),
    (Control::Right, NamedKey::Right),
];

/// Result of one tick: what to inject plus what to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutput {
    pub keystrokes: Vec<Keystroke>,
    pub selection: SelectionState,
    /// Whether the stick is outside the dead zone.
    pub engaged: bool,
    pub suggestion: Suggestion,
}

pub struct Session {
    selector: RadialSelector,
    buffer: SentenceBuffer,
    predictor: Predictor,
    corpus: Box<dyn CorpusSink>,
}

impl Session {
    pub fn new(selector: RadialSelector, predictor: Predictor, corpus: Box<dyn CorpusSink>) -> Self {
        let mut session = Self {
            selector,
            buffer: SentenceBuffer::new(),
            predictor,
            corpus,
        };
        session.refresh();
        session
    }

    pub fn buffer(&self) -> &SentenceBuffer {
        &self.buffer
    }

    pub fn predictor(&self) -> &Predictor {
        &self.predictor
    }

    pub fn selector(&self) -> &RadialSelector {
        &self.selector
    }

    pub fn suggestion(&self) -> &Suggestion {
        self.predictor.suggestion()
    }

    /// Applies a reloaded config. The buffer and trained models are kept.
    pub fn apply_config(&mut self, config: &Config) {
        self.selector.set_config(config.selector);
        self.selector.set_layout(config.layout_or_default());
        self.predictor.set_config(config.predictor);
        self.refresh();
    }

    pub fn tick(&mut self, frame: &ControllerFrame, now: Instant) -> TickOutput {
        let mut out = Vec::new();

        self.selector.set_modifiers(
            frame.is_held(Control::AlternateSet),
            frame.is_held(Control::Uppercase),
        );
        let (x, y) = frame.left_stick;
        let selection = self.selector.update(x, y);

        if frame.pressed(Control::Confirm)
            && let Some(token) = self.selector.commit(now)
        {
            self.emit_token(token, selection.case_mode, &mut out);
        }
        if frame.pressed(Control::Delete) {
            self.delete(&mut out);
        }
        if frame.pressed(Control::Space) {
            out.push(Keystroke::text(" "));
            self.record_raw(" ");
            self.buffer.word_break();
            self.refresh();
        }
        if frame.pressed(Control::Newline) {
            self.newline(&mut out);
        }
        for (control, key) in ARROWS {
            if frame.pressed(*control) {
                out.push(Keystroke::Key(*key));
            }
        }
        if frame.pressed(Control::AcceptSuggestion) {
            self.accept_suggestion(&mut out);
        }

        TickOutput {
            keystrokes: out,
            selection: self.selector.state(),
            engaged: self.selector.is_engaged(),
            suggestion: self.predictor.suggestion().clone(),
        }
    }

    fn emit_token(&mut self, token: Token, case: CaseMode, out: &mut Vec<Keystroke>) {
        match token {
            Token::Delete => self.delete(out),
            Token::Commit => self.newline(out),
            Token::Text(_) => {
                let Some(text) = token.render(case) else {
                    return;
                };
                self.record_raw(&text);
                self.buffer.append_char(&text);
                out.push(Keystroke::Text(text));
                self.refresh();
            }
        }
    }

    fn delete(&mut self, out: &mut Vec<Keystroke>) {
        out.push(Keystroke::Key(NamedKey::Backspace));
        self.buffer.backspace();
        self.refresh();
    }

    fn newline(&mut self, out: &mut Vec<Keystroke>) {
        out.push(Keystroke::Key(NamedKey::Enter));
        self.record_raw("\n");

        if let Some(sentence) = self.buffer.commit_sentence() {
            log::info!("Training on sentence {:?}", sentence);
            self.predictor.train_sentence(&sentence);
            if let Err(e) = self.corpus.persist_sentence(&sentence) {
                log::error!("Failed to save training sentence: {}", e);
            }
        }
        self.refresh();
    }

    fn accept_suggestion(&mut self, out: &mut Vec<Keystroke>) {
        let suggestion = self.predictor.suggestion().text.clone();
        if suggestion.is_empty() {
            return;
        }

        let acceptance = self.buffer.accept(&suggestion);
        log::debug!("Accepted '{}', typing {:?}", suggestion, acceptance);
        out.extend(Keystroke::erase(acceptance.erase));
        self.record_raw(&acceptance.text);
        out.push(Keystroke::Text(acceptance.text));
        self.refresh();
    }

    fn record_raw(&mut self, text: &str) {
        if let Err(e) = self.corpus.append_raw(text) {
            log::error!("Failed to save typed text: {}", e);
        }
    }

    fn refresh(&mut self) {
        self.predictor.recompute(&self.buffer);
    }
}
