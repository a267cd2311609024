//! Recording device shared by the workflow integration tests.
//!
//! Answers every collaborator call from a script and logs each call as an
//! [`Event`], so tests can assert on the exact order of screens, store
//! calls and resets.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::time::Duration;

use bulwark_secrets::{Passphrase, Password};
use bulwark_workflow::status::ENTER_PASSWORD_TITLE;
use bulwark_workflow::{
    AttemptOutcome, CredentialStore, DeviceMemory, FactoryReset, LockImage, UserInterface,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    PopAll,
    Prompt(String),
    Verify(String),
    Status(String),
    Image(LockImage),
    Delay(Duration),
    UnlockSeed(String),
    FactoryReset,
}

pub struct ScriptedDevice {
    pub initialized: bool,
    pub locked: bool,
    pub passphrase_enabled: bool,
    pub seed_unlock_succeeds: bool,
    pub events: Vec<Event>,
    /// One entry per repeated password prompt: was the buffer handed back
    /// by the workflow all-zero before it was refilled?
    pub password_wiped: Vec<bool>,
    outcomes: VecDeque<AttemptOutcome>,
    inputs: VecDeque<String>,
    password_prompted: bool,
}

impl ScriptedDevice {
    pub fn new(outcomes: &[AttemptOutcome], inputs: &[&str]) -> Self {
        Self {
            initialized: true,
            locked: true,
            passphrase_enabled: false,
            seed_unlock_succeeds: true,
            events: Vec::new(),
            password_wiped: Vec::new(),
            outcomes: outcomes.iter().copied().collect(),
            inputs: inputs.iter().map(|s| (*s).to_string()).collect(),
            password_prompted: false,
        }
    }

    pub fn with_passphrase(mut self) -> Self {
        self.passphrase_enabled = true;
        self
    }

    pub fn statuses(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Status(msg) => Some(msg.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn prompts(&self) -> usize {
        self.count(|e| matches!(e, Event::Prompt(_)))
    }

    pub fn seed_unlocks(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::UnlockSeed(p) => Some(p.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn resets(&self) -> usize {
        self.count(|e| *e == Event::FactoryReset)
    }
}

impl CredentialStore for ScriptedDevice {
    fn verify_password(&mut self, password: &Password) -> AttemptOutcome {
        self.events.push(Event::Verify(password.as_str().to_string()));
        let outcome = self.outcomes.pop_front().expect("no scripted outcome left");
        if outcome == AttemptOutcome::Ok {
            self.locked = false;
        }
        outcome
    }

    fn unlock_seed(&mut self, passphrase: &Passphrase) -> bool {
        self.events
            .push(Event::UnlockSeed(passphrase.as_str().to_string()));
        self.seed_unlock_succeeds
    }

    fn is_locked(&self) -> bool {
        self.locked
    }
}

impl DeviceMemory for ScriptedDevice {
    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn is_mnemonic_passphrase_enabled(&self) -> bool {
        self.passphrase_enabled
    }
}

impl UserInterface for ScriptedDevice {
    fn enter_secret(&mut self, title: &str, out: &mut Password) {
        if title == ENTER_PASSWORD_TITLE {
            if self.password_prompted {
                self.password_wiped.push(out.is_zeroed());
            }
            self.password_prompted = true;
        }
        self.events.push(Event::Prompt(title.to_string()));
        let input = self.inputs.pop_front().expect("no scripted input left");
        out.set(&input);
    }

    fn show_status(&mut self, message: &str, _dismiss_is_final: bool) {
        self.events.push(Event::Status(message.to_string()));
    }

    fn pop_all_screens(&mut self) {
        self.events.push(Event::PopAll);
    }

    fn draw_image(&mut self, image: LockImage) {
        self.events.push(Event::Image(image));
    }

    fn delay(&mut self, duration: Duration) {
        self.events.push(Event::Delay(duration));
    }
}

impl FactoryReset for ScriptedDevice {
    fn reset_to_factory(&mut self) {
        self.events.push(Event::FactoryReset);
    }
}
