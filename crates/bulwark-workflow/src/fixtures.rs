//! Scripted device for unit tests.
//!
//! Only what the unit tests assert on; the integration tests carry the
//! fuller recording device in `tests/support`.

use std::collections::VecDeque;
use std::time::Duration;

use bulwark_secrets::{Passphrase, Password};

use crate::device::{
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

pub struct FakeDevice {
    pub initialized: bool,
    pub locked: bool,
    pub seed_unlock_succeeds: bool,
    pub events: Vec<Event>,
    outcomes: VecDeque<AttemptOutcome>,
    inputs: VecDeque<String>,
}

impl FakeDevice {
    /// Initialized, locked device answering verifications with `outcomes`.
    pub fn locked(outcomes: &[AttemptOutcome]) -> Self {
        Self {
            initialized: true,
            locked: true,
            seed_unlock_succeeds: true,
            events: Vec::new(),
            outcomes: outcomes.iter().copied().collect(),
            inputs: VecDeque::new(),
        }
    }

    pub fn with_inputs(mut self, inputs: &[&str]) -> Self {
        self.inputs = inputs.iter().map(|s| (*s).to_string()).collect();
        self
    }

    pub fn statuses(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Status(msg) => Some(msg.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn prompts(&self) -> usize {
        self.events.iter().filter(|e| matches!(e, Event::Prompt(_))).count()
    }

    pub fn resets(&self) -> usize {
        self.events.iter().filter(|e| **e == Event::FactoryReset).count()
    }
}

impl CredentialStore for FakeDevice {
    fn verify_password(&mut self, password: &Password) -> AttemptOutcome {
        self.events.push(Event::Verify(password.as_str().to_string()));
        let outcome = self.outcomes.pop_front().expect("no scripted outcome left");
        self.locked = outcome != AttemptOutcome::Ok;
        outcome
    }

    fn unlock_seed(&mut self, passphrase: &Passphrase) -> bool {
        self.events.push(Event::UnlockSeed(passphrase.as_str().to_string()));
        self.seed_unlock_succeeds
    }

    fn is_locked(&self) -> bool {
        self.locked
    }
}

impl DeviceMemory for FakeDevice {
    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn is_mnemonic_passphrase_enabled(&self) -> bool {
        false
    }
}

impl UserInterface for FakeDevice {
    fn enter_secret(&mut self, title: &str, out: &mut Password) {
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

impl FactoryReset for FakeDevice {
    fn reset_to_factory(&mut self) {
        self.events.push(Event::FactoryReset);
    }
}
