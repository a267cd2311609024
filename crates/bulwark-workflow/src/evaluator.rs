//! Single unlock attempt: ask the store, tell the user, report a verdict.
//!
//! The evaluator never loops. Retrying is the orchestrator's decision;
//! the attempt counter is the store's.

use bulwark_secrets::Password;
use tracing::{debug, warn};

use crate::device::{AttemptOutcome, Device};
use crate::error::Fatal;
use crate::status::{status_message_for, DEVICE_RESET};

/// What the orchestrator should do after one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Password accepted; continue with the seed unlock.
    Unlocked,
    /// Password rejected; the user has been told how many tries remain.
    Retry,
    /// Attempts exhausted; the factory reset flow has been started.
    Reset,
}

/// Submit `password` to the store and handle the user-facing side of the
/// outcome.
///
/// | Store outcome | Side effect | Verdict |
/// |---|---|---|
/// | `Ok` | none | [`Verdict::Unlocked`] |
/// | `WrongPassword` | "Wrong password" status with remaining tries | [`Verdict::Retry`] |
/// | `AttemptsExhausted` | "Device reset" status, then factory reset | [`Verdict::Reset`] |
///
/// # Errors
///
/// Returns [`Fatal::UnexpectedStoreResponse`] for any other store response.
pub fn unlock_and_handle_error<D: Device + ?Sized>(
    device: &mut D,
    password: &Password,
) -> Result<Verdict, Fatal> {
    match device.verify_password(password) {
        AttemptOutcome::Ok => {
            debug!("password accepted");
            Ok(Verdict::Unlocked)
        }
        AttemptOutcome::WrongPassword { remaining_attempts } => {
            warn!(remaining_attempts, "wrong password");
            let msg = status_message_for(remaining_attempts);
            device.show_status(msg.as_str(), false);
            Ok(Verdict::Retry)
        }
        AttemptOutcome::AttemptsExhausted => {
            warn!("unlock attempts exhausted, resetting device");
            device.show_status(DEVICE_RESET, false);
            device.reset_to_factory();
            Ok(Verdict::Reset)
        }
        AttemptOutcome::Fault { code } => Err(Fatal::UnexpectedStoreResponse { code }),
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{Event, FakeDevice};

    fn password() -> Password {
        Password::from_text("hunter2")
    }

    #[test]
    fn ok_outcome_unlocks_silently() {
        let mut device = FakeDevice::locked(&[AttemptOutcome::Ok]);
        let verdict = unlock_and_handle_error(&mut device, &password()).unwrap();
        assert_eq!(verdict, Verdict::Unlocked);
        assert_eq!(device.events, vec![Event::Verify("hunter2".into())]);
    }

    #[test]
    fn one_remaining_attempt_uses_singular_message() {
        let mut device = FakeDevice::locked(&[AttemptOutcome::WrongPassword {
            remaining_attempts: 1,
        }]);
        let verdict = unlock_and_handle_error(&mut device, &password()).unwrap();
        assert_eq!(verdict, Verdict::Retry);
        assert_eq!(
            device.statuses(),
            vec!["Wrong password\n1 try remains".to_string()]
        );
        assert_eq!(device.resets(), 0);
    }

    #[test]
    fn several_remaining_attempts_use_plural_message() {
        let mut device = FakeDevice::locked(&[AttemptOutcome::WrongPassword {
            remaining_attempts: 7,
        }]);
        let verdict = unlock_and_handle_error(&mut device, &password()).unwrap();
        assert_eq!(verdict, Verdict::Retry);
        assert_eq!(
            device.statuses(),
            vec!["Wrong password\n7 tries remain".to_string()]
        );
    }

    #[test]
    fn exhausted_attempts_show_reset_and_start_factory_flow_once() {
        let mut device = FakeDevice::locked(&[AttemptOutcome::AttemptsExhausted]);
        let verdict = unlock_and_handle_error(&mut device, &password()).unwrap();
        assert_eq!(verdict, Verdict::Reset);
        assert_eq!(device.statuses(), vec!["Device reset".to_string()]);
        assert_eq!(device.resets(), 1);
        // The status comes before the reset flow takes over the screen.
        assert_eq!(
            &device.events[1..],
            &[Event::Status("Device reset".into()), Event::FactoryReset]
        );
    }

    #[test]
    fn unknown_store_response_is_fatal() {
        let mut device = FakeDevice::locked(&[AttemptOutcome::Fault { code: -3 }]);
        let err = unlock_and_handle_error(&mut device, &password()).unwrap_err();
        assert_eq!(err, Fatal::UnexpectedStoreResponse { code: -3 });
        assert!(device.statuses().is_empty());
        assert_eq!(device.resets(), 0);
    }
}
