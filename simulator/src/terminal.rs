//! Terminal front end: hidden prompts, status screens, padlock frames.

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use bulwark_secrets::Password;
use bulwark_workflow::{LockImage, UserInterface};
use tracing::{debug, error};
use zeroize::Zeroizing;

const PADLOCK_LOCKED: &str = r"
      .-----.
     / .---. \
     | |   | |
   .-'-'---'-'-.
   |    ___    |
   |   (___)   |
   |    | |    |
   '-----------'
";

const PADLOCK_UNLOCKED: &str = r"
      .-----.
     / .---. \
     | |   | |
     | |   '-'
   .-'-'-------.
   |    ___    |
   |   (___)   |
   |    | |    |
   '-----------'
";

/// Whether the keyboard behind a [`UserInterface`] has gone away.
///
/// Once closed, every prompt leaves its buffer empty.
pub trait InputStatus {
    fn input_closed(&self) -> bool;
}

/// Screen and keyboard of the simulated device.
#[derive(Debug, Default)]
pub struct TerminalUi {
    closed: bool,
}

impl TerminalUi {
    pub const fn new() -> Self {
        Self { closed: false }
    }
}

impl InputStatus for TerminalUi {
    fn input_closed(&self) -> bool {
        self.closed
    }
}

/// Titles are laid out for the device screen; fold them onto one line.
fn one_line(title: &str) -> String {
    title.replace('\n', " ")
}

impl UserInterface for TerminalUi {
    fn enter_secret(&mut self, title: &str, out: &mut Password) {
        out.clear();
        if self.closed {
            return;
        }
        match rpassword::prompt_password(format!("{}: ", one_line(title))) {
            Ok(input) => {
                let input = Zeroizing::new(input);
                out.set(&input);
            }
            Err(e) => {
                error!("terminal input closed: {e}");
                self.closed = true;
            }
        }
    }

    fn show_status(&mut self, message: &str, dismiss_is_final: bool) {
        let mut stdout = io::stdout().lock();
        let hint = if dismiss_is_final { "done" } else { "continue" };
        if let Err(e) = write!(stdout, "\n  {}\n  [Enter to {hint}] ", one_line(message)) {
            debug!("status write failed: {e}");
        }
        if let Err(e) = stdout.flush() {
            debug!("status flush failed: {e}");
        }
        drop(stdout);

        if self.closed {
            return;
        }

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => self.closed = true,
            Ok(_) => {}
            Err(e) => debug!("status dismissal read failed: {e}"),
        }
    }

    fn pop_all_screens(&mut self) {
        debug!("screen stack cleared");
        println!();
    }

    fn draw_image(&mut self, image: LockImage) {
        let frame = match image {
            LockImage::Locked => PADLOCK_LOCKED,
            LockImage::Unlocked => PADLOCK_UNLOCKED,
        };
        println!("{frame}");
    }

    fn delay(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}
