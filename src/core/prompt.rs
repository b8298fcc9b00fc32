//! Interactive line input.
//!
//! [`Prompter`] is the seam between coordinators and the terminal. A read
//! reports [`TaskflowError::Interrupted`] when Ctrl-C was pressed or stdin is
//! exhausted; callers decide whether that ends the session or only the
//! current sub-menu.

use crate::core::error::{Result, TaskflowError};
use colored::*;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::{Mutex, OnceLock};
use std::thread;
use std::time::Duration;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// How often a waiting prompt checks the interrupt flag
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// `Ok(None)` marks the end of stdin
type LineResult = io::Result<Option<String>>;

static STDIN_LINES: OnceLock<Mutex<Receiver<LineResult>>> = OnceLock::new();

/// Routes Ctrl-C into the interrupt flag instead of killing the process
pub fn install_interrupt_handler() -> Result<()> {
    ctrlc::set_handler(|| {
        INTERRUPTED.store(true, Ordering::SeqCst);
        println!();
    })
    .map_err(|e| TaskflowError::Io(io::Error::other(e.to_string())))
}

/// Reads stdin on a background thread so a prompt can give up on Ctrl-C
/// while the read is still blocked.
fn stdin_lines() -> &'static Mutex<Receiver<LineResult>> {
    STDIN_LINES.get_or_init(|| {
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            let stdin = io::stdin();
            loop {
                let mut line = String::new();
                let message = match stdin.lock().read_line(&mut line) {
                    Ok(0) => Ok(None),
                    Ok(_) => Ok(Some(line)),
                    Err(e) => Err(e),
                };
                let done = !matches!(message, Ok(Some(_)));
                if sender.send(message).is_err() || done {
                    break;
                }
            }
        });
        Mutex::new(receiver)
    })
}

/// Waits for the next line or an interrupt. A flag left over from before
/// the prompt was shown is discarded.
fn wait_for_line(lines: &Receiver<LineResult>, interrupted: &AtomicBool) -> Result<String> {
    interrupted.store(false, Ordering::SeqCst);
    loop {
        if interrupted.swap(false, Ordering::SeqCst) {
            return Err(TaskflowError::Interrupted);
        }
        match lines.recv_timeout(POLL_INTERVAL) {
            Ok(Ok(Some(line))) => return Ok(line.trim().to_string()),
            Ok(Ok(None)) | Err(RecvTimeoutError::Disconnected) => {
                return Err(TaskflowError::Interrupted)
            }
            Ok(Err(e)) => return Err(e.into()),
            Err(RecvTimeoutError::Timeout) => continue,
        }
    }
}

pub trait Prompter {
    /// Shows `message` and returns the trimmed line the user typed
    fn ask(&self, message: &str) -> Result<String>;
}

pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn ask(&self, message: &str) -> Result<String> {
        print!("{} ", message.blue());
        io::stdout().flush()?;

        let lines = stdin_lines()
            .lock()
            .map_err(|_| TaskflowError::Io(io::Error::other("stdin reader lock poisoned")))?;
        wait_for_line(&lines, &INTERRUPTED)
    }
}

/// Replays a fixed list of answers; running out of answers reads as an
/// interrupt, like a closed stdin.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: RefCell<VecDeque<String>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: RefCell::new(answers.into_iter().map(Into::into).collect()),
            asked: RefCell::new(Vec::new()),
        }
    }

    /// Messages shown so far, in order
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }

    pub fn remaining(&self) -> usize {
        self.answers.borrow().len()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&self, message: &str) -> Result<String> {
        self.asked.borrow_mut().push(message.to_string());
        self.answers
            .borrow_mut()
            .pop_front()
            .map(|answer| answer.trim().to_string())
            .ok_or(TaskflowError::Interrupted)
    }
}

/// Accepted spellings of "yes"
pub fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "s" | "si" | "sí"
    )
}
