use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use tracing::debug;

pub enum Input {
    Line(String),
    Closed,
}

/// Lines from stdin, read on a helper thread so the session loop never
/// blocks on the terminal.
pub struct InputPump {
    rx: Receiver<String>,
}

impl InputPump {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
            debug!("stdin closed");
        });
        Self { rx }
    }

    pub fn try_next(&self) -> Option<Input> {
        match self.rx.try_recv() {
            Ok(line) => Some(Input::Line(line)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Input::Closed),
        }
    }

    pub fn next_blocking(&self) -> Input {
        match self.rx.recv() {
            Ok(line) => Input::Line(line),
            Err(_) => Input::Closed,
        }
    }
}
