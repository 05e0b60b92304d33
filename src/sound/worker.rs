use anyhow::Result;
use log::{debug, warn};
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use super::backend::AudioBackend;
use super::ladder::PlaybackLadder;
use crate::domain::settings::SoundRef;

#[derive(Debug, Clone)]
pub struct PlayRequest {
    pub sound: SoundRef,
    pub volume: i32,
}

/// Handle to the audio thread. Requests are played one after another; the
/// caller never waits on audio.
pub struct AudioHandle {
    tx: Option<Sender<PlayRequest>>,
    join: Option<JoinHandle<()>>,
}

impl AudioHandle {
    /// Start the audio thread. The ladder is built on that thread because
    /// output streams are tied to the thread that opened them.
    pub fn spawn<B, F>(build: F) -> Result<Self>
    where
        B: AudioBackend + 'static,
        F: FnOnce() -> PlaybackLadder<B> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<PlayRequest>();
        let join = thread::Builder::new()
            .name("notifyit-audio".into())
            .spawn(move || {
                let mut ladder = build();
                for req in rx {
                    let outcome = ladder.play(&req.sound, req.volume);
                    debug!("Alert sound {} -> {:?}", req.sound, outcome);
                }
                debug!("Audio thread exiting");
            })?;

        Ok(Self {
            tx: Some(tx),
            join: Some(join),
        })
    }

    pub fn play(&self, sound: SoundRef, volume: i32) {
        let Some(tx) = &self.tx else {
            return;
        };
        if let Err(e) = tx.send(PlayRequest { sound, volume }) {
            warn!("Audio thread is gone, dropping sound {}", e.0.sound);
        }
    }

    /// Let queued sounds finish, then stop the thread.
    pub fn shutdown(mut self) {
        self.tx.take();
        if let Some(join) = self.join.take() {
            if join.join().is_err() {
                warn!("Audio thread panicked");
            }
        }
    }
}

impl Drop for AudioHandle {
    fn drop(&mut self) {
        // Closing the channel lets the thread exit on its own.
        self.tx.take();
    }
}
