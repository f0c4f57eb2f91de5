//! Media backend: the player element the UI binds to.
//!
//! Decoding is left to an external player process. The backend only starts
//! and stops that process and keeps a clock so it can report progress and
//! notice when an episode has ended.

use std::process::Stdio;
use std::time::Instant;

use tokio::process::{Child, Command};

/// Events the element reports back, mirroring a browser media element
#[derive(Clone, Debug, PartialEq)]
pub enum MediaEvent {
    LoadedMetadata { duration: u64 },
    Play,
    Pause,
    /// Current position in seconds of load `load_id`
    TimeUpdate { load_id: u64, seconds: f64 },
    Ended { load_id: u64 },
    Error(String),
}

/// A media element the player view drives.
///
/// Calls never block. State changes queue events that `poll_events` hands
/// out, the way a browser element dispatches them after the call returns.
pub trait MediaElement: Send {
    fn load(&mut self, url: &str, duration: u64);
    fn unload(&mut self);
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, seconds: f64);
    fn set_looping(&mut self, looping: bool);
    fn current_time(&self) -> f64;
    fn duration(&self) -> u64;
    fn is_paused(&self) -> bool;
    fn source(&self) -> Option<&str>;
    /// Bumped by every `load` and `unload`. Position and end events carry
    /// the id of the load they belong to.
    fn load_id(&self) -> u64;
    fn poll_events(&mut self) -> Vec<MediaEvent>;
}

/// Position clock: where playback was at `last_update` and whether it is
/// advancing since then.
#[derive(Clone, Debug)]
pub struct MediaClock {
    pub position: f64,
    pub last_update: Instant,
    pub running: bool,
}

impl Default for MediaClock {
    fn default() -> Self {
        Self {
            position: 0.0,
            last_update: Instant::now(),
            running: false,
        }
    }
}

impl MediaClock {
    pub fn position_at(&self, now: Instant, duration: u64) -> f64 {
        let position = if self.running {
            self.position + now.saturating_duration_since(self.last_update).as_secs_f64()
        } else {
            self.position
        };
        if duration > 0 {
            position.min(duration as f64)
        } else {
            position
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.last_update = now;
        self.running = true;
    }

    pub fn stop(&mut self, now: Instant, duration: u64) {
        self.position = self.position_at(now, duration);
        self.last_update = now;
        self.running = false;
    }

    pub fn set_position(&mut self, position: f64, now: Instant) {
        self.position = position.max(0.0);
        self.last_update = now;
    }
}

pub struct AudioBackend {
    command: Vec<String>,
    source: Option<String>,
    duration: u64,
    looping: bool,
    clock: MediaClock,
    child: Option<Child>,
    pending: Vec<MediaEvent>,
    last_reported_second: Option<u64>,
    load_id: u64,
}

impl AudioBackend {
    /// `command` is the player program and its arguments. An empty command
    /// plays silently, advancing only the clock.
    pub fn new(command: Vec<String>) -> Self {
        if command.is_empty() {
            tracing::info!("Audio backend running headless");
        } else {
            tracing::info!(program = %command[0], "Audio backend using external player");
        }
        Self {
            command,
            source: None,
            duration: 0,
            looping: false,
            clock: MediaClock::default(),
            child: None,
            pending: Vec::new(),
            last_reported_second: None,
            load_id: 0,
        }
    }

    pub fn headless() -> Self {
        Self::new(Vec::new())
    }

    fn player_args(&self, url: &str, start: f64) -> Vec<String> {
        let start = format!("{:.0}", start.floor());
        let mut has_url = false;
        let mut args: Vec<String> = self.command[1..]
            .iter()
            .map(|arg| {
                if arg.contains("{url}") {
                    has_url = true;
                }
                arg.replace("{start}", &start).replace("{url}", url)
            })
            .collect();
        if !has_url {
            args.push(url.to_string());
        }
        args
    }

    fn spawn_player(&mut self, start: f64) -> bool {
        self.kill_player();

        let (Some(program), Some(url)) = (self.command.first().cloned(), self.source.clone()) else {
            return true;
        };
        let args = self.player_args(&url, start);

        match Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => {
                tracing::debug!(program = %program, start, "Player process started");
                self.child = Some(child);
                true
            }
            Err(e) => {
                tracing::error!(program = %program, error = %e, "Failed to start player process");
                self.pending
                    .push(MediaEvent::Error(format!("Cannot start {}: {}", program, e)));
                false
            }
        }
    }

    fn kill_player(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.start_kill() {
                tracing::warn!(error = %e, "Failed to stop player process");
            }
        }
    }

    /// Returns Some(success) once the player process has exited
    fn player_exit(&mut self) -> Option<Result<(), String>> {
        let child = self.child.as_mut()?;
        match child.try_wait() {
            Ok(Some(status)) => {
                self.child = None;
                if status.success() {
                    Some(Ok(()))
                } else {
                    Some(Err(format!("Player exited with {}", status)))
                }
            }
            Ok(None) => None,
            Err(e) => {
                self.child = None;
                Some(Err(format!("Lost player process: {}", e)))
            }
        }
    }

    fn halt(&mut self, now: Instant) {
        self.clock.stop(now, self.duration);
        self.kill_player();
    }

    fn handle_end(&mut self, now: Instant) {
        if self.looping {
            tracing::debug!("Episode finished, looping");
            self.clock.set_position(0.0, now);
            self.last_reported_second = None;
            self.pending.push(MediaEvent::TimeUpdate { load_id: self.load_id, seconds: 0.0 });
            if !self.spawn_player(0.0) {
                self.halt(now);
                self.pending.push(MediaEvent::Pause);
            }
        } else {
            tracing::debug!("Episode finished");
            self.halt(now);
            self.clock.set_position(self.duration as f64, now);
            self.pending.push(MediaEvent::Pause);
            self.pending.push(MediaEvent::Ended { load_id: self.load_id });
        }
    }
}

impl MediaElement for AudioBackend {
    fn load(&mut self, url: &str, duration: u64) {
        let now = Instant::now();
        self.halt(now);
        self.source = Some(url.to_string());
        self.load_id += 1;
        self.duration = duration;
        self.clock = MediaClock::default();
        self.last_reported_second = None;
        tracing::info!(url, duration, "Media loaded");
        self.pending.push(MediaEvent::LoadedMetadata { duration });
    }

    fn unload(&mut self) {
        self.halt(Instant::now());
        self.source = None;
        self.load_id += 1;
        self.duration = 0;
        self.clock = MediaClock::default();
        self.last_reported_second = None;
        self.pending.clear();
        tracing::debug!("Media unloaded");
    }

    fn play(&mut self) {
        if self.source.is_none() || self.clock.running {
            return;
        }
        let now = Instant::now();
        if self.duration > 0 && self.clock.position_at(now, self.duration) >= self.duration as f64 {
            self.clock.set_position(0.0, now);
        }
        let start = self.clock.position;
        if self.spawn_player(start) {
            self.clock.start(now);
            self.pending.push(MediaEvent::Play);
        }
    }

    fn pause(&mut self) {
        if !self.clock.running {
            return;
        }
        self.halt(Instant::now());
        self.pending.push(MediaEvent::Pause);
    }

    fn seek(&mut self, seconds: f64) {
        if self.source.is_none() {
            return;
        }
        let now = Instant::now();
        let target = if self.duration > 0 {
            seconds.clamp(0.0, self.duration as f64)
        } else {
            seconds.max(0.0)
        };
        self.clock.set_position(target, now);
        self.last_reported_second = Some(target.floor() as u64);
        if self.clock.running && !self.spawn_player(target) {
            self.halt(now);
            self.pending.push(MediaEvent::Pause);
        }
        self.pending.push(MediaEvent::TimeUpdate {
            load_id: self.load_id,
            seconds: target,
        });
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    fn current_time(&self) -> f64 {
        self.clock.position_at(Instant::now(), self.duration)
    }

    fn duration(&self) -> u64 {
        self.duration
    }

    fn is_paused(&self) -> bool {
        !self.clock.running
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn load_id(&self) -> u64 {
        self.load_id
    }

    fn poll_events(&mut self) -> Vec<MediaEvent> {
        if self.clock.running {
            let now = Instant::now();
            let position = self.clock.position_at(now, self.duration);

            match self.player_exit() {
                Some(Ok(())) => self.handle_end(now),
                Some(Err(message)) => {
                    tracing::error!(error = %message, "Player process failed");
                    self.halt(now);
                    self.pending.push(MediaEvent::Pause);
                    self.pending.push(MediaEvent::Error(message));
                }
                None => {
                    let second = position.floor() as u64;
                    if self.last_reported_second != Some(second) {
                        self.last_reported_second = Some(second);
                        self.pending.push(MediaEvent::TimeUpdate {
                            load_id: self.load_id,
                            seconds: position,
                        });
                    }
                    if self.duration > 0 && position >= self.duration as f64 {
                        self.handle_end(now);
                    }
                }
            }
        }
        std::mem::take(&mut self.pending)
    }
}

impl Drop for AudioBackend {
    fn drop(&mut self) {
        self.kill_player();
    }
}
