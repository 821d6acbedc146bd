use std::time::{Duration, Instant};

/// Misuse of a [`Chronolog`]. These indicate a programming error, not bad data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChronologError {
    #[error("chronolog was not started")]
    NotStarted,

    #[error("chronolog was already stopped")]
    AlreadyStopped,
}

/// Wall-clock stopwatch used to report how long catalog loads take.
///
/// ```
/// use mamematic_core::Chronolog;
///
/// let mut chrono = Chronolog::started();
/// let elapsed = chrono.stop().unwrap();
/// assert_eq!(chrono.elapsed().unwrap(), elapsed);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Chronolog {
    started: Option<Instant>,
    stopped: Option<Instant>,
}

impl Chronolog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a chronolog that is already running.
    pub fn started() -> Self {
        let mut chrono = Self::new();
        chrono.start();
        chrono
    }

    /// Start (or restart) timing. Clears any previous stop time.
    pub fn start(&mut self) -> &mut Self {
        self.started = Some(Instant::now());
        self.stopped = None;
        self
    }

    /// Stop timing and return the elapsed duration.
    ///
    /// Fails if the chronolog was never started or has already been stopped.
    pub fn stop(&mut self) -> Result<Duration, ChronologError> {
        if self.started.is_none() {
            return Err(ChronologError::NotStarted);
        }
        if self.stopped.is_some() {
            return Err(ChronologError::AlreadyStopped);
        }
        self.stopped = Some(Instant::now());
        self.elapsed()
    }

    /// Time between start and stop, or between start and now while running.
    pub fn elapsed(&self) -> Result<Duration, ChronologError> {
        let started = self.started.ok_or(ChronologError::NotStarted)?;
        Ok(match self.stopped {
            Some(stopped) => stopped.duration_since(started),
            None => started.elapsed(),
        })
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some() && self.stopped.is_none()
    }
}
