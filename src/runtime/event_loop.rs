use std::thread;
use std::time::{Duration, Instant};

use crate::audio::Engine;
use crate::session::PlaybackSession;

/// A periodic task on the single-threaded loop.
///
/// Arming schedules the first run one interval from now; disarming drops the
/// schedule. A run that falls behind is rescheduled from the current time
/// rather than fired repeatedly to catch up.
#[derive(Debug, Clone)]
pub struct Repeating {
    interval: Duration,
    next_due: Option<Instant>,
}

impl Repeating {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// Arm if `active`, disarm otherwise. Already armed tasks keep their schedule.
    pub fn sync(&mut self, active: bool, now: Instant) {
        match (active, self.next_due) {
            (true, None) => self.next_due = Some(now + self.interval),
            (false, Some(_)) => self.next_due = None,
            _ => {}
        }
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.next_due
    }

    /// Whether the task should run at `now`; advances the schedule if so.
    pub fn fire(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }
        let next = due + self.interval;
        self.next_due = Some(if next <= now { now + self.interval } else { next });
        true
    }
}

/// Drive `session` until playback stops.
///
/// The position poll runs while the session is polling and the sleep timer
/// tick while the timer is armed. Once the poll has nothing left to do any
/// remaining sleep timer is cancelled and the loop returns.
pub fn run_session<E: Engine>(session: &mut PlaybackSession<E>, poll_every: Duration, tick_every: Duration) {
    let mut poll = Repeating::new(poll_every);
    let mut sleep_tick = Repeating::new(tick_every);

    loop {
        let now = Instant::now();
        poll.sync(session.is_polling(), now);
        sleep_tick.sync(session.sleep_timer().is_active(), now);

        if !poll.is_armed() {
            session.cancel_sleep_timer();
            break;
        }

        let next = [poll.deadline(), sleep_tick.deadline()]
            .into_iter()
            .flatten()
            .min();
        if let Some(deadline) = next {
            let now = Instant::now();
            if deadline > now {
                thread::sleep(deadline - now);
            }
        }

        let now = Instant::now();
        if poll.fire(now) {
            session.poll_position();
        }
        if sleep_tick.fire(now) {
            session.tick_sleep_timer();
        }
    }

    log::debug!("session loop finished in {:?}", session.state());
}
