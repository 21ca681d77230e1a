//! Reminder scheduling
//!
//! Pending reminders live in a min-heap keyed by deadline. One worker task
//! sleeps until the earliest deadline and speaks everything due through
//! the Voice Response Port, concurrently with whatever the router is
//! doing. Nothing persists: reminders still pending at shutdown never
//! fire.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Days, Local, NaiveTime};
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::voice::VoiceResponse;
use crate::{Error, Result};

/// Accepted clock-time format, e.g. "10:30 AM"
const TIME_FORMAT: &str = "%I:%M %p";

/// Clock seam so tests can pin "now"
pub trait Clock: Send + Sync {
    /// Current local time
    fn now(&self) -> DateTime<Local>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A pending reminder, as reported by [`ReminderScheduler::pending`]
#[derive(Debug, Clone)]
pub struct ReminderInfo {
    /// Cancellation handle
    pub id: Uuid,
    /// What will be spoken (without the "Reminder:" prefix)
    pub message: String,
    /// Absolute deadline
    pub fire_at: DateTime<Local>,
}

/// Heap entry ordered soonest-first
struct Entry {
    fire_at: DateTime<Local>,
    id: Uuid,
    message: String,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at && self.id == other.id
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap pops the earliest deadline first
        other.fire_at.cmp(&self.fire_at)
    }
}

/// Schedules and fires spoken reminders
pub struct ReminderScheduler {
    pending: Arc<Mutex<BinaryHeap<Entry>>>,
    notify: Arc<Notify>,
    clock: Arc<dyn Clock>,
    worker: JoinHandle<()>,
}

impl ReminderScheduler {
    /// Create a scheduler speaking through `voice`, on the wall clock
    #[must_use]
    pub fn new(voice: Arc<dyn VoiceResponse>) -> Self {
        Self::with_clock(voice, Arc::new(SystemClock))
    }

    /// Create a scheduler with an explicit clock (tests use a fake)
    #[must_use]
    pub fn with_clock(voice: Arc<dyn VoiceResponse>, clock: Arc<dyn Clock>) -> Self {
        let pending = Arc::new(Mutex::new(BinaryHeap::new()));
        let notify = Arc::new(Notify::new());

        let worker = tokio::spawn(run_worker(
            Arc::clone(&pending),
            Arc::clone(&notify),
            Arc::clone(&clock),
            voice,
        ));

        Self {
            pending,
            notify,
            clock,
            worker,
        }
    }

    /// Parse `time_text` and register a reminder.
    ///
    /// A time-of-day at or before the current time rolls over to the next
    /// calendar day. Returns the reminder's id for cancellation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTimeFormat`] when `time_text` is not
    /// "H:MM AM/PM"
    pub async fn schedule(&self, message: &str, time_text: &str) -> Result<Uuid> {
        let time = parse_clock_time(time_text)?;
        let fire_at = next_occurrence(time, self.clock.now());
        let id = Uuid::new_v4();

        self.pending.lock().await.push(Entry {
            fire_at,
            id,
            message: message.to_string(),
        });
        self.notify.notify_one();

        tracing::info!(%id, fire_at = %fire_at, message, "reminder scheduled");
        Ok(id)
    }

    /// Outstanding reminders, soonest first
    pub async fn pending(&self) -> Vec<ReminderInfo> {
        let heap = self.pending.lock().await;
        let mut infos: Vec<ReminderInfo> = heap
            .iter()
            .map(|e| ReminderInfo {
                id: e.id,
                message: e.message.clone(),
                fire_at: e.fire_at,
            })
            .collect();
        infos.sort_by_key(|r| r.fire_at);
        infos
    }

    /// Remove a pending reminder. Returns whether it was found.
    pub async fn cancel(&self, id: Uuid) -> bool {
        let mut heap = self.pending.lock().await;
        let before = heap.len();

        let remaining: BinaryHeap<Entry> = heap.drain().filter(|e| e.id != id).collect();
        *heap = remaining;

        let removed = heap.len() < before;
        drop(heap);

        if removed {
            self.notify.notify_one();
            tracing::info!(%id, "reminder cancelled");
        }
        removed
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        // In-flight reminders are abandoned at shutdown, never fired
        self.worker.abort();
    }
}

/// Worker loop: sleep until the earliest deadline, then speak all due
/// reminders. A notify interrupts the sleep whenever the heap changes.
async fn run_worker(
    pending: Arc<Mutex<BinaryHeap<Entry>>>,
    notify: Arc<Notify>,
    clock: Arc<dyn Clock>,
    voice: Arc<dyn VoiceResponse>,
) {
    loop {
        let next_deadline = pending.lock().await.peek().map(|e| e.fire_at);

        let Some(deadline) = next_deadline else {
            notify.notified().await;
            continue;
        };

        let now = clock.now();
        if deadline > now {
            let wait = (deadline - now).to_std().unwrap_or(Duration::ZERO);
            tokio::select! {
                () = notify.notified() => continue,
                () = tokio::time::sleep(wait) => {}
            }
        }

        // The slept-for deadline has elapsed; drain everything due by it
        let due = {
            let mut heap = pending.lock().await;
            let mut due = Vec::new();
            while heap.peek().is_some_and(|e| e.fire_at <= deadline) {
                if let Some(entry) = heap.pop() {
                    due.push(entry);
                }
            }
            due
        };

        for entry in due {
            tracing::info!(id = %entry.id, message = %entry.message, "reminder firing");
            if let Err(e) = voice.speak(&format!("Reminder: {}", entry.message)).await {
                tracing::warn!(error = %e, "reminder speech failed");
            }
        }
    }
}

/// Parse a 12-hour "H:MM AM/PM" clock time (meridiem case-insensitive)
///
/// # Errors
///
/// Returns [`Error::InvalidTimeFormat`] on any mismatch
pub fn parse_clock_time(text: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(&text.trim().to_uppercase(), TIME_FORMAT)
        .map_err(|_| Error::InvalidTimeFormat(text.trim().to_string()))
}

/// Next occurrence of a time-of-day: today if still ahead, otherwise
/// rolled over by exactly one day
fn next_occurrence(time: NaiveTime, now: DateTime<Local>) -> DateTime<Local> {
    let mut date = now.date_naive();
    if time <= now.time() {
        date = date.checked_add_days(Days::new(1)).unwrap_or(date);
    }

    match date.and_time(time).and_local_timezone(Local) {
        chrono::LocalResult::Single(dt) | chrono::LocalResult::Ambiguous(dt, _) => dt,
        // Nonexistent local time (DST gap): approximate with one day out
        chrono::LocalResult::None => now + chrono::Duration::days(1),
    }
}
