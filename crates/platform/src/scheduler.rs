//! Cooperative periodic task scheduler
//!
//! Subsystems register named periodic tasks and receive an opaque
//! [`TaskHandle`]. The controller's main loop asks the scheduler which task
//! is due and dispatches it to the subsystem that owns the handle, so task
//! state lives in ordinary owned structs instead of global callbacks.
//!
//! ```text
//! loop {
//!     while let Some(handle) = tasks.poll(Instant::now()) {
//!         status.run(handle, park.state());
//!         // ... other subsystems
//!     }
//!     tasks.sleep_until_next().await;
//! }
//! ```
//!
//! All tasks run to completion on one execution context; nothing here is
//! preemptive.

use core::num::NonZeroU8;

use embassy_time::{Duration, Instant, Timer};
use heapless::Vec;
use thiserror_no_std::Error;

/// Opaque handle identifying a registered task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskHandle(NonZeroU8);

impl TaskHandle {
    /// Raw handle value (never zero).
    pub fn get(self) -> u8 {
        self.0.get()
    }
}

/// Dispatch priority tier.
///
/// When several tasks are due at once, a lower number runs first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Priority(pub u8);

/// Scheduler errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerError {
    /// No free slot for another task
    #[error("task table is full")]
    TableFull,
    /// A task with the same name is already registered
    #[error("a task with this name is already registered")]
    DuplicateName,
    /// The handle does not refer to a registered task
    #[error("unknown task handle")]
    UnknownHandle,
}

/// Register, remove and reconfigure periodic tasks.
pub trait TaskScheduler {
    /// Register a periodic task.
    ///
    /// A zero `period` means "run on every scheduler pass".
    fn add(
        &mut self,
        period: Duration,
        priority: Priority,
        name: &'static str,
    ) -> Result<TaskHandle, SchedulerError>;

    /// Deregister a task. Its handle becomes invalid.
    fn remove(&mut self, handle: TaskHandle) -> Result<(), SchedulerError>;

    /// Look up a task by the name it was registered with.
    fn handle_by_name(&self, name: &str) -> Option<TaskHandle>;

    /// Change a task's interval. The task becomes due on the next pass.
    fn set_period(&mut self, handle: TaskHandle, period: Duration) -> Result<(), SchedulerError>;
}

struct TaskEntry {
    handle: TaskHandle,
    name: &'static str,
    period: Duration,
    priority: Priority,
    /// `None` until the first dispatch (or after a period change).
    next_due: Option<Instant>,
    /// Dispatch sequence number of the last run; breaks ties round-robin.
    last_run: u64,
}

/// Fixed-capacity task table with up to `N` tasks.
pub struct TaskTable<const N: usize> {
    tasks: Vec<TaskEntry, N>,
    next_handle: u8,
    dispatches: u64,
}

impl<const N: usize> TaskTable<N> {
    /// Create an empty table.
    pub const fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_handle: 1,
            dispatches: 0,
        }
    }

    /// Number of registered tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// `true` when no task is registered.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Current interval of a task.
    pub fn period(&self, handle: TaskHandle) -> Option<Duration> {
        self.entry(handle).map(|t| t.period)
    }

    /// Priority tier of a task.
    pub fn priority(&self, handle: TaskHandle) -> Option<Priority> {
        self.entry(handle).map(|t| t.priority)
    }

    /// Return the task that should run at `now`, re-arming it for
    /// `now + period`.
    ///
    /// Among due tasks the lowest priority number wins; ties go to the task
    /// that ran least recently. Returns `None` when nothing is due.
    pub fn poll(&mut self, now: Instant) -> Option<TaskHandle> {
        let entry = self
            .tasks
            .iter_mut()
            .filter(|t| t.next_due.map_or(true, |due| due <= now))
            .min_by_key(|t| (t.priority, t.last_run))?;

        self.dispatches = self.dispatches.wrapping_add(1);
        entry.last_run = self.dispatches;
        entry.next_due = Some(now.checked_add(entry.period).unwrap_or(Instant::MAX));
        Some(entry.handle)
    }

    /// Earliest instant at which some task becomes due.
    pub fn next_due(&self) -> Option<Instant> {
        self.tasks
            .iter()
            .map(|t| t.next_due.unwrap_or(Instant::MIN))
            .min()
    }

    /// Sleep until the next task is due. Returns immediately when a task is
    /// already due; pends forever on an empty table.
    pub async fn sleep_until_next(&self) {
        match self.next_due() {
            Some(at) => Timer::at(at).await,
            None => core::future::pending::<()>().await,
        }
    }

    fn entry(&self, handle: TaskHandle) -> Option<&TaskEntry> {
        self.tasks.iter().find(|t| t.handle == handle)
    }

    fn allocate_handle(&mut self) -> Option<TaskHandle> {
        for _ in 0..u8::MAX {
            let candidate = NonZeroU8::new(self.next_handle).map(TaskHandle);
            self.next_handle = match self.next_handle.wrapping_add(1) {
                0 => 1,
                n => n,
            };
            if let Some(handle) = candidate {
                if self.entry(handle).is_none() {
                    return Some(handle);
                }
            }
        }
        None
    }
}

impl<const N: usize> Default for TaskTable<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TaskScheduler for TaskTable<N> {
    fn add(
        &mut self,
        period: Duration,
        priority: Priority,
        name: &'static str,
    ) -> Result<TaskHandle, SchedulerError> {
        if self.handle_by_name(name).is_some() {
            return Err(SchedulerError::DuplicateName);
        }
        if self.tasks.is_full() {
            return Err(SchedulerError::TableFull);
        }
        let handle = self.allocate_handle().ok_or(SchedulerError::TableFull)?;
        self.tasks
            .push(TaskEntry {
                handle,
                name,
                period,
                priority,
                next_due: None,
                last_run: 0,
            })
            .map_err(|_| SchedulerError::TableFull)?;
        Ok(handle)
    }

    fn remove(&mut self, handle: TaskHandle) -> Result<(), SchedulerError> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.handle == handle)
            .ok_or(SchedulerError::UnknownHandle)?;
        self.tasks.remove(index);
        Ok(())
    }

    fn handle_by_name(&self, name: &str) -> Option<TaskHandle> {
        self.tasks.iter().find(|t| t.name == name).map(|t| t.handle)
    }

    fn set_period(&mut self, handle: TaskHandle, period: Duration) -> Result<(), SchedulerError> {
        let entry = self
            .tasks
            .iter_mut()
            .find(|t| t.handle == handle)
            .ok_or(SchedulerError::UnknownHandle)?;
        entry.period = period;
        entry.next_due = None;
        Ok(())
    }
}
