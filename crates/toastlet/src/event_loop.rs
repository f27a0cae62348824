#![forbid(unsafe_code)]

//! The driver's clock, timer queue and frame queue.

use std::time::Duration;

use toastlet_core::timer::{FrameQueue, TimerHandle, TimerQueue, Timestamp};

use crate::lifecycle::{Context, FlagReset, FrameTask, Input};
use crate::registry::ToastId;
use crate::render::Environment;

/// A timer payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Task {
    EnterSettled,
    AutoClose,
    ExitSettled,
    FlagReset(FlagReset),
}

impl Task {
    pub(crate) const fn input(self) -> Input {
        match self {
            Self::EnterSettled => Input::EnterSettled,
            Self::AutoClose => Input::AutoCloseElapsed,
            Self::ExitSettled => Input::ExitSettled,
            Self::FlagReset(kind) => Input::FlagReset(kind),
        }
    }
}

impl FrameTask {
    pub(crate) const fn input(self) -> Input {
        match self {
            Self::Enter => Input::EnterFrame,
            Self::RestoreTransition => Input::RestoreTransitionFrame,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct EventLoop {
    pub(crate) now: Timestamp,
    pub(crate) env: Environment,
    /// The mount root is gone, so every element is out of the document.
    pub(crate) root_removed: bool,
    pub(crate) timers: TimerQueue<(ToastId, Task)>,
    pub(crate) frames: FrameQueue<(ToastId, FrameTask)>,
}

impl EventLoop {
    pub(crate) fn context(&self) -> Context {
        Context {
            now: self.now,
            env: self.env,
        }
    }

    pub(crate) fn schedule(&mut self, id: ToastId, task: Task, delay: Duration) -> TimerHandle {
        self.timers.schedule(self.now + delay, (id, task))
    }

    pub(crate) fn request_frame(&mut self, id: ToastId, task: FrameTask) -> bool {
        self.frames.request((id, task))
    }

    pub(crate) fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.timers.cancel(handle).is_some()
    }

    /// Drop every pending timer and frame of `id`.
    pub(crate) fn cancel_all(&mut self, id: ToastId) -> usize {
        self.frames.cancel_where(|(owner, _)| *owner == id);
        self.timers.cancel_where(|(owner, _)| *owner == id)
    }

    /// Pending timers owned by `id`.
    pub(crate) fn pending_for(&self, id: ToastId) -> usize {
        self.timers.pending().filter(|(_, (owner, _))| *owner == id).count()
    }
}
