//! Scheduler interface for invocation paths
//!
//! Invocation decoders only need two things from the scheduler: which core
//! the caller is running on, and a way to put the caller back on the run
//! queue once an invocation has succeeded.

use kite_cap::objects::irq::CoreId;

/// Thread scheduling state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ThreadState {
    /// Not schedulable.
    #[default]
    Inactive,
    /// Currently executing a system call.
    Running,
    /// Runnable; resumes after the system call returns.
    Restart,
}

impl ThreadState {
    #[inline]
    pub const fn is_runnable(self) -> bool {
        matches!(self, Self::Running | Self::Restart)
    }
}

/// The thread performing an invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Thread {
    core: CoreId,
    state: ThreadState,
}

impl Thread {
    /// A thread that has just trapped into the kernel on `core`.
    pub const fn running_on(core: CoreId) -> Self {
        Self {
            core,
            state: ThreadState::Running,
        }
    }

    #[inline]
    pub const fn core(&self) -> CoreId {
        self.core
    }

    #[inline]
    pub const fn state(&self) -> ThreadState {
        self.state
    }

    /// Make the caller runnable again once its invocation has completed.
    pub fn mark_runnable(&mut self) {
        self.state = ThreadState::Restart;
    }
}
