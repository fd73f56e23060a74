//! Alert runtime: the executor and report channel shared by sessions.
//!
//! ```text
//!  Session ──spawn──▶ ┌───────────────────────────────────────┐
//!                     │ edge_executor::LocalExecutor          │
//!                     │  dispatch task ──▶ per-contact tasks  │
//!                     └──────────────┬────────────────────────┘
//!                                    │ DispatchReport
//!                                    ▼
//!                     embassy_sync Channel ──▶ owner drains between chunks
//!                       (+ overflow queue)
//! ```
//!
//! Finished tasks never wait on the channel: a report that finds it full
//! goes to an overflow queue, and receiving refills the channel from that
//! queue, so reports always come out in completion order.
//!
//! The runtime is created once by the owner and outlives every session, so
//! a transport disconnect never cancels an alert that is already in flight.

use core::cell::{Cell, RefCell};
use core::future::Future;
use std::collections::VecDeque;
use std::rc::Rc;

use edge_executor::LocalExecutor;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use futures_lite::future::block_on;
use log::debug;
use serde::Serialize;

use super::{AlertRequest, DispatchSummary};
use crate::app::ports::AlertPort;
use crate::error::DispatchError;

/// Single-threaded executor running dispatch and per-contact tasks.
pub type AlertExecutor = LocalExecutor<'static>;

/// Report channel depth.  Reports beyond it wait in the overflow queue.
const REPORT_DEPTH: usize = 8;

type ReportChannel = Channel<NoopRawMutex, DispatchReport, REPORT_DEPTH>;

/// Channel plus overflow.  Every queued report is older than every
/// overflowed one.
struct ReportQueue {
    channel: ReportChannel,
    overflow: RefCell<VecDeque<DispatchReport>>,
}

impl ReportQueue {
    fn new() -> Self {
        Self {
            channel: Channel::new(),
            overflow: RefCell::new(VecDeque::new()),
        }
    }

    /// Never blocks.
    fn push(&self, report: DispatchReport) {
        let mut overflow = self.overflow.borrow_mut();
        if !overflow.is_empty() {
            overflow.push_back(report);
            return;
        }
        if let Err(TrySendError::Full(report)) = self.channel.try_send(report) {
            debug!("RUNTIME: report channel full, queueing overflow");
            overflow.push_back(report);
        }
    }

    fn try_pop(&self) -> Option<DispatchReport> {
        let next = self
            .channel
            .try_receive()
            .ok()
            .or_else(|| self.overflow.borrow_mut().pop_front());
        self.refill();
        next
    }

    async fn pop(&self) -> DispatchReport {
        let next = self.channel.receive().await;
        self.refill();
        next
    }

    fn refill(&self) {
        let mut overflow = self.overflow.borrow_mut();
        while let Some(report) = overflow.pop_front() {
            if let Err(TrySendError::Full(report)) = self.channel.try_send(report) {
                overflow.push_front(report);
                break;
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.channel.is_empty() && self.overflow.borrow().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlertTrigger {
    /// Raised by the emergency state machine.
    Automatic { incident: u32 },
    /// Requested explicitly by the user.
    Manual,
}

/// Completed dispatch, delivered through the side channel.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchReport {
    pub trigger: AlertTrigger,
    pub outcome: Result<DispatchSummary, DispatchError>,
}

#[derive(Clone)]
pub struct AlertRuntime {
    executor: Rc<AlertExecutor>,
    reports: Rc<ReportQueue>,
    in_flight: Rc<Cell<usize>>,
}

impl AlertRuntime {
    pub fn new() -> Self {
        Self {
            executor: Rc::new(LocalExecutor::new()),
            reports: Rc::new(ReportQueue::new()),
            in_flight: Rc::new(Cell::new(0)),
        }
    }

    pub fn executor(&self) -> Rc<AlertExecutor> {
        Rc::clone(&self.executor)
    }

    /// Start a dispatch without waiting for it.  The outcome arrives later
    /// as a [`DispatchReport`].
    pub fn spawn_dispatch<D>(&self, dispatcher: Rc<D>, trigger: AlertTrigger, request: AlertRequest)
    where
        D: AlertPort + 'static,
    {
        self.in_flight.set(self.in_flight.get() + 1);
        let reports = Rc::clone(&self.reports);
        let in_flight = Rc::clone(&self.in_flight);
        self.executor
            .spawn(async move {
                let outcome = dispatcher.dispatch(request).await;
                reports.push(DispatchReport { trigger, outcome });
                in_flight.set(in_flight.get() - 1);
            })
            .detach();
        debug!("RUNTIME: dispatch spawned ({:?})", trigger);
    }

    /// Run every task that can make progress right now.
    pub fn run_pending(&self) {
        while self.executor.try_tick() {}
    }

    /// Next finished report, if any.
    pub fn try_report(&self) -> Option<DispatchReport> {
        self.reports.try_pop()
    }

    /// Dispatches spawned but not yet reported.
    pub fn in_flight(&self) -> usize {
        self.in_flight.get()
    }

    /// Block until every in-flight dispatch has reported, returning the
    /// reports in completion order.
    pub fn settle(&self) -> Vec<DispatchReport> {
        let reports = Rc::clone(&self.reports);
        let in_flight = Rc::clone(&self.in_flight);
        self.block_on(async move {
            let mut out = Vec::new();
            while in_flight.get() > 0 || !reports.is_empty() {
                match reports.try_pop() {
                    Some(report) => out.push(report),
                    None => out.push(reports.pop().await),
                }
            }
            out
        })
    }

    /// Drive the executor until `fut` completes.
    pub fn block_on<T: 'static>(&self, fut: impl Future<Output = T> + 'static) -> T {
        block_on(self.executor.run(fut))
    }
}

impl Default for AlertRuntime {
    fn default() -> Self {
        Self::new()
    }
}
