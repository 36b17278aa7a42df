//! Deadline-based timers that collapse bursts of change signals.
//!
//! Nothing here sleeps or spawns. Every timer is a deadline; the host drives
//! time by calling [`Coalescer::poll`] with the current instant, and may use
//! [`Coalescer::next_deadline`] to decide when to wake up next.
//!
//! # Timers
//!
//! - rescan: a plain debounce; a burst of requests yields one rescan
//!   [`RESCAN_DEBOUNCE`] after the last request.
//! - search and history updates: immediate-plus-trailing; the caller runs the
//!   update right away and one trailing update follows the last request.
//! - periodic check: a fixed interval re-checking preview surfaces.
//! - switch retry: one replaceable deferred re-resolution after a surface
//!   switch.
//! - load retries: one replaceable deferred re-resolution per surface after a
//!   search preview finished loading.

use std::time::Duration;

use indexmap::IndexMap;
use margin_dom::{EditorState, NodeId};
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;
use web_time::Instant;

/// Quiet period before a requested rescan runs.
pub const RESCAN_DEBOUNCE: Duration = Duration::from_millis(150);

/// Delay of the trailing search preview update.
pub const SEARCH_TRAILING: Duration = Duration::from_millis(300);

/// Delay of the trailing history preview update.
pub const HISTORY_TRAILING: Duration = Duration::from_millis(300);

/// Period of the preview surface re-check.
pub const PERIODIC_INTERVAL: Duration = Duration::from_millis(800);

/// Delay before re-resolving a search preview after it loaded.
pub const LOAD_RETRY_DELAY: Duration = Duration::from_millis(200);

/// Delay before re-resolving a surface after a switch.
pub const SWITCH_RETRY_DELAY: Duration = Duration::from_millis(300);

/// Fires once, `delay` after the most recent request.
#[derive(Debug, Clone)]
pub struct Debounce {
	delay: Duration,
	deadline: Option<Instant>,
}

impl Debounce {
	pub fn new(delay: Duration) -> Self {
		Self {
			delay,
			deadline: None,
		}
	}

	/// Pushes the deadline to `now + delay`.
	pub fn request(&mut self, now: Instant) {
		self.deadline = Some(now + self.delay);
	}

	/// Returns true once when the deadline has passed, disarming the timer.
	pub fn poll(&mut self, now: Instant) -> bool {
		match self.deadline {
			Some(deadline) if deadline <= now => {
				self.deadline = None;
				true
			}
			_ => false,
		}
	}

	pub fn cancel(&mut self) {
		self.deadline = None;
	}

	pub fn is_pending(&self) -> bool {
		self.deadline.is_some()
	}

	pub fn deadline(&self) -> Option<Instant> {
		self.deadline
	}
}

/// Runs immediately, then once more after the burst settles.
///
/// [`Trailing::trigger`] only arms the trailing run; the caller performs the
/// immediate run itself. [`Trailing::poll`] reports the trailing run.
#[derive(Debug, Clone)]
pub struct Trailing {
	trailing: Debounce,
}

impl Trailing {
	pub fn new(delay: Duration) -> Self {
		Self {
			trailing: Debounce::new(delay),
		}
	}

	/// Replaces any pending trailing run with one at `now + delay`.
	pub fn trigger(&mut self, now: Instant) {
		self.trailing.request(now);
	}

	/// Returns true once when the trailing run is due.
	pub fn poll(&mut self, now: Instant) -> bool {
		self.trailing.poll(now)
	}

	pub fn cancel(&mut self) {
		self.trailing.cancel();
	}

	pub fn deadline(&self) -> Option<Instant> {
		self.trailing.deadline()
	}
}

/// Fires every `period` while running. Missed periods collapse into one firing.
#[derive(Debug, Clone)]
pub struct Interval {
	period: Duration,
	next: Option<Instant>,
}

impl Interval {
	pub fn new(period: Duration) -> Self {
		Self { period, next: None }
	}

	/// Starts the interval; a running interval keeps its phase.
	pub fn start(&mut self, now: Instant) {
		if self.next.is_none() {
			self.next = Some(now + self.period);
		}
	}

	pub fn stop(&mut self) {
		self.next = None;
	}

	pub fn is_running(&self) -> bool {
		self.next.is_some()
	}

	pub fn poll(&mut self, now: Instant) -> bool {
		match self.next {
			Some(next) if next <= now => {
				self.next = Some(now + self.period);
				true
			}
			_ => false,
		}
	}

	pub fn deadline(&self) -> Option<Instant> {
		self.next
	}
}

/// Surface to re-resolve when a retry fires, with the editor state delivered
/// by the event that scheduled it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryTarget {
	pub surface: NodeId,
	pub editor: Option<EditorState>,
}

/// Work that became due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Due {
	Rescan,
	SearchUpdate,
	HistoryUpdate,
	PeriodicCheck,
	SwitchRetry(RetryTarget),
	LoadRetry(RetryTarget),
}

/// Every timer the engine owns.
#[derive(Debug)]
pub struct Coalescer {
	rescan: Debounce,
	search: Trailing,
	history: Trailing,
	periodic: Interval,
	switch_retry: Option<(Instant, RetryTarget)>,
	load_retries: IndexMap<NodeId, (Instant, RetryTarget), FxBuildHasher>,
}

impl Default for Coalescer {
	fn default() -> Self {
		Self::new()
	}
}

impl Coalescer {
	pub fn new() -> Self {
		Self {
			rescan: Debounce::new(RESCAN_DEBOUNCE),
			search: Trailing::new(SEARCH_TRAILING),
			history: Trailing::new(HISTORY_TRAILING),
			periodic: Interval::new(PERIODIC_INTERVAL),
			switch_retry: None,
			load_retries: IndexMap::default(),
		}
	}

	pub fn request_rescan(&mut self, now: Instant) {
		self.rescan.request(now);
	}

	/// Arms the trailing search update; the caller runs the immediate one.
	pub fn request_search_update(&mut self, now: Instant) {
		self.search.trigger(now);
	}

	/// Arms the trailing history update; the caller runs the immediate one.
	pub fn request_history_update(&mut self, now: Instant) {
		self.history.trigger(now);
	}

	pub fn start_periodic(&mut self, now: Instant) {
		self.periodic.start(now);
	}

	/// Replaces any pending switch retry.
	pub fn schedule_switch_retry(&mut self, now: Instant, target: RetryTarget) {
		self.switch_retry = Some((now + SWITCH_RETRY_DELAY, target));
	}

	/// Replaces any pending load retry for the same surface.
	pub fn schedule_load_retry(&mut self, now: Instant, target: RetryTarget) {
		self.load_retries
			.insert(target.surface, (now + LOAD_RETRY_DELAY, target));
	}

	/// Collects every timer due at `now`, in a fixed order: rescan, search,
	/// history, periodic, switch retry, load retries.
	pub fn poll(&mut self, now: Instant) -> SmallVec<[Due; 4]> {
		let mut due = SmallVec::new();
		if self.rescan.poll(now) {
			due.push(Due::Rescan);
		}
		if self.search.poll(now) {
			due.push(Due::SearchUpdate);
		}
		if self.history.poll(now) {
			due.push(Due::HistoryUpdate);
		}
		if self.periodic.poll(now) {
			due.push(Due::PeriodicCheck);
		}
		if self.switch_retry.as_ref().is_some_and(|(at, _)| *at <= now)
			&& let Some((_, target)) = self.switch_retry.take()
		{
			due.push(Due::SwitchRetry(target));
		}
		let ready: SmallVec<[NodeId; 2]> = self
			.load_retries
			.iter()
			.filter(|(_, (at, _))| *at <= now)
			.map(|(&surface, _)| surface)
			.collect();
		for surface in ready {
			if let Some((_, target)) = self.load_retries.shift_remove(&surface) {
				due.push(Due::LoadRetry(target));
			}
		}
		due
	}

	/// Earliest pending deadline, if any timer is armed.
	pub fn next_deadline(&self) -> Option<Instant> {
		[
			self.rescan.deadline(),
			self.search.deadline(),
			self.history.deadline(),
			self.periodic.deadline(),
			self.switch_retry.as_ref().map(|(at, _)| *at),
		]
		.into_iter()
		.flatten()
		.chain(self.load_retries.values().map(|(at, _)| *at))
		.min()
	}

	/// Number of armed timers, the periodic check included.
	pub fn live_timers(&self) -> usize {
		[
			self.rescan.is_pending(),
			self.search.deadline().is_some(),
			self.history.deadline().is_some(),
			self.periodic.is_running(),
			self.switch_retry.is_some(),
		]
		.into_iter()
		.filter(|&armed| armed)
		.count()
			+ self.load_retries.len()
	}

	/// Disarms every timer, stopping the periodic check.
	pub fn cancel_all(&mut self) {
		self.rescan.cancel();
		self.search.cancel();
		self.history.cancel();
		self.periodic.stop();
		self.switch_retry = None;
		self.load_retries.clear();
	}
}

#[cfg(test)]
mod tests;
