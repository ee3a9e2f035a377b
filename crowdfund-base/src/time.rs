// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Clocks and deadline arithmetic.

#[cfg(with_testing)]
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use crate::data_types::Timestamp;

/// The label shown instead of a day count once a campaign's deadline has passed.
pub const CAMPAIGN_CLOSED: &str = "Campaign Closed";

/// The number of milliseconds in a day.
pub const MILLIS_PER_DAY: u64 = 24 * 3600 * 1000;

/// A source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn current_time(&self) -> Timestamp;
}

/// A `Clock` implementation using the system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct WallClock;

impl Clock for WallClock {
    fn current_time(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock implementation that uses a stored number of milliseconds and that can be updated
/// explicitly. All clones share the same time, and setting it in one clone updates all the others.
#[cfg(with_testing)]
#[derive(Clone, Debug, Default)]
pub struct TestClock(Arc<AtomicU64>);

#[cfg(with_testing)]
impl Clock for TestClock {
    fn current_time(&self) -> Timestamp {
        Timestamp::from(self.0.load(Ordering::SeqCst))
    }
}

#[cfg(with_testing)]
impl TestClock {
    /// Creates a new clock with its time set to 0, i.e. the Unix epoch.
    pub fn new() -> Self {
        TestClock::default()
    }

    /// Sets the current time.
    pub fn set(&self, time: Timestamp) {
        self.0.store(time.millis(), Ordering::SeqCst);
    }

    /// Advances the current time by the specified number of milliseconds.
    pub fn add_millis(&self, millis: u64) {
        self.0.fetch_add(millis, Ordering::SeqCst);
    }
}

/// Returns the number of days left until `deadline`, as a label.
///
/// Partial days count as a full day, so an open campaign never shows "0". Once
/// `deadline <= now`, returns [`CAMPAIGN_CLOSED`].
pub fn days_left(deadline: Timestamp, now: Timestamp) -> String {
    if deadline <= now {
        return CAMPAIGN_CLOSED.to_string();
    }
    deadline.millis_since(now).div_ceil(MILLIS_PER_DAY).to_string()
}

/// Same as [`days_left`], reading the current time from `clock`.
pub fn days_left_with(clock: &impl Clock, deadline: Timestamp) -> String {
    days_left(deadline, clock.current_time())
}
