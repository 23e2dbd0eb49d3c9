use std::sync::{Arc, Mutex, PoisonError};

use journey_core::model::{ProgressState, Route, Snapshot, Waypoint};
use storage::repository::{ProgressRecord, ProgressRepository, Storage};

use crate::Clock;
use crate::error::JourneyServiceError;
use crate::view::JourneyView;

/// Progress-tracking facade that hides the repository and time source from
/// the presentation layer.
///
/// The service owns:
/// - the time source (`Clock`)
/// - the route table
/// - the current in-memory progress, recomputed on every step update
/// - repository access for durability
///
/// It does **not** own UI formatting. There is a single logical writer (the
/// sensor feed); the internal lock exists only because the service is shared
/// via `Arc` between the feed and presentation reads.
#[derive(Clone)]
pub struct JourneyService {
    clock: Clock,
    route: Arc<Route>,
    state: Arc<Mutex<ProgressState>>,
    progress_store: Arc<dyn ProgressRepository>,
}

impl JourneyService {
    #[must_use]
    pub fn new(clock: Clock, route: Route, progress_store: Arc<dyn ProgressRepository>) -> Self {
        Self {
            clock,
            route: Arc::new(route),
            state: Arc::new(Mutex::new(ProgressState::start())),
            progress_store,
        }
    }

    /// Service over the built-in route and an in-memory store.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::new(clock, Route::fellowship(), Storage::in_memory().progress)
    }

    #[must_use]
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// The full ordered waypoint table.
    #[must_use]
    pub fn waypoints(&self) -> &[Waypoint] {
        self.route.waypoints()
    }

    /// Load persisted progress and install it as the current state.
    ///
    /// Missing values default to the start of the journey; a corrupted
    /// out-of-range index resolves to the first waypoint in the returned
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns `JourneyServiceError::Storage` on repository failures.
    pub async fn load(&self) -> Result<Snapshot, JourneyServiceError> {
        let state = self.progress_store.load().await?.into_state();
        *self.lock_state() = state;
        Ok(state.snapshot(&self.route))
    }

    /// Set the absolute cumulative step count and persist the result.
    ///
    /// The in-memory state is swapped before the save so presentation reads
    /// never wait on I/O; the call itself completes only once the record is
    /// durable. Smaller totals are accepted and move the waypoint index
    /// backward.
    ///
    /// # Errors
    ///
    /// Returns `JourneyServiceError::Storage` when the save fails; the
    /// in-memory state keeps the new value either way.
    pub async fn record_steps(&self, total_steps: u32) -> Result<Snapshot, JourneyServiceError> {
        let next = ProgressState::at_steps(&self.route, total_steps);
        *self.lock_state() = next;

        self.progress_store
            .save(&ProgressRecord::from_state(&next))
            .await?;

        Ok(next.snapshot(&self.route))
    }

    /// Synchronous read of the current progress.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.lock_state().snapshot(&self.route)
    }

    /// The waypoint after the current one, or `None` at the end of the route.
    #[must_use]
    pub fn next_waypoint(&self) -> Option<&Waypoint> {
        let state = *self.lock_state();
        state.next_waypoint(&self.route)
    }

    /// Presentation view of the current progress, stamped with the clock.
    #[must_use]
    pub fn view(&self, session_steps: u32) -> JourneyView {
        JourneyView::from_snapshot(session_steps, &self.snapshot(), self.clock.now())
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, ProgressState> {
        // ProgressState is a small Copy value, so a poisoned lock still holds
        // a coherent state; recover it instead of propagating the panic.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
