use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicU64, Ordering},
};
use tracing::debug;

use crate::{
    error::{ErrorKind, GeolocateError, LookupError},
    model::{Coordinate, DISPLAY_PERIODS, ForecastMeta, ForecastPeriod},
    port::MapPort,
    source::ForecastSource,
};

/// Error as it appears in workflow state: a coarse kind for styling plus the
/// rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowError {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&LookupError> for WorkflowError {
    fn from(error: &LookupError) -> Self {
        Self { kind: error.kind(), message: error.to_string() }
    }
}

impl From<&GeolocateError> for WorkflowError {
    fn from(error: &GeolocateError) -> Self {
        Self { kind: error.kind(), message: error.to_string() }
    }
}

/// Which leg of the lifecycle a snapshot is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Error,
}

/// Snapshot of the lookup lifecycle.
///
/// Loading, error and success are mutually exclusive in every reachable
/// snapshot; [`WorkflowState::phase`] names the one that holds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkflowState {
    pub loading: bool,
    pub error: Option<WorkflowError>,
    pub success: bool,
    pub meta: Option<ForecastMeta>,
    pub periods: Vec<ForecastPeriod>,
}

/// Lifecycle events a run feeds into the state machine.
#[derive(Debug, Clone)]
pub enum WorkflowEvent {
    /// A new run began: wipe the previous outcome and show progress.
    Started,
    /// The lookup finished. `periods` is the full sequence; display
    /// truncation happens in the transition.
    Succeeded { meta: ForecastMeta, periods: Vec<ForecastPeriod> },
    /// The run failed at some stage.
    Failed(WorkflowError),
}

impl WorkflowState {
    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Error
        } else if self.success {
            Phase::Success
        } else {
            Phase::Idle
        }
    }

    /// Pure transition: the current snapshot plus one event yields the next
    /// snapshot.
    pub fn apply(&self, event: &WorkflowEvent) -> WorkflowState {
        match event {
            WorkflowEvent::Started => {
                WorkflowState { loading: true, ..WorkflowState::default() }
            }
            WorkflowEvent::Succeeded { meta, periods } => WorkflowState {
                loading: false,
                error: None,
                success: true,
                meta: Some(meta.clone()),
                periods: periods.iter().take(DISPLAY_PERIODS).cloned().collect(),
            },
            WorkflowEvent::Failed(error) => WorkflowState {
                loading: false,
                error: Some(error.clone()),
                success: false,
                meta: None,
                periods: Vec::new(),
            },
        }
    }

    /// Error snapshot for a geolocation attempt that failed before any
    /// lookup could start.
    pub fn from_geolocate_error(error: &GeolocateError) -> WorkflowState {
        WorkflowState::default().apply(&WorkflowEvent::Failed(error.into()))
    }
}

/// Drives coordinate lookups against a [`ForecastSource`] and owns the
/// resulting [`WorkflowState`].
///
/// Runs may overlap. Each run takes a token when it starts and only the most
/// recently started run may write; terminal events from superseded runs are
/// discarded, so the state always reflects the newest request.
pub struct ForecastWorkflow {
    source: Arc<dyn ForecastSource>,
    map: Option<Arc<dyn MapPort>>,
    state: Mutex<WorkflowState>,
    runs: AtomicU64,
}

impl ForecastWorkflow {
    pub fn new(source: Arc<dyn ForecastSource>) -> Self {
        Self {
            source,
            map: None,
            state: Mutex::new(WorkflowState::default()),
            runs: AtomicU64::new(0),
        }
    }

    /// Attach a map view to keep in sync with lookups.
    pub fn with_map(mut self, map: Arc<dyn MapPort>) -> Self {
        self.map = Some(map);
        self
    }

    /// Current snapshot.
    pub fn state(&self) -> WorkflowState {
        self.lock_state().clone()
    }

    /// Run the full pipeline for a raw coordinate pair.
    ///
    /// Validation comes first; an invalid pair fails without touching the
    /// network or the map. A valid pair recenters the map immediately,
    /// whatever the lookup later returns. Returns the snapshot after this
    /// run's terminal event, or the current snapshot if a newer run
    /// superseded this one.
    pub async fn run(&self, latitude: f64, longitude: f64) -> WorkflowState {
        let token = self.runs.fetch_add(1, Ordering::SeqCst) + 1;
        self.store(token, WorkflowEvent::Started);

        let position = match Coordinate::new(latitude, longitude) {
            Ok(position) => position,
            Err(error) => {
                debug!(latitude, longitude, "rejected coordinate pair");
                return self.store(token, WorkflowEvent::Failed((&error).into()));
            }
        };

        if let Some(map) = &self.map {
            map.set_center(position);
            map.set_marker(position);
        }

        let event = match self.lookup(position).await {
            Ok((meta, periods)) => WorkflowEvent::Succeeded { meta, periods },
            Err(error) => WorkflowEvent::Failed((&error).into()),
        };

        self.store(token, event)
    }

    async fn lookup(
        &self,
        position: Coordinate,
    ) -> Result<(ForecastMeta, Vec<ForecastPeriod>), LookupError> {
        let grid = self.source.resolve_grid(position).await?;
        let periods = self.source.fetch_forecast(&grid).await?;
        let meta = ForecastMeta::new(&grid, periods.len());

        Ok((meta, periods))
    }

    /// Apply `event` unless a newer run has started since `token` was taken.
    fn store(&self, token: u64, event: WorkflowEvent) -> WorkflowState {
        let mut state = self.lock_state();

        if self.runs.load(Ordering::SeqCst) == token {
            *state = state.apply(&event);
        } else {
            debug!(token, "discarding event from a superseded run");
        }

        state.clone()
    }

    fn lock_state(&self) -> MutexGuard<'_, WorkflowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
