//! Report Orchestrator: the session state machine deciding which report is
//! active, driving the single-flight request lifecycle, and collapsing all
//! request-path failures into the one dismissible error slot.

use std::time::Duration;

use uuid::Uuid;

use crate::capabilities::{GeoError, Geolocator, KeyValueStore, ModelEndpoint};
use crate::contracts;
use crate::error::{AppError, Device, Result};
use crate::history::HistoryStore;
use crate::models::{
    DiagnosticInput, DiagnosticReport, HistoryEntry, MediaAttachment, ServiceKind,
    ServiceSearchReport, TireAnalysisReport, VehicleInfo,
};
use crate::request;

const GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Exactly one view is active at a time; showing one report kind always
/// clears the other two.
#[derive(Debug, Clone, Default)]
pub enum ActiveView {
    #[default]
    Form,
    Diagnostic(DiagnosticReport),
    Tire(TireAnalysisReport),
    Services(ServiceSearchReport),
}

/// Explicit session state. Transitions are plain methods of (state, event),
/// so the lifecycle is unit-testable without any rendering environment or
/// live endpoint.
#[derive(Debug, Default)]
pub struct SessionState {
    view: ActiveView,
    loading: bool,
    error: Option<String>,
    needs_key_reselection: bool,
    /// Bumped on every request start and on reset; a completion carrying a
    /// stale generation token is discarded instead of overwriting state.
    generation: u64,
}

impl SessionState {
    pub fn view(&self) -> &ActiveView {
        &self.view
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True when the surfaced error calls for the credential-reselection
    /// remediation flow in addition to the banner.
    pub fn needs_key_reselection(&self) -> bool {
        self.needs_key_reselection
    }

    /// Single-flight gate: starting a request while one is outstanding is
    /// rejected. Returns the generation token the completion must present.
    pub fn begin_request(&mut self) -> Result<u64> {
        if self.loading {
            return Err(AppError::Validation(
                "A request is already in progress.".to_string(),
            ));
        }
        self.loading = true;
        self.error = None;
        self.needs_key_reselection = false;
        self.generation += 1;
        Ok(self.generation)
    }

    /// Successful completion. A stale token (reset or a newer request has
    /// moved the generation) is a no-op.
    pub fn complete(&mut self, token: u64, view: ActiveView) {
        if token != self.generation {
            return;
        }
        self.loading = false;
        self.view = view;
    }

    /// Failed completion: loading is always cleared, the error is surfaced
    /// in the single dismissible slot, and the form view returns. Stale
    /// tokens are discarded.
    pub fn fail(&mut self, token: u64, error: &AppError) {
        if token != self.generation {
            return;
        }
        self.loading = false;
        self.view = ActiveView::Form;
        self.error = Some(error.to_string());
        self.needs_key_reselection = error.needs_key_reselection();
    }

    /// Surface a local validation failure without touching the view or the
    /// loading flag; entered form state is preserved.
    pub fn reject(&mut self, error: &AppError) {
        self.error = Some(error.to_string());
        self.needs_key_reselection = false;
    }

    /// Display a history entry directly, without a network call.
    pub fn show_entry(&mut self, entry: HistoryEntry) {
        self.view = match entry {
            HistoryEntry::Diagnostic(report) => ActiveView::Diagnostic(report),
            HistoryEntry::Tire(report) => ActiveView::Tire(report),
        };
    }

    /// Back to the idle form: clears all report slots and any error, and
    /// invalidates any completion still in flight.
    pub fn reset(&mut self) {
        self.view = ActiveView::Form;
        self.loading = false;
        self.error = None;
        self.needs_key_reselection = false;
        self.generation += 1;
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
        self.needs_key_reselection = false;
    }
}

/// Facade wiring the orchestrator to its capabilities: model endpoint,
/// geolocator, and history storage.
pub struct Session {
    endpoint: Box<dyn ModelEndpoint>,
    geolocator: Box<dyn Geolocator>,
    history: HistoryStore,
    state: SessionState,
}

impl Session {
    pub fn new(
        endpoint: Box<dyn ModelEndpoint>,
        geolocator: Box<dyn Geolocator>,
        storage: Box<dyn KeyValueStore>,
    ) -> Self {
        Self {
            endpoint,
            geolocator,
            history: HistoryStore::load(storage),
            state: SessionState::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.history.entries()
    }

    /// Submit a full diagnostic request. The validation gate runs before
    /// anything is built or sent; a validation failure never enters Loading.
    pub fn diagnose(&mut self, vehicle: &VehicleInfo, input: &DiagnosticInput) -> Result<()> {
        let built = match request::build_diagnostic(vehicle, input) {
            Ok(built) => built,
            Err(err) => {
                self.state.reject(&err);
                return Err(err);
            }
        };
        let token = self.state.begin_request()?;
        let outcome = self
            .endpoint
            .generate(&built)
            .and_then(|response| contracts::parse_diagnostic(&response.text, vehicle));
        match outcome {
            Ok(report) => {
                self.state.complete(token, ActiveView::Diagnostic(report));
                Ok(())
            }
            Err(err) => {
                self.state.fail(token, &err);
                Err(err)
            }
        }
    }

    /// Submit a tire scan for a single image attachment.
    pub fn scan_tire(&mut self, image: &MediaAttachment) -> Result<()> {
        let built = match request::build_tire_scan(image) {
            Ok(built) => built,
            Err(err) => {
                self.state.reject(&err);
                return Err(err);
            }
        };
        let token = self.state.begin_request()?;
        let outcome = self
            .endpoint
            .generate(&built)
            .and_then(|response| contracts::parse_tire_analysis(&response.text));
        match outcome {
            Ok(report) => {
                self.state.complete(token, ActiveView::Tire(report));
                Ok(())
            }
            Err(err) => {
                self.state.fail(token, &err);
                Err(err)
            }
        }
    }

    /// Find nearby services. A single position fix (bounded wait) is
    /// resolved first; timeout or denial routes to the error path without
    /// attempting the model call.
    pub fn find_services(&mut self, kind: ServiceKind) -> Result<()> {
        let token = self.state.begin_request()?;
        let position = match self.geolocator.locate(GEOLOCATION_TIMEOUT) {
            Ok(position) => position,
            Err(geo) => {
                let err = classify_geo(geo);
                self.state.fail(token, &err);
                return Err(err);
            }
        };
        let built = request::build_service_search(kind, position);
        match self.endpoint.generate(&built) {
            Ok(response) => {
                let report =
                    contracts::build_service_report(kind, &response.text, &response.grounding_chunks);
                self.state.complete(token, ActiveView::Services(report));
                Ok(())
            }
            Err(err) => {
                self.state.fail(token, &err);
                Err(err)
            }
        }
    }

    /// Re-display a past report from history without a network call.
    pub fn select_history_entry(&mut self, id: Uuid) -> Result<()> {
        let entry = self
            .history
            .find(id)
            .cloned()
            .ok_or_else(|| AppError::Unknown("History entry not found.".to_string()))?;
        self.state.show_entry(entry);
        Ok(())
    }

    /// Persist the currently displayed report. Copy-on-save: the historical
    /// copy is independent of the displayed one. Service reports are
    /// location-bound and never persisted.
    pub fn save_active_report(&mut self) -> Result<()> {
        let entry = match self.state.view() {
            ActiveView::Diagnostic(report) => HistoryEntry::Diagnostic(report.clone()),
            ActiveView::Tire(report) => HistoryEntry::Tire(report.clone()),
            ActiveView::Form | ActiveView::Services(_) => {
                return Err(AppError::Validation(
                    "No report to save.".to_string(),
                ));
            }
        };
        self.history
            .save(entry)
            .map_err(|err| AppError::Unknown(err.to_string()))
    }

    pub fn clear_history(&mut self, confirmed: bool) -> Result<()> {
        self.history
            .clear(confirmed)
            .map_err(|err| AppError::Unknown(err.to_string()))
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    pub fn dismiss_error(&mut self) {
        self.state.dismiss_error();
    }
}

fn classify_geo(error: GeoError) -> AppError {
    match error {
        GeoError::Unsupported => {
            AppError::Unknown("Geolocation is not supported by your browser.".to_string())
        }
        GeoError::Denied => AppError::Permission(Device::Geolocation),
        GeoError::Timeout => {
            AppError::Transport("Location request timed out. Please try again.".to_string())
        }
    }
}
