//! Long-running job tracking for report generation.
//!
//! The backend runs budgeting generation and plan-fact analysis as long
//! jobs; the client starts one, then polls its status with a countdown.
//! This module is the state machine only - the host event loop owns the
//! actual timers and HTTP calls and feeds results in (`tick_second`,
//! `observe_status`), the same way the viewer host feeds DOM events.
//!
//! Phases: `Idle → Starting → Running → (Finished | TimedOut)`, re-armed
//! only by a fresh start.

use wasm_bindgen::prelude::*;

use crate::api::JobStatusResponse;

/// Which backend job this poller tracks.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Budgeting,
    PlanFact,
}

/// Client-side lifecycle of one job kind.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    Idle,
    Starting,
    Running,
    Finished,
    TimedOut,
}

/// Poller timing and terminal-status configuration.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Countdown armed for a budgeting generation job, in seconds.
    pub budgeting_countdown_secs: u32,
    /// Countdown armed for a plan-fact analysis job, in seconds.
    pub plan_fact_countdown_secs: u32,
    /// How often the host should refetch job status, in seconds.
    pub status_poll_interval_secs: u32,
    /// Case-insensitive substrings that mark a status text as terminal.
    pub terminal_markers: Vec<String>,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            budgeting_countdown_secs: 600,
            plan_fact_countdown_secs: 300,
            status_poll_interval_secs: 15,
            terminal_markers: ["завершено", "готово", "completed", "done", "ready", "finished"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

impl PollerConfig {
    fn countdown_for(&self, kind: JobKind) -> u32 {
        match kind {
            JobKind::Budgeting => self.budgeting_countdown_secs,
            JobKind::PlanFact => self.plan_fact_countdown_secs,
        }
    }

    /// Whether a status text semantically means "job finished".
    pub fn is_terminal_status(&self, status: &str) -> bool {
        let lower = status.to_lowercase();
        self.terminal_markers
            .iter()
            .any(|marker| lower.contains(marker.as_str()))
    }
}

/// Sans-IO polling state machine for one job kind.
///
/// Only one `Running` job per kind exists client-side; the UI disables its
/// start affordance while `Starting` or `Running`. The backend's own
/// concurrency rules are opaque - this merely mirrors the last reported
/// status.
#[wasm_bindgen]
pub struct JobPoller {
    kind: JobKind,
    config: PollerConfig,
    phase: JobPhase,
    remaining_secs: u32,
    last_status: Option<JobStatusResponse>,
    final_refresh_pending: bool,
}

#[wasm_bindgen]
impl JobPoller {
    #[wasm_bindgen(constructor)]
    pub fn new(kind: JobKind) -> Self {
        Self::with_config(kind, PollerConfig::default())
    }

    pub fn kind(&self) -> JobKind {
        self.kind
    }

    pub fn phase(&self) -> JobPhase {
        self.phase
    }

    /// Seconds left on the countdown (0 outside `Running`).
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Whether the host's countdown and status-refresh timers should run.
    pub fn timers_active(&self) -> bool {
        self.phase == JobPhase::Running
    }

    pub fn poll_interval_secs(&self) -> u32 {
        self.config.status_poll_interval_secs
    }

    /// Last server-reported status text, if any poll has landed.
    pub fn status_text(&self) -> Option<String> {
        self.last_status.as_ref().map(|s| s.status.clone())
    }

    /// Last server-reported running flag.
    pub fn is_job_running(&self) -> bool {
        self.last_status.as_ref().is_some_and(|s| s.is_running)
    }

    /// Begin a start request. Returns false (no-op) while a start is in
    /// flight or a job is running; otherwise resets the previous job's
    /// status and enters `Starting`.
    pub fn start_requested(&mut self) -> bool {
        if matches!(self.phase, JobPhase::Starting | JobPhase::Running) {
            return false;
        }
        self.phase = JobPhase::Starting;
        self.remaining_secs = 0;
        self.last_status = None;
        self.final_refresh_pending = false;
        true
    }

    /// The start request succeeded: arm the countdown and begin polling.
    pub fn start_succeeded(&mut self) {
        if self.phase != JobPhase::Starting {
            return;
        }
        self.phase = JobPhase::Running;
        self.remaining_secs = self.config.countdown_for(self.kind);
    }

    /// The start request failed: surface and allow immediate retry.
    pub fn start_failed(&mut self) {
        if self.phase == JobPhase::Starting {
            self.phase = JobPhase::Idle;
        }
    }

    /// Feed one status poll (or manual refresh) result into the machine.
    pub fn observe_status(&mut self, is_running: bool, status: &str) {
        self.apply_status(&JobStatusResponse {
            is_running,
            status: status.to_string(),
        });
    }

    /// One countdown tick. At zero the job times out and exactly one final
    /// forced status refetch is requested; timers never re-arm.
    pub fn tick_second(&mut self) {
        if self.phase != JobPhase::Running {
            return;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.phase = JobPhase::TimedOut;
            self.final_refresh_pending = true;
        }
    }

    /// Take the one-shot "forced refetch" request after a timeout.
    pub fn take_final_refresh(&mut self) -> bool {
        std::mem::take(&mut self.final_refresh_pending)
    }

    /// Drop all job state back to `Idle`.
    pub fn reset(&mut self) {
        self.phase = JobPhase::Idle;
        self.remaining_secs = 0;
        self.last_status = None;
        self.final_refresh_pending = false;
    }
}

impl JobPoller {
    /// Construct with explicit timing/marker configuration (tests, hosts
    /// with their own deployment language).
    pub fn with_config(kind: JobKind, config: PollerConfig) -> Self {
        Self {
            kind,
            config,
            phase: JobPhase::Idle,
            remaining_secs: 0,
            last_status: None,
            final_refresh_pending: false,
        }
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Reconcile a status response. While `Running`, a terminal status text
    /// or a cleared running flag finishes the job and stops both timers.
    /// In any other phase the status is recorded but nothing transitions -
    /// poll failures simply never call this, retaining the previous status.
    pub fn apply_status(&mut self, status: &JobStatusResponse) {
        let terminal =
            self.config.is_terminal_status(&status.status) || !status.is_running;
        self.last_status = Some(status.clone());

        if self.phase == JobPhase::Running && terminal {
            self.phase = JobPhase::Finished;
            self.remaining_secs = 0;
        }
    }
}
