//! StageRun - state of one simulated processing run.
//!
//! Pure state machine; it holds no timers. The application-layer runner
//! calls `begin_next_stage`, `report_progress` and `complete_current_stage`
//! on each tick and forwards the returned updates.
//!
//! Overall progress is `round((i * 100 + stage_progress) / N)` for the
//! stage at index `i` of `N`. It is a plain average, so the curve is not
//! evenly spaced when `N` does not divide 100.

use serde::Serialize;

use super::events::StageRunUpdate;
use super::stage::{ProcessingStage, StageDescriptor, StageStatus};
use crate::domain::foundation::{
    DomainError, ErrorCode, Percentage, StageRunId, StateMachine,
};

/// Where a run is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    /// Stages are still being processed.
    Running,
    /// Every stage is complete; waiting out the settle delay.
    Settling,
    /// Completion has been signalled.
    Completed,
    /// Stopped early. Stage state is frozen as it was.
    Cancelled,
}

impl RunPhase {
    pub fn is_active(&self) -> bool {
        matches!(self, RunPhase::Running | RunPhase::Settling)
    }
}

/// Computes overall progress for `stage_progress` within stage `stage_index`.
pub fn overall_progress(stage_index: usize, stage_progress: Percentage, stage_count: usize) -> Percentage {
    if stage_count == 0 {
        return Percentage::ZERO;
    }
    let numerator = stage_index * 100 + usize::from(stage_progress.value());
    // round half up, matching the progress bar the dashboard shows
    let rounded = (numerator * 2 + stage_count) / (stage_count * 2);
    Percentage::new(rounded.min(100) as u8)
}

/// Stage progress values reported on successive ticks: 0, step, 2*step, ...
/// always ending at exactly 100.
///
/// # Errors
///
/// - `InvalidConfiguration` if `step` is 0 or above 100
pub fn progress_ticks(step: u8) -> Result<Vec<Percentage>, DomainError> {
    if step == 0 || step > 100 {
        return Err(DomainError::invalid_configuration(format!(
            "Progress step must be between 1 and 100, got {}",
            step
        )));
    }

    let mut ticks = vec![Percentage::ZERO];
    let mut current = Percentage::ZERO;
    while !current.is_full() {
        current = current.saturating_add(step);
        ticks.push(current);
    }
    Ok(ticks)
}

/// State of a processing run over a fixed, ordered list of stages.
///
/// # Invariants
///
/// - at most one stage is processing
/// - stages complete in declaration order
/// - a processing stage's progress never decreases
/// - `overall_progress` never decreases
#[derive(Debug, Clone, Serialize)]
pub struct StageRun {
    id: StageRunId,
    stages: Vec<ProcessingStage>,
    current_stage: Option<usize>,
    overall_progress: Percentage,
    phase: RunPhase,
}

impl StageRun {
    /// Creates a run with every stage pending.
    ///
    /// # Errors
    ///
    /// - `InvalidConfiguration` if `descriptors` is empty
    pub fn new(id: StageRunId, descriptors: Vec<StageDescriptor>) -> Result<Self, DomainError> {
        if descriptors.is_empty() {
            return Err(DomainError::invalid_configuration(
                "A stage run needs at least one stage",
            ));
        }

        Ok(Self {
            id,
            stages: descriptors.into_iter().map(ProcessingStage::pending).collect(),
            current_stage: None,
            overall_progress: Percentage::ZERO,
            phase: RunPhase::Running,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> StageRunId {
        self.id
    }

    pub fn stages(&self) -> &[ProcessingStage] {
        &self.stages
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Index of the stage currently processing.
    pub fn current_stage(&self) -> Option<usize> {
        self.current_stage
    }

    pub fn overall_progress(&self) -> Percentage {
        self.overall_progress
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn completed_count(&self) -> usize {
        self.stages.iter().filter(|s| s.status.is_complete()).count()
    }

    pub fn processing_count(&self) -> usize {
        self.stages.iter().filter(|s| s.status.is_processing()).count()
    }

    /// True once every stage is complete, whether or not completion
    /// has been signalled yet.
    pub fn all_stages_complete(&self) -> bool {
        self.completed_count() == self.stages.len()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// Moves the next pending stage to processing at 0%.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the run is not running, a stage is
    ///   already processing, or no stage is left
    pub fn begin_next_stage(&mut self) -> Result<StageRunUpdate, DomainError> {
        self.ensure_phase(RunPhase::Running)?;
        if self.current_stage.is_some() {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Another stage is still processing",
            ));
        }

        let index = self.completed_count();
        let stage = self.stages.get_mut(index).ok_or_else(|| {
            DomainError::new(ErrorCode::InvalidStateTransition, "No pending stage left")
        })?;

        stage.status = stage.status.transition_to(StageStatus::Processing)?;
        stage.progress = Percentage::ZERO;
        self.current_stage = Some(index);

        Ok(StageRunUpdate::StageStarted {
            stage_index: index,
            stage_id: stage.id().to_string(),
        })
    }

    /// Records new progress for the processing stage.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if no stage is processing or the value
    ///   is lower than the stage's current progress
    pub fn report_progress(&mut self, progress: Percentage) -> Result<StageRunUpdate, DomainError> {
        let index = self.require_current()?;
        let stage_count = self.stages.len();
        let stage = &mut self.stages[index];

        if progress < stage.progress {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Stage progress cannot go from {} back to {}",
                    stage.progress, progress
                ),
            ));
        }

        stage.progress = progress;
        self.overall_progress = overall_progress(index, progress, stage_count);

        Ok(StageRunUpdate::Progress {
            stage_index: index,
            stage_progress: progress,
            overall_progress: self.overall_progress,
        })
    }

    /// Marks the processing stage complete at 100%.
    ///
    /// When this completes the last stage the run starts settling.
    pub fn complete_current_stage(&mut self) -> Result<StageRunUpdate, DomainError> {
        let index = self.require_current()?;
        let stage_count = self.stages.len();
        let stage = &mut self.stages[index];

        stage.status = stage.status.transition_to(StageStatus::Complete)?;
        stage.progress = Percentage::HUNDRED;
        self.overall_progress = overall_progress(index, Percentage::HUNDRED, stage_count);
        self.current_stage = None;

        let update = StageRunUpdate::StageCompleted {
            stage_index: index,
            stage_id: stage.id().to_string(),
        };

        if self.all_stages_complete() {
            self.phase = RunPhase::Settling;
        }
        Ok(update)
    }

    /// Signals completion after the settle delay.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` unless the run is settling
    pub fn mark_completed(&mut self) -> Result<StageRunUpdate, DomainError> {
        self.ensure_phase(RunPhase::Settling)?;
        self.phase = RunPhase::Completed;
        Ok(StageRunUpdate::RunCompleted {
            overall_progress: self.overall_progress,
        })
    }

    /// Freezes an active run. Stage state is left untouched.
    ///
    /// Returns false if the run had already finished or been cancelled.
    pub fn cancel(&mut self) -> bool {
        if self.phase.is_active() {
            self.phase = RunPhase::Cancelled;
            true
        } else {
            false
        }
    }

    fn require_current(&self) -> Result<usize, DomainError> {
        self.current_stage.ok_or_else(|| {
            DomainError::new(ErrorCode::InvalidStateTransition, "No stage is processing")
        })
    }

    fn ensure_phase(&self, expected: RunPhase) -> Result<(), DomainError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(DomainError::invalid_transition(self.phase, expected))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn descriptors(n: usize) -> Vec<StageDescriptor> {
        (0..n)
            .map(|i| StageDescriptor::new(format!("s{}", i), format!("Stage {}", i), ""))
            .collect()
    }

    fn run_with(n: usize) -> StageRun {
        StageRun::new(StageRunId::new(), descriptors(n)).unwrap()
    }

    /// Drives a run the way the runner does, checking invariants after
    /// every update and returning everything emitted.
    fn drive(run: &mut StageRun, step: u8) -> Vec<StageRunUpdate> {
        fn record(run: &StageRun, update: StageRunUpdate, updates: &mut Vec<StageRunUpdate>) {
            assert!(run.processing_count() <= 1);
            updates.push(update);
        }

        let mut updates = Vec::new();
        for _ in 0..run.stage_count() {
            let u = run.begin_next_stage().unwrap();
            record(run, u, &mut updates);
            for tick in progress_ticks(step).unwrap() {
                let u = run.report_progress(tick).unwrap();
                record(run, u, &mut updates);
            }
            let u = run.complete_current_stage().unwrap();
            record(run, u, &mut updates);
        }
        let u = run.mark_completed().unwrap();
        record(run, u, &mut updates);
        updates
    }

    #[test]
    fn empty_stage_list_is_invalid_configuration() {
        let err = StageRun::new(StageRunId::new(), vec![]).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfiguration);
    }

    #[test]
    fn progress_ticks_with_step_ten() {
        let ticks: Vec<u8> = progress_ticks(10).unwrap().iter().map(|p| p.value()).collect();
        assert_eq!(ticks, vec![0, 10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
    }

    #[test]
    fn progress_ticks_always_end_at_hundred() {
        let ticks: Vec<u8> = progress_ticks(30).unwrap().iter().map(|p| p.value()).collect();
        assert_eq!(ticks, vec![0, 30, 60, 90, 100]);
        let ticks: Vec<u8> = progress_ticks(100).unwrap().iter().map(|p| p.value()).collect();
        assert_eq!(ticks, vec![0, 100]);
    }

    #[test]
    fn progress_ticks_rejects_bad_steps() {
        assert_eq!(progress_ticks(0).unwrap_err().code, ErrorCode::InvalidConfiguration);
        assert_eq!(progress_ticks(101).unwrap_err().code, ErrorCode::InvalidConfiguration);
    }

    #[test]
    fn overall_progress_matches_average_formula() {
        assert_eq!(overall_progress(0, Percentage::new(0), 5).value(), 0);
        assert_eq!(overall_progress(0, Percentage::new(50), 5).value(), 10);
        assert_eq!(overall_progress(2, Percentage::new(30), 5).value(), 46);
        assert_eq!(overall_progress(4, Percentage::HUNDRED, 5).value(), 100);
        // (1 * 100 + 50) / 3 = 50
        assert_eq!(overall_progress(1, Percentage::new(50), 3).value(), 50);
        // 10 / 3 = 3.33 -> 3, 20 / 3 = 6.67 -> 7
        assert_eq!(overall_progress(0, Percentage::new(10), 3).value(), 3);
        assert_eq!(overall_progress(0, Percentage::new(20), 3).value(), 7);
        // 50 / 4 = 12.5 rounds up
        assert_eq!(overall_progress(0, Percentage::new(50), 4).value(), 13);
    }

    #[test]
    fn five_stage_boundary_repeats_overall_value() {
        let mut run = run_with(5);
        let updates = drive(&mut run, 10);

        let overall: Vec<u8> = updates
            .iter()
            .filter_map(|u| match u {
                StageRunUpdate::Progress { overall_progress, .. } => Some(overall_progress.value()),
                _ => None,
            })
            .collect();

        // stage 0 ends at 20 and stage 1 begins at 20: a flat step, not a jump
        assert_eq!(&overall[9..13], &[18, 20, 20, 22]);
        assert_eq!(overall.len(), 55);
        assert_eq!(*overall.last().unwrap(), 100);
    }

    #[test]
    fn three_stage_curve_is_monotonic_but_uneven() {
        let mut run = run_with(3);
        let updates = drive(&mut run, 10);
        let overall: Vec<u8> = updates.iter().filter_map(|u| u.overall_progress()).map(|p| p.value()).collect();

        let deltas: Vec<u8> = overall.windows(2).map(|w| w[1] - w[0]).collect();
        assert!(deltas.contains(&3));
        assert!(deltas.contains(&4));
    }

    #[test]
    fn stages_complete_in_order() {
        let mut run = run_with(4);
        let updates = drive(&mut run, 25);

        let completed: Vec<usize> = updates
            .iter()
            .filter_map(|u| match u {
                StageRunUpdate::StageCompleted { stage_index, .. } => Some(*stage_index),
                _ => None,
            })
            .collect();
        assert_eq!(completed, vec![0, 1, 2, 3]);
        assert_eq!(run.phase(), RunPhase::Completed);
        assert!(updates.last().unwrap().is_terminal());
    }

    #[test]
    fn cannot_begin_second_stage_while_one_is_processing() {
        let mut run = run_with(2);
        run.begin_next_stage().unwrap();
        let err = run.begin_next_stage().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
        assert_eq!(run.processing_count(), 1);
    }

    #[test]
    fn progress_cannot_go_backwards() {
        let mut run = run_with(1);
        run.begin_next_stage().unwrap();
        run.report_progress(Percentage::new(40)).unwrap();
        assert!(run.report_progress(Percentage::new(30)).is_err());
        assert_eq!(run.stages()[0].progress.value(), 40);
    }

    #[test]
    fn progress_without_processing_stage_fails() {
        let mut run = run_with(1);
        assert!(run.report_progress(Percentage::new(10)).is_err());
        assert!(run.complete_current_stage().is_err());
    }

    #[test]
    fn last_stage_completion_moves_to_settling() {
        let mut run = run_with(1);
        run.begin_next_stage().unwrap();
        run.complete_current_stage().unwrap();
        assert_eq!(run.phase(), RunPhase::Settling);
        assert_eq!(run.overall_progress(), Percentage::HUNDRED);
        assert!(run.begin_next_stage().is_err());
    }

    #[test]
    fn mark_completed_only_once() {
        let mut run = run_with(1);
        run.begin_next_stage().unwrap();
        run.complete_current_stage().unwrap();
        run.mark_completed().unwrap();
        assert!(run.mark_completed().is_err());
    }

    #[test]
    fn mark_completed_before_settling_fails() {
        let mut run = run_with(2);
        assert!(run.mark_completed().is_err());
    }

    #[test]
    fn cancel_freezes_state() {
        let mut run = run_with(3);
        run.begin_next_stage().unwrap();
        run.report_progress(Percentage::new(60)).unwrap();
        let before = serde_json::to_value(&run.stages()).unwrap();
        let overall = run.overall_progress();

        assert!(run.cancel());
        assert_eq!(run.phase(), RunPhase::Cancelled);
        assert_eq!(serde_json::to_value(&run.stages()).unwrap(), before);
        assert_eq!(run.overall_progress(), overall);
        assert!(run.begin_next_stage().is_err());
        assert!(!run.cancel());
    }

    #[test]
    fn cancel_after_completion_is_noop() {
        let mut run = run_with(1);
        drive(&mut run, 50);
        assert!(!run.cancel());
        assert_eq!(run.phase(), RunPhase::Completed);
    }

    proptest! {
        #[test]
        fn overall_progress_never_decreases(n in 1usize..12, step in 1u8..=100) {
            let mut run = run_with(n);
            let updates = drive(&mut run, step);
            let overall: Vec<u8> = updates.iter().filter_map(|u| u.overall_progress()).map(|p| p.value()).collect();

            prop_assert_eq!(overall[0], 0);
            prop_assert!(overall.windows(2).all(|w| w[0] <= w[1]));
            prop_assert_eq!(*overall.last().unwrap(), 100);
        }

        #[test]
        fn hundred_only_after_last_stage(n in 2usize..12, step in 1u8..=100) {
            let mut run = run_with(n);
            let updates = drive(&mut run, step);
            let last_started = updates
                .iter()
                .rposition(|u| matches!(u, StageRunUpdate::StageStarted { .. }))
                .unwrap();
            for update in &updates[..last_started] {
                if let Some(p) = update.overall_progress() {
                    prop_assert!(p.value() < 100);
                }
            }
        }
    }
}
