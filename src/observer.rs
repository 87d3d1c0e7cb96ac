//! Step observer trait for monitoring cloth simulation progress.

/// Trait for observing cloth simulation steps.
///
/// Implement this trait to monitor solver progress (e.g., for debugging,
/// visualization, or performance profiling). All methods have default
/// no-op implementations.
pub trait StepObserver {
    /// Called after gravity, wind and spring forces have been accumulated.
    fn on_forces(&mut self) {}

    /// Called after all particles have been integrated.
    fn on_integrate(&mut self) {}

    /// Called after each constraint correction sweep.
    fn on_constraint_iteration(&mut self, _iteration: usize) {}

    /// Called when the force/integrate/constrain step is complete.
    fn on_step_complete(&mut self) {}

    /// Called after collision resolution with the number of contacts.
    fn on_collisions(&mut self, _contacts: usize) {}
}

/// A no-op observer that does nothing. Use as default when no observation needed.
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}
