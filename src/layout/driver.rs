use std::sync::Arc;

use crate::campaign::GraphInput;

use super::clock::{FrameClock, FrameHandle};
use super::config::SimulationConfig;
use super::simulation::Simulation;
use super::snapshot::GraphSnapshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&Arc<GraphSnapshot>)>;

/// Steps a [`Simulation`] once per host frame until it comes to rest.
///
/// The driver owns the pending frame handle. Dropping it cancels that
/// frame, so no callback outlives the view that created the driver.
pub struct SimulationDriver<C: FrameClock> {
    clock: C,
    state: DriverState,
    pending: Option<FrameHandle>,
    config: SimulationConfig,
    input: Option<GraphInput>,
    simulation: Option<Simulation>,
    snapshot: Arc<GraphSnapshot>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
    seed_salt: u64,
}

impl<C: FrameClock> SimulationDriver<C> {
    pub fn new(clock: C, config: SimulationConfig) -> Self {
        Self {
            clock,
            state: DriverState::Idle,
            pending: None,
            config: config.sanitized(),
            input: None,
            simulation: None,
            snapshot: Arc::new(GraphSnapshot::default()),
            subscribers: Vec::new(),
            next_subscription: 0,
            seed_salt: 0,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    pub fn config(&self) -> SimulationConfig {
        self.config
    }

    pub fn simulation(&self) -> Option<&Simulation> {
        self.simulation.as_ref()
    }

    pub fn snapshot(&self) -> Arc<GraphSnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Replaces the graph wholesale and starts relaxing it.
    pub fn initialize(&mut self, input: GraphInput) {
        self.input = Some(input);
        self.reseed();
    }

    /// Re-seeds from the last input, whatever the current state.
    pub fn restart(&mut self) {
        if self.input.is_none() {
            return;
        }
        self.seed_salt = self.seed_salt.wrapping_add(1);
        tracing::debug!(salt = self.seed_salt, "restarting layout");
        self.reseed();
    }

    fn reseed(&mut self) {
        let Some(input) = self.input.as_ref() else {
            return;
        };
        let simulation = Simulation::seed(input, self.config, self.seed_salt);
        self.simulation = Some(simulation);
        self.publish();
        self.run();
    }

    /// Enters `Running` without touching positions.
    pub fn run(&mut self) {
        self.state = DriverState::Running;
        if self.pending.is_none() {
            self.pending = Some(self.clock.request_frame());
        }
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.clock.cancel_frame(handle);
        }
        self.state = DriverState::Idle;
    }

    /// Frame callback. Steps once if this driver asked for the frame and
    /// returns whether a step ran.
    pub fn on_frame(&mut self) -> bool {
        if self.pending.take().is_none() || self.state != DriverState::Running {
            return false;
        }
        let Some(simulation) = self.simulation.as_mut() else {
            self.state = DriverState::Idle;
            return false;
        };

        let moving = simulation.step();
        self.publish();

        if moving {
            self.pending = Some(self.clock.request_frame());
        } else {
            self.state = DriverState::Idle;
        }
        true
    }

    pub fn set_config(&mut self, config: SimulationConfig) {
        let config = config.sanitized();
        if config == self.config {
            return;
        }
        self.config = config;
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.set_config(config);
            self.run();
        }
    }

    pub fn set_repulsion_strength(&mut self, value: f32) {
        let mut config = self.config;
        config.set_repulsion_strength(value);
        self.set_config(config);
    }

    pub fn set_attraction_strength(&mut self, value: f32) {
        let mut config = self.config;
        config.set_attraction_strength(value);
        self.set_config(config);
    }

    pub fn set_center_force_strength(&mut self, value: f32) {
        let mut config = self.config;
        config.set_center_force_strength(value);
        self.set_config(config);
    }

    pub fn set_target_link_length(&mut self, value: f32) {
        let mut config = self.config;
        config.set_target_link_length(value);
        self.set_config(config);
    }

    pub fn set_long_range_repulsion(&mut self, enabled: bool) {
        let mut config = self.config;
        config.long_range_repulsion = enabled;
        self.set_config(config);
    }

    /// Registers a callback that receives every published snapshot.
    pub fn subscribe(
        &mut self,
        subscriber: impl FnMut(&Arc<GraphSnapshot>) + 'static,
    ) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(existing, _)| *existing != id);
    }

    fn publish(&mut self) {
        let Some(simulation) = self.simulation.as_ref() else {
            return;
        };
        self.snapshot = Arc::new(simulation.snapshot());
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&self.snapshot);
        }
    }
}

impl<C: FrameClock> Drop for SimulationDriver<C> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::campaign::{InputEdge, NodeKind};
    use crate::layout::ManualClock;

    fn pair() -> GraphInput {
        let mut input = GraphInput::default();
        input.node("a", "Alpha", NodeKind::Faction);
        input.node("b", "Beta", NodeKind::Location);
        input.edges.push(InputEdge::new("a", "b"));
        input
    }

    #[test]
    fn initialize_schedules_one_frame() {
        let clock = ManualClock::new();
        let mut driver = SimulationDriver::new(clock.clone(), SimulationConfig::default());
        assert_eq!(driver.state(), DriverState::Idle);

        driver.initialize(pair());
        assert_eq!(driver.state(), DriverState::Running);
        assert_eq!(clock.pending_frames(), 1);
        assert_eq!(driver.snapshot().nodes.len(), 2);
    }

    #[test]
    fn unrequested_frames_do_nothing() {
        let clock = ManualClock::new();
        let mut driver = SimulationDriver::new(clock.clone(), SimulationConfig::default());
        assert!(!driver.on_frame());

        driver.initialize(pair());
        assert!(clock.fire().is_some());
        assert!(driver.on_frame());
        assert_eq!(driver.snapshot().revision, 1);
    }

    #[test]
    fn runs_until_idle_and_stops_scheduling() {
        let clock = ManualClock::new();
        let mut driver = SimulationDriver::new(clock.clone(), SimulationConfig::default());
        driver.initialize(pair());

        let mut frames = 0;
        while clock.fire().is_some() && frames < 2_000 {
            driver.on_frame();
            frames += 1;
        }

        assert_eq!(driver.state(), DriverState::Idle);
        assert_eq!(clock.pending_frames(), 0);
        assert!(!driver.snapshot().moving);
    }

    #[test]
    fn restart_reseeds_from_idle() {
        let clock = ManualClock::new();
        let mut driver = SimulationDriver::new(clock.clone(), SimulationConfig::default());
        driver.initialize(pair());
        driver.stop();
        assert_eq!(clock.pending_frames(), 0);

        let before = driver.snapshot();
        driver.restart();

        assert_eq!(driver.state(), DriverState::Running);
        assert_eq!(clock.pending_frames(), 1);
        let after = driver.snapshot();
        assert_eq!(after.revision, 0);
        assert_ne!(before.nodes[0].pos(), after.nodes[0].pos());
    }

    #[test]
    fn restart_while_running_keeps_a_single_frame() {
        let clock = ManualClock::new();
        let mut driver = SimulationDriver::new(clock.clone(), SimulationConfig::default());
        driver.initialize(pair());
        driver.restart();
        driver.restart();
        assert_eq!(clock.pending_frames(), 1);
    }

    #[test]
    fn drop_cancels_the_pending_frame() {
        let clock = ManualClock::new();
        {
            let mut driver = SimulationDriver::new(clock.clone(), SimulationConfig::default());
            driver.initialize(pair());
            assert_eq!(clock.pending_frames(), 1);
        }
        assert_eq!(clock.pending_frames(), 0);
        assert_eq!(clock.cancelled_frames(), 1);
    }

    #[test]
    fn config_change_wakes_an_idle_driver() {
        let clock = ManualClock::new();
        let mut driver = SimulationDriver::new(clock.clone(), SimulationConfig::default());
        driver.initialize(pair());
        driver.stop();

        driver.set_target_link_length(-40.0);
        assert_eq!(driver.config().target_link_length, 0.0);
        assert!(driver.is_running());
        assert_eq!(clock.pending_frames(), 1);
    }

    #[test]
    fn subscribers_see_every_publish() {
        let clock = ManualClock::new();
        let mut driver = SimulationDriver::new(clock.clone(), SimulationConfig::default());
        let seen = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&seen);
        let id = driver.subscribe(move |_| counter.set(counter.get() + 1));

        driver.initialize(pair());
        clock.fire();
        driver.on_frame();
        assert_eq!(seen.get(), 2);

        driver.unsubscribe(id);
        clock.fire();
        driver.on_frame();
        assert_eq!(seen.get(), 2);
    }
}
