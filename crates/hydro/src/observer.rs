//! Optional hooks that see every force and torque the model applies.
//!
//! Observers are for debug drawing and logging only; the force model never depends
//! on one being attached.

use glam::Vec3;

/// Which part of the model produced a contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForceKind {
    Gravity,
    Buoyancy,
    Drag,
    AngularDamping,
    Thrust,
    Steering,
    Upright,
}

/// Receives force vectors with their application points and torques.
///
/// Values arrive as the component requested them: acceleration-mode terms report
/// accelerations, force-mode terms report newtons.
pub trait ForceObserver {
    fn on_force(&mut self, kind: ForceKind, point: Vec3, force: Vec3);

    fn on_torque(&mut self, _kind: ForceKind, _torque: Vec3) {}
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl ForceObserver for NullObserver {
    fn on_force(&mut self, _kind: ForceKind, _point: Vec3, _force: Vec3) {}
}

/// Emits each contribution as a `trace!` line.
#[derive(Debug, Default, Clone)]
pub struct LogObserver {
    pub label: String,
}

impl LogObserver {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }
}

impl ForceObserver for LogObserver {
    fn on_force(&mut self, kind: ForceKind, point: Vec3, force: Vec3) {
        log::trace!("[{}] {:?} force {:?} at {:?}", self.label, kind, force, point);
    }

    fn on_torque(&mut self, kind: ForceKind, torque: Vec3) {
        log::trace!("[{}] {:?} torque {:?}", self.label, kind, torque);
    }
}

/// Stores every contribution for later inspection.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    pub forces: Vec<(ForceKind, Vec3, Vec3)>,
    pub torques: Vec<(ForceKind, Vec3)>,
}

impl RecordingObserver {
    pub fn clear(&mut self) {
        self.forces.clear();
        self.torques.clear();
    }

    /// Sum of recorded forces of `kind`.
    pub fn total_force(&self, kind: ForceKind) -> Vec3 {
        self.forces
            .iter()
            .filter(|(k, _, _)| *k == kind)
            .map(|(_, _, f)| *f)
            .sum()
    }

    /// Sum of recorded torques of `kind`.
    pub fn total_torque(&self, kind: ForceKind) -> Vec3 {
        self.torques
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, t)| *t)
            .sum()
    }

    pub fn count(&self, kind: ForceKind) -> usize {
        self.forces.iter().filter(|(k, _, _)| *k == kind).count()
    }

    /// Feed every recorded contribution to `other`, forces first.
    pub fn replay(&self, other: &mut dyn ForceObserver) {
        for &(kind, point, force) in &self.forces {
            other.on_force(kind, point, force);
        }
        for &(kind, torque) in &self.torques {
            other.on_torque(kind, torque);
        }
    }
}

impl ForceObserver for RecordingObserver {
    fn on_force(&mut self, kind: ForceKind, point: Vec3, force: Vec3) {
        self.forces.push((kind, point, force));
    }

    fn on_torque(&mut self, kind: ForceKind, torque: Vec3) {
        self.torques.push((kind, torque));
    }
}
