//! Signatures: the control vocabulary of a bigraphical reactive system.

use crate::error::BigraphError;
use crate::index::ControlId;

/// Nesting discipline of a control.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlStatus {
    /// Nodes of this control may contain children and reactions may
    /// occur inside them.
    Active,
    /// Nodes of this control may contain children, but no reaction may
    /// occur inside them.
    Passive,
    /// Nodes of this control can never contain children.
    Atomic,
}

/// A control: a node type with a fixed number of ports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Control {
    name: String,
    arity: usize,
    status: ControlStatus,
}

impl Control {
    /// Creates a control with the given name, arity and status.
    pub fn new(name: impl Into<String>, arity: usize, status: ControlStatus) -> Self {
        Self {
            name: name.into(),
            arity,
            status,
        }
    }

    /// An active control.
    pub fn active(name: impl Into<String>, arity: usize) -> Self {
        Self::new(name, arity, ControlStatus::Active)
    }

    /// A passive control.
    pub fn passive(name: impl Into<String>, arity: usize) -> Self {
        Self::new(name, arity, ControlStatus::Passive)
    }

    /// An atomic control.
    pub fn atomic(name: impl Into<String>, arity: usize) -> Self {
        Self::new(name, arity, ControlStatus::Atomic)
    }

    /// The name of the control.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The number of ports a node of this control carries.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// The nesting status of the control.
    pub fn status(&self) -> ControlStatus {
        self.status
    }

    /// Returns true if nodes of this control can never have children.
    pub fn is_atomic(&self) -> bool {
        self.status == ControlStatus::Atomic
    }
}

/// An ordered table of controls with unique names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    controls: Vec<Control>,
}

impl Signature {
    /// Builds a signature from controls; names must be pairwise distinct.
    pub fn from_controls(
        controls: impl IntoIterator<Item = Control>,
    ) -> Result<Self, BigraphError> {
        let controls: Vec<Control> = controls.into_iter().collect();
        for (i, control) in controls.iter().enumerate() {
            if controls[..i].iter().any(|c| c.name() == control.name()) {
                return Err(BigraphError::DuplicateName(control.name().to_owned()));
            }
        }
        Ok(Self { controls })
    }

    /// The number of controls in this signature.
    pub fn control_count(&self) -> usize {
        self.controls.len()
    }

    /// The control at the given index.
    pub fn control(&self, id: ControlId) -> &Control {
        &self.controls[id.as_usize()]
    }

    /// Looks a control up by name.
    pub fn control_id(&self, name: &str) -> Option<ControlId> {
        self.controls
            .iter()
            .position(|c| c.name() == name)
            .map(ControlId::new)
    }

    /// Iterates over all `(ControlId, Control)` pairs.
    pub fn controls(&self) -> impl Iterator<Item = (ControlId, &Control)> {
        self.controls
            .iter()
            .enumerate()
            .map(|(i, c)| (ControlId::new(i), c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Signature {
        Signature::from_controls(vec![
            Control::active("Room", 0),
            Control::active("Computer", 1),
            Control::atomic("Job", 0),
        ])
        .unwrap()
    }

    #[test]
    fn lookup_by_name_and_id() {
        let sig = sample();
        let computer = sig.control_id("Computer").unwrap();
        assert_eq!(sig.control(computer).arity(), 1);
        assert_eq!(sig.control(computer).name(), "Computer");
        assert!(sig.control_id("Printer").is_none());
    }

    #[test]
    fn duplicate_control_names_are_rejected() {
        let result = Signature::from_controls(vec![
            Control::active("Room", 0),
            Control::passive("Room", 2),
        ]);
        assert!(matches!(result, Err(BigraphError::DuplicateName(name)) if name == "Room"));
    }

    #[test]
    fn atomic_status() {
        let sig = sample();
        let job = sig.control_id("Job").unwrap();
        assert!(sig.control(job).is_atomic());
        assert_eq!(sig.control(job).status(), ControlStatus::Atomic);
    }
}
