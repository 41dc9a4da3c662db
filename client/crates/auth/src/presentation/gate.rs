//! Gate Capability
//!
//! Decision type shared by every route gate.

/// What a gated view should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Pending,
    Allow,
    Redirect(String),
}

impl GateDecision {
    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, GateDecision::Pending)
    }
}

/// Common gate capability
#[trait_variant::make(Gate: Send)]
pub trait LocalGate {
    /// Current decision, possibly `Pending`
    fn decision(&self) -> GateDecision;

    /// Wait until the decision is no longer `Pending`
    async fn settled(&self) -> GateDecision;
}
