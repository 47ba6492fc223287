//! Domain-change event kinds a propagator can subscribe to, and the two delivery modes of
//! spec §4.4: `wake-on-lit` propagators fire immediately inside BCP; `schedule-on-*` propagators
//! are enqueued on the propagator queue and run in priority order once BCP reaches a fixpoint.

use enumset::EnumSet;
use enumset::EnumSetType;

#[derive(Debug, EnumSetType)]
pub enum DomainEvent {
    LowerBound,
    UpperBound,
    Assign,
    /// A single value removed from the domain's interior (not a bound move, not a full fix).
    Removal,
}

pub type DomainEvents = EnumSet<DomainEvent>;

/// Convenience constructors mirroring the teacher's `DomainEvents::ASSIGN`-style constants.
pub mod presets {
    use super::DomainEvent;
    use super::DomainEvents;

    pub fn lower_bound() -> DomainEvents {
        DomainEvent::LowerBound.into()
    }

    pub fn upper_bound() -> DomainEvents {
        DomainEvent::UpperBound.into()
    }

    pub fn assign() -> DomainEvents {
        DomainEvent::Assign.into()
    }

    pub fn bounds() -> DomainEvents {
        DomainEvent::LowerBound | DomainEvent::UpperBound
    }

    pub fn any() -> DomainEvents {
        DomainEvent::LowerBound
            | DomainEvent::UpperBound
            | DomainEvent::Assign
            | DomainEvent::Removal
    }
}
