pub mod context;
pub mod events;
pub mod propagator;
pub mod queue;

pub use context::PropagationContext;
pub use context::PropagationContextMut;
pub use context::ReadDomains;
pub use context::WatcherTable;
pub use events::DomainEvent;
pub use events::DomainEvents;
pub use propagator::Propagator;
pub use propagator::PropagatorInitialisationContext;
pub use queue::PropagatorId;
pub use queue::PropagatorQueue;
