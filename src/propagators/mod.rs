//! The two propagators specified in full detail (spec §4.7, §4.8); §4.9's "other propagators"
//! are instead implemented as the clausal decompositions in `crate::model`.

pub mod all_different;
pub mod linear_leq;

pub use all_different::AllDifferentPropagator;
pub use linear_leq::LinearLeqPropagator;
pub use linear_leq::Term;
