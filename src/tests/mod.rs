//! End-to-end scenario tests mirroring spec §8's worked examples, plus a few of its quantified
//! invariants that don't fit naturally next to a single module's unit tests.

mod invariants;
mod scenario_a_send_more_money;
mod scenario_b_golomb_ruler;
mod scenario_c_hall_violation;
mod scenario_d_linear_propagation;
mod scenario_e_element;
mod scenario_f_set_variable;
