pub mod capacity;
pub mod input_builder;
pub mod matching_check;
pub mod partition;

pub use capacity::correct_capacities;
pub use input_builder::{build_solver_input, offered_topics};
pub use matching_check::check_matchings;
pub use partition::{partition_students, Partition};
