/// numbered demonstration tasks, also reachable from the interactive menu
pub mod titration_examples;
