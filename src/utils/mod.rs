pub mod deadline;
pub mod sentence_divider;
