pub mod ast;
pub mod matcher;
pub mod planner;
