pub mod backup;
pub mod env;
pub mod git;
pub mod guard;
pub mod resolve;
