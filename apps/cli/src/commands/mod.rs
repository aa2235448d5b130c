pub mod compile;
pub mod explain;
pub mod run;
pub mod trace;
pub mod validate;
pub mod verify;
