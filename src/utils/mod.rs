pub mod diagnostic;
pub mod display_helper;
