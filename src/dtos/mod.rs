mod authdtos;
mod waitlistdtos;

pub use authdtos::*;
pub use waitlistdtos::*;
