mod midnight;

pub use midnight::{system_clock, Clock, MidnightTimer};

#[cfg(test)]
pub(crate) use midnight::paused_clock;
