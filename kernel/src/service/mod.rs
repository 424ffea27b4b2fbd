pub mod availability;
pub mod booking;
pub mod publisher;
pub mod session;

#[cfg(test)]
pub(crate) mod fakes;
