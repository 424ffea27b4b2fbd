pub mod calendar_feed;
pub mod channel;
pub mod health;
pub mod reservation;
