pub mod availability;
pub mod calendar;
pub mod reservation;
pub mod room;
