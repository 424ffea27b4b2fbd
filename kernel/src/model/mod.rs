pub mod availability;
pub mod calendar;
pub mod day;
pub mod id;
pub mod occupancy;
pub mod reservation;
pub mod room;
pub mod stats;
