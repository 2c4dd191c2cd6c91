pub mod checkup;
pub mod setup;
pub mod start;
pub mod stop;
pub mod update;
