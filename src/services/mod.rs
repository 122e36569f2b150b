pub mod backend;
pub mod booking;
pub mod options;
pub mod presenter;
pub mod scheduling;
pub mod search;
