pub mod forms;
pub mod uploads;
