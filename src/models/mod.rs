pub mod checkin;
pub mod department_stat;
pub mod employee;
pub mod status;

pub use checkin::CheckinEvent;
pub use department_stat::DepartmentStat;
pub use employee::{Employee, Role};
pub use status::CheckinStatus;
