pub mod attendance;
pub mod employee;
pub mod monthly;
pub mod paid_leave;
pub mod role;
pub mod shift;
