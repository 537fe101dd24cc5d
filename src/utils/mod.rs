pub mod attendance_store;
pub mod db_utils;
