pub mod house_photo;
pub mod job_record;
pub mod phase_assignment;
pub mod worker;
