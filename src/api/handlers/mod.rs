pub mod admin;
pub mod applications;
pub mod blog;
pub mod consultations;
pub mod courses;
pub mod enrollments;
pub mod franchise;
pub mod operator_auth;
pub mod payments;
pub mod root;
pub mod student_auth;
