pub mod application;
pub mod blog;
pub mod consultation;
pub mod course;
pub mod enrollment;
pub mod franchise;
pub mod operator;
pub mod payment;
pub mod pricing;
pub mod student;

pub use application::*;
pub use blog::*;
pub use consultation::*;
pub use course::*;
pub use enrollment::*;
pub use franchise::*;
pub use operator::*;
pub use payment::*;
pub use pricing::*;
pub use student::*;
