pub mod department;
pub mod doctor;
pub mod nurse;

pub use department::DepartmentService;
pub use doctor::DoctorService;
pub use nurse::NurseService;
