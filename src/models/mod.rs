pub mod applicant;
pub mod direction;
pub mod enums;
pub mod raw_row;
pub mod university;

pub use applicant::ApplicantRecord;
pub use direction::Direction;
pub use enums::{EducationForm, EducationLevel, Source, SubmitStatus};
pub use raw_row::RawTableRow;
pub use university::University;
