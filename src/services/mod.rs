pub mod course_list;
pub mod registration_modal;

pub use course_list::{CourseCard, CourseListLoader, LoadState};
pub use registration_modal::{
    CourseSummary, Field, ModalStatus, RegistrationForm, RegistrationModal, SessionId,
    SubmissionStatus, SubmitOutcome,
};
