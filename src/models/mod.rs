pub mod session;
pub mod subject;

pub use session::{ContentType, ManualSessionInput, NewStudySession, StudySession};
pub use subject::{Subject, SubjectInput};
