pub mod answer;
pub mod response;
pub mod student;
pub mod turma;
pub mod weekday;

pub use answer::Answer;
pub use response::{LunchResponse, NewResponse};
pub use student::{StudentKey, StudentRecord};
pub use turma::Turma;
pub use weekday::Weekday;
