pub mod evaluate;
pub mod gradient_check;
pub mod test_result;

pub use gradient_check::GradCheckMode;
pub use test_result::TestResult;
