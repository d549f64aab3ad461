pub mod fixer;
pub mod marketstack;

pub use fixer::FixerProvider;
pub use marketstack::MarketstackProvider;
