pub mod mock;
pub mod source;

pub use mock::MockMailService;
pub use source::MailSource;
