pub mod errors;
pub mod requests;
pub mod responses;

pub use errors::{UserError, UserResult};
pub use requests::{LoginInput, ProfilePreferencesUpdate, ProfileUpdate, RegisterInput};
pub use responses::{AccountSummary, LoginOutcome, ProfilePreferences, RegisteredAccount, SessionUser};
