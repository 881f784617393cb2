mod attempts;
mod cell;
mod requests;
mod rsvps;
mod saved;

pub use attempts::{AttemptStore, MAX_ATTEMPTS};
pub use requests::SessionRequestStore;
pub use rsvps::RsvpStore;
pub use saved::SavedResourceStore;
