pub mod models;
pub mod recorder;
pub mod store;

pub use models::{Booking, DateOrder, NewBooking};
pub use recorder::{BookingError, BookingRecorder, CheckoutPhase};
pub use store::{BookingStore, DocumentError};
