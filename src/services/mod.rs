pub mod call;
pub mod dialog;
pub mod intent;
pub mod messaging;
pub mod store;
pub mod twiml;
