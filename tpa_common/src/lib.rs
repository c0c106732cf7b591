mod money;
mod secret;

pub mod helpers;

pub use money::{Currency, Money, UnknownCurrencyError};
pub use secret::Secret;
