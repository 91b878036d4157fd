pub mod amount;
pub mod price;

pub use amount::Amount;
pub use price::Price;
