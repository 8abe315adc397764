pub mod bitget;
pub mod messages;
#[cfg(test)]
pub mod mock;
pub mod signer;
pub mod traits;
