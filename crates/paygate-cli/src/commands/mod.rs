pub mod canonicalize;
pub mod sign;
pub mod verify;
