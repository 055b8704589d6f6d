pub mod cart_pole;

pub use cart_pole::{CartPoleEnv, CartPoleState};
