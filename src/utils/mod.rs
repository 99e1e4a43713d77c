mod node;
pub use node::Color;
pub(crate) use node::{NIL, Node, Side};
