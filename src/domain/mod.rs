mod expense;
mod money;
mod totals;
mod window;

pub use expense::*;
pub use money::*;
pub use totals::*;
pub use window::*;
