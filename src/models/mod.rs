pub mod crop_profile;
pub mod features;
pub mod history;
pub mod market;
pub mod recommendation;
pub mod weather;

pub use crop_profile::*;
pub use features::*;
pub use history::*;
pub use market::*;
pub use recommendation::*;
pub use weather::*;
