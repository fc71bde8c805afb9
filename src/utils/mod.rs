pub mod dates;
pub mod ids;
pub mod logging;
