mod central;
mod side;
mod statistics;
mod top;

pub use central::central_panel;
pub use side::side_panel;
pub use statistics::statistics_panel;
pub use top::top_panel;
