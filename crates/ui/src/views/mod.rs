mod controls;
mod report;
mod sheet;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use sheet::SheetView;
pub use state::Notice;
