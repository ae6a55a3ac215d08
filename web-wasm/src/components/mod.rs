//! UIコンポーネント

pub mod header;
pub mod hero;
pub mod location_map;
pub mod match_results;
pub mod report_form;
pub mod toaster;
