//! carfetch — fetch the mtcars dataset, keep the fuel-efficient cars, and
//! render them as an HTML table.

pub mod decode;
pub mod filter;
pub mod pipeline;
pub mod render;
pub mod source;
pub mod target;
pub mod types;

pub use decode::decode_records;
pub use filter::{efficient, filter_efficient, is_efficient, MPG_THRESHOLD};
pub use pipeline::{fetch_car_data_then, Pipeline};
pub use render::{render, render_body, render_error, render_heading, show, show_error, NO_RESULTS};
pub use source::{DataSource, HttpDataSource, StaticDataSource, BUNDLED_MTCARS, RESOURCE_PATH};
pub use target::RenderTarget;
pub use types::*;
