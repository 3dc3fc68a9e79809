//! Filling the DP3 and SH XML templates.
//!
//! The templates are the operator's own exports from the tax portal; this
//! module only sets attributes on known elements and leaves the rest as is.
//!
//! # Example
//!
//! ```ignore
//! use souhrnka::template::*;
//!
//! let xml = fill_sh(&template, &filing, &FilerInfo {
//!     submit_date: "25.04.2024".into(),
//!     ..Default::default()
//! })?;
//! ```

mod patch;
mod statements;

pub use patch::{ElementPatch, TemplatePatch};
pub use statements::{
    FilerInfo, OutputPlan, fill_dp3, fill_sh, load_template, output_file_names, write_statements,
};
