//! Downgrade Visual Studio solutions and their managed projects to an older
//! file format.
//!
//! A solution is rewritten line by line. Each `.csproj`/`.vbproj` it
//! references is copied next to the converted solution (optionally renamed)
//! and edited structurally so the older IDE can load it. Native projects and
//! solution folders are left exactly as they are.
//!
//! # Modules
//!
//! - [`format`]: supported target versions and their constants
//! - [`naming`]: postfix rules for output file names
//! - [`solution`]: `.sln` line rewriting and project dispatch
//! - [`project`]: MSBuild project downgrade steps
//! - [`convert`]: one full conversion run
//! - [`config`]: `sln-downgrade.toml` and CLI precedence
//! - [`report`]: text and JSON run reports
//!
//! # Example
//!
//! ```no_run
//! use sln_downgrade::{convert_solution, ConversionOptions, TargetFormat};
//!
//! let options = ConversionOptions::new("src/Sample.sln")
//!     .with_target(TargetFormat::Vs2005)
//!     .with_output_dir("converted");
//! let report = convert_solution(&options)?;
//! println!("{} projects converted", report.converted());
//! # Ok::<(), sln_downgrade::ConvertError>(())
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod format;
pub mod naming;
pub mod options;
pub mod path_guard;
pub mod project;
pub mod report;
pub mod solution;

pub use convert::convert_solution;
pub use error::{ConvertError, Result};
pub use format::{describe, FormatDescriptor, TargetFormat};
pub use naming::PostfixRule;
pub use options::ConversionOptions;
pub use report::ConversionReport;
