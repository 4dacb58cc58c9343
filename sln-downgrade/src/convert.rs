use std::fs;

use tracing::info;

use crate::error::{ConvertError, Result};
use crate::naming::renamed_solution_name;
use crate::options::ConversionOptions;
use crate::report::ConversionReport;
use crate::solution::{SolutionDocument, SolutionTransformer};

/// Convert the solution named by `options` and every managed project it
/// references.
///
/// The renamed solution is written to `options.output_dir`; project copies
/// land below it at their original relative locations.
///
/// # Errors
///
/// [`ConvertError::SolutionNotFound`] before anything is read, otherwise the
/// first file-system or project failure. Files written before the failure
/// are left in place.
pub fn convert_solution(options: &ConversionOptions) -> Result<ConversionReport> {
    let solution_path = &options.solution_path;
    if !solution_path.is_file() {
        return Err(ConvertError::SolutionNotFound(solution_path.clone()));
    }

    let bytes = fs::read(solution_path)
        .map_err(|err| ConvertError::fs("read solution", solution_path, err))?;
    let document = SolutionDocument::parse(&bytes);

    let transformed = SolutionTransformer::new(options).transform(&document)?;

    fs::create_dir_all(&options.output_dir)
        .map_err(|err| ConvertError::fs("create directory", &options.output_dir, err))?;
    let output = options
        .output_dir
        .join(renamed_solution_name(solution_path, options));
    fs::write(&output, transformed.document.to_bytes())
        .map_err(|err| ConvertError::fs("write solution", &output, err))?;

    info!(
        solution = %solution_path.display(),
        output = %output.display(),
        target = %options.target,
        projects = transformed.projects.len(),
        "solution converted"
    );

    Ok(ConversionReport {
        solution: solution_path.clone(),
        output,
        target: options.target,
        projects: transformed.projects,
        skipped: transformed.skipped,
    })
}
