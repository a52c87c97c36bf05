//! Output file-name derivation for marker files.
//!
//! `${project}-file.txt.ftl` → strip suffix → `${project}-file.txt` →
//! evaluate → `example-project-file.txt`. Only the leaf name is evaluated;
//! directory segments are never expanded. A result that still ends with the
//! marker suffix is rejected, so no marker survives a render.

use templater_core::ParameterSet;

use crate::error::RenderError;
use crate::evaluator::Template;
use crate::settings::RenderSettings;

/// Derive the output file name for `marker_name` (a bare file name, not a path).
pub fn derive_output_name(
    marker_name: &str,
    params: &ParameterSet,
    settings: &RenderSettings,
) -> Result<String, RenderError> {
    let stem = settings
        .strip_marker(marker_name)
        .ok_or_else(|| RenderError::NotAMarker {
            name: marker_name.to_string(),
            suffix: settings.marker_suffix.clone(),
        })?;

    let name = Template::parse(marker_name, stem)?.render(params)?;
    if !is_leaf_name(&name) || settings.is_marker(&name) {
        return Err(RenderError::InvalidOutputName {
            template: marker_name.to_string(),
            name,
        });
    }
    Ok(name)
}

fn is_leaf_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}
