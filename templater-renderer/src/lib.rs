//! # templater-renderer
//!
//! Minimal `${name}` substitution engine plus the marker-file naming policy.
//! There are no loops, conditionals, includes, or nested data: every
//! expression is a flat lookup into a [`ParameterSet`].
//!
//! ## Usage
//!
//! ```rust
//! use templater_core::ParameterSet;
//! use templater_renderer::{RenderSettings, Renderer};
//!
//! let params = ParameterSet::new([("project", "demo")]).unwrap();
//! let settings = RenderSettings::default();
//! let renderer = Renderer::new(&params, &settings);
//!
//! assert_eq!(renderer.render_content("readme.md.ftl", "# ${project}").unwrap(), "# demo");
//! assert_eq!(renderer.output_name("${project}.md.ftl").unwrap(), "demo.md");
//! ```

pub mod error;
pub mod evaluator;
pub mod naming;
pub mod settings;

pub use error::{Position, RenderError};
pub use evaluator::{render, Template};
pub use naming::derive_output_name;
pub use settings::{RenderSettings, DEFAULT_MARKER_SUFFIX};

use templater_core::ParameterSet;

/// Binds a parameter set and settings for rendering any number of marker files.
///
/// Holds no per-file state; each call parses its own [`Template`].
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    params: &'a ParameterSet,
    settings: &'a RenderSettings,
}

impl<'a> Renderer<'a> {
    pub fn new(params: &'a ParameterSet, settings: &'a RenderSettings) -> Self {
        Renderer { params, settings }
    }

    pub fn params(&self) -> &'a ParameterSet {
        self.params
    }

    pub fn settings(&self) -> &'a RenderSettings {
        self.settings
    }

    /// Render file contents; `template_name` is the file's relative path.
    pub fn render_content(&self, template_name: &str, text: &str) -> Result<String, RenderError> {
        Template::parse(template_name, text)?.render(self.params)
    }

    /// Output file name for the marker file named `marker_name`.
    pub fn output_name(&self, marker_name: &str) -> Result<String, RenderError> {
        derive_output_name(marker_name, self.params, self.settings)
    }
}
