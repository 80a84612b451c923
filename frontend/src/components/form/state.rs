//! Component state for the form renderer.

use common::engine::controller::FormController;

use super::props::FormRendererProps;
use super::uploader::HttpUploader;

/// Main state container for the `FormRenderer`.
///
/// Fields are `pub` because they are accessed by `view` and `update` modules.
pub struct FormRenderer {
    /// Owns the schema, values, errors and success signal of this form.
    pub controller: FormController,

    pub uploader: HttpUploader,

    /// Bumped after every accepted submission. Used as the key of the field
    /// list so uncontrolled DOM state (chosen files, select highlights) is
    /// rebuilt after a reset.
    pub generation: u64,
}

impl FormRenderer {
    pub fn new(props: &FormRendererProps) -> Self {
        let controller = FormController::new(props.schema.as_ref().clone());
        for diagnostic in controller.schema_diagnostics() {
            gloo_console::warn!(diagnostic.to_string());
        }

        Self {
            controller,
            uploader: HttpUploader::new(&props.upload_base),
            generation: 0,
        }
    }
}
