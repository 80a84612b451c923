//! Defines the properties for the `FormRenderer`.
//!
//! The host page supplies the schema once, a callback that receives the values
//! of every successful submission, and the base address of the upload server.

use std::rc::Rc;

use common::model::field::FieldDescriptor;
use common::model::value::FormValues;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct FormRendererProps {
    /// Field descriptors, read top to bottom. Replacing the schema remounts
    /// the form with fresh state.
    pub schema: Rc<Vec<FieldDescriptor>>,

    /// Called once per successful submission with the values as they were
    /// before the form reset.
    #[prop_or_default]
    pub on_submit: Callback<FormValues>,

    /// Address of the upload server, without trailing slash. Files are posted
    /// to `{upload_base}/upload` and previews load from
    /// `{upload_base}/{reference}`. Empty means same origin.
    #[prop_or_default]
    pub upload_base: AttrValue,
}
