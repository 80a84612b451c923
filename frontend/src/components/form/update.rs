//! Update function for the form renderer.
//!
//! Elm-style: receives the component state, the `Context` and a `Msg`, mutates
//! the state through the `FormController`, and returns whether to re-render.
//!
//! Key behaviors
//! - Value changes are stored as-is; validation only runs on submit.
//! - File selection starts an upload in the background; the result comes back
//!   as `Msg::UploadFinished` and only a stored reference from the field's
//!   latest upload changes the value.
//! - A successful submit emits `on_submit`, resets the form and arms a timer
//!   that clears the success message.

use common::engine::controller::{SubmitOutcome, SUCCESS_DISPLAY_MS};
use common::engine::upload::handle_file_selected;
use common::model::field::find_leaf;
use gloo_timers::future::TimeoutFuture;
use yew::platform::spawn_local;
use yew::prelude::*;

use super::helpers::show_toast;
use super::messages::Msg;
use super::state::FormRenderer;

pub fn update(component: &mut FormRenderer, ctx: &Context<FormRenderer>, msg: Msg) -> bool {
    match msg {
        Msg::SetValue { name, value } => {
            component.controller.set(&name, value);
            true
        }
        Msg::FileSelected { name, file } => {
            // Cancelling the file dialog is not an error.
            let Some(file) = file else {
                return false;
            };
            let token = component.controller.begin_upload(&name);

            let uploader = component.uploader.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                let outcome = handle_file_selected(&uploader, &name, Some(file)).await;
                link.send_message(Msg::UploadFinished { token, outcome });
            });
            true
        }
        Msg::UploadFinished { token, outcome } => {
            if let Some(diagnostic) = component.controller.finish_upload(token, outcome) {
                gloo_console::error!(diagnostic.to_string());
                let name = diagnostic.field();
                let label = find_leaf(component.controller.schema(), name)
                    .map(|field| field.title.as_str())
                    .filter(|title| !title.is_empty())
                    .unwrap_or(name);
                show_toast(&format!(
                    "Upload failed for \"{}\". Please select the file again.",
                    label
                ));
            }
            true
        }
        Msg::Submit => {
            let on_submit = ctx.props().on_submit.clone();
            match component.controller.submit(|values| on_submit.emit(values)) {
                SubmitOutcome::Rejected { errors } => {
                    gloo_console::log!(format!(
                        "Submission blocked by {} invalid field(s)",
                        errors.len()
                    ));
                }
                SubmitOutcome::Accepted { token, diagnostics } => {
                    for diagnostic in diagnostics {
                        gloo_console::warn!(diagnostic.to_string());
                    }
                    component.generation += 1;
                    let link = ctx.link().clone();
                    spawn_local(async move {
                        TimeoutFuture::new(SUCCESS_DISPLAY_MS).await;
                        link.send_message(Msg::ClearSuccess(token));
                    });
                }
            }
            true
        }
        Msg::ClearSuccess(token) => component.controller.expire_success(token),
    }
}
