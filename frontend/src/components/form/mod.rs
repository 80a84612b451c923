//! Schema-driven form: root module wiring the Yew `Component` implementation
//! with submodules for state, update logic, view rendering and helpers.
//!
//! Responsibilities
//! - Re-export selected types (`Msg`, `FormRendererProps`, `FormRenderer`).
//! - Provide the `Component` implementation that delegates to `update::update`
//!   and `view::view`.
//! - Remount the form with fresh state when the host swaps the schema.

use yew::prelude::*;

mod helpers;
mod messages;
mod props;
mod state;
mod update;
mod uploader;
mod view;

pub use helpers::show_toast;
pub use messages::Msg;
pub use props::FormRendererProps;
pub use state::FormRenderer;

use uploader::HttpUploader;

impl Component for FormRenderer {
    type Message = Msg;
    type Properties = FormRendererProps;

    fn create(ctx: &Context<Self>) -> Self {
        FormRenderer::new(ctx.props())
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        let props = ctx.props();
        if props.schema != old_props.schema {
            *self = FormRenderer::new(props);
        } else if props.upload_base != old_props.upload_base {
            self.uploader = HttpUploader::new(&props.upload_base);
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }
}
