//! View rendering for the form renderer.
//!
//! The controller plans every field as a toolkit-independent `Widget`; this
//! module turns each widget into HTML and wires its DOM events back into
//! `Msg`s. Cards render as a `fieldset` whose children show their own errors.
//!
//! Notes
//! - The form is `novalidate`: the engine is the only validator, so the
//!   browser must not block submission on its own constraint checks.
//! - The submit handler always prevents the browser's default navigation.

use common::engine::render::{FieldView, OptionView, Widget};
use common::model::value::FieldValue;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::html::Scope;
use yew::prelude::*;

use super::helpers::selected_values;
use super::messages::Msg;
use super::state::FormRenderer;

pub fn view(component: &FormRenderer, ctx: &Context<FormRenderer>) -> Html {
    let link = ctx.link();
    let fields = component.controller.plan(ctx.props().upload_base.as_str());
    let onsubmit = link.callback(|e: SubmitEvent| {
        e.prevent_default();
        Msg::Submit
    });

    html! {
        <form class="form-container" novalidate=true {onsubmit}>
            <div key={component.generation.to_string()}>
                { for fields.iter().map(|field| build_field_row(component, field, link, true)) }
            </div>
            <button type="submit">{"Submit"}</button>
            { build_success(component) }
        </form>
    }
}

/// Label, widget and error line for one field.
/// Top-level labels are bold; card children use plain labels.
fn build_field_row(
    component: &FormRenderer,
    field: &FieldView,
    link: &Scope<FormRenderer>,
    top_level: bool,
) -> Html {
    let label = if top_level {
        html! { <strong>{ field.title.clone() }</strong> }
    } else {
        html! { <>{ field.title.clone() }</> }
    };

    html! {
        <div class="form-field">
            <label>{ label }</label>
            <div>{ build_widget(component, field, link) }</div>
            { build_error(field) }
        </div>
    }
}

fn build_widget(component: &FormRenderer, field: &FieldView, link: &Scope<FormRenderer>) -> Html {
    let name = field.name.clone();

    match &field.widget {
        Widget::Input {
            input_type,
            value,
            placeholder,
            min,
            max,
        } => {
            let oninput = link.callback(move |e: InputEvent| {
                let input: HtmlInputElement = e.target_unchecked_into();
                Msg::SetValue {
                    name: name.clone(),
                    value: FieldValue::Text(input.value()),
                }
            });
            html! {
                <input
                    type={input_type.as_str()}
                    name={field.name.clone()}
                    placeholder={placeholder.clone()}
                    min={min.clone()}
                    max={max.clone()}
                    value={value.clone()}
                    {oninput}
                />
            }
        }
        Widget::Select { options } => {
            let onchange = link.callback(move |e: Event| {
                let select: HtmlSelectElement = e.target_unchecked_into();
                Msg::SetValue {
                    name: name.clone(),
                    value: FieldValue::Text(select.value()),
                }
            });
            html! {
                <select name={field.name.clone()} {onchange}>
                    { for options.iter().map(build_option) }
                </select>
            }
        }
        Widget::MultiSelect { options } => {
            // Always the whole selection, never a delta.
            let onchange = link.callback(move |e: Event| {
                let select: HtmlSelectElement = e.target_unchecked_into();
                Msg::SetValue {
                    name: name.clone(),
                    value: FieldValue::List(selected_values(&select)),
                }
            });
            html! {
                <select name={field.name.clone()} multiple=true {onchange}>
                    { for options.iter().map(build_option) }
                </select>
            }
        }
        Widget::File { preview } => {
            let onchange = link.callback(move |e: Event| {
                let input: HtmlInputElement = e.target_unchecked_into();
                Msg::FileSelected {
                    name: name.clone(),
                    file: input.files().and_then(|files| files.get(0)),
                }
            });
            html! {
                <div>
                    <input type="file" name={field.name.clone()} {onchange} />
                    {
                        if component.controller.is_uploading(&field.name) {
                            html! { <span class="uploading">{"Uploading..."}</span> }
                        } else {
                            html! {}
                        }
                    }
                    {
                        if let Some(src) = preview {
                            html! {
                                <div style="margin-top: 0.5rem;">
                                    <strong>{"Preview:"}</strong><br />
                                    <img src={src.clone()} alt="Uploaded" width="150" />
                                </div>
                            }
                        } else {
                            html! {}
                        }
                    }
                </div>
            }
        }
        Widget::Card { legend, children } => html! {
            <fieldset>
                <legend>{ legend.clone() }</legend>
                { for children.iter().map(|child| build_field_row(component, child, link, false)) }
            </fieldset>
        },
        Widget::Nothing => html! {},
    }
}

fn build_option(option: &OptionView) -> Html {
    html! {
        <option value={option.value.clone()} selected={option.selected}>
            { option.label.clone() }
        </option>
    }
}

fn build_error(field: &FieldView) -> Html {
    match &field.error {
        Some(message) => html! { <span class="error">{ message.clone() }</span> },
        None => html! {},
    }
}

fn build_success(component: &FormRenderer) -> Html {
    match component.controller.success_message() {
        Some(message) => html! { <div class="success">{ message.to_string() }</div> },
        None => html! {},
    }
}
