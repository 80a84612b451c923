use std::rc::Rc;

use crate::components::form::{show_toast, FormRenderer};
use common::model::field::{parse_schema, FieldDescriptor};
use common::model::upload::SubmitFormResponse;
use common::model::value::FormValues;
use gloo_net::http::Request;
use yew::platform::spawn_local;
use yew::{html, Component, Context, Html};

/// Schema of the form shown on the page.
const FORM_SCHEMA: &str = include_str!("../form_schema.json");

pub enum AppMsg {
    Submitted(FormValues),
}

pub struct App {
    schema: Result<Rc<Vec<FieldDescriptor>>, String>,
}

impl Component for App {
    type Message = AppMsg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        let schema = parse_schema(FORM_SCHEMA)
            .map(Rc::new)
            .map_err(|e| e.to_string());
        if let Err(e) = &schema {
            gloo_console::error!(format!("Invalid form schema: {}", e));
        }
        Self { schema }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            AppMsg::Submitted(values) => {
                gloo_console::log!(format!(
                    "Form submitted: {}",
                    serde_json::to_string(&values).unwrap_or_default()
                ));
                spawn_local(send_submission(values));
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div style="padding: 2rem;">
                <h2>{"Dynamic Form"}</h2>
                {
                    match &self.schema {
                        Ok(schema) => html! {
                            <FormRenderer
                                schema={schema.clone()}
                                on_submit={ctx.link().callback(AppMsg::Submitted)}
                            />
                        },
                        Err(e) => html! {
                            <div class="error">{ format!("Invalid form schema: {}", e) }</div>
                        },
                    }
                }
            </div>
        }
    }
}

/// Hands accepted values to the server. Failures only produce a toast; the
/// form has already reset.
async fn send_submission(values: FormValues) {
    let request = match Request::post("/submit-form").json(&values) {
        Ok(request) => request,
        Err(e) => {
            gloo_console::error!(format!("Could not encode submission: {}", e));
            return;
        }
    };

    match request.send().await {
        Ok(response) if response.ok() => match response.json::<SubmitFormResponse>().await {
            Ok(body) if body.success => {
                gloo_console::log!(format!("Server accepted {} field(s)", body.data.len()));
            }
            _ => show_toast("The server did not confirm the submission."),
        },
        Ok(response) => {
            show_toast(&format!(
                "Error sending the form: {}",
                response.text().await.unwrap_or_default()
            ));
        }
        Err(err) => {
            show_toast(&format!("Error sending the form: {}", err));
        }
    }
}
