//! Field renderer registry.
//!
//! Maps each descriptor plus its current state to a [`Widget`]: a description
//! of what to present, independent of any UI toolkit. The dispatch is an
//! exhaustive match over [`FieldKind`]. Unknown kinds plan to
//! [`Widget::Nothing`]; the schema audit reports them once at mount.
//!
//! Presentation never transforms values: number and date inputs carry their
//! literal strings and `min`/`max` are hints for the input, not rules.

use crate::engine::state::FormState;
use crate::engine::upload::preview_url;
use crate::model::field::{FieldDescriptor, FieldKind, SelectOption};
use crate::model::value::FieldValue;

/// Label of the empty option that leads every single `select`.
pub const SELECT_PLACEHOLDER: &str = "-- Select --";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Text,
    Email,
    Number,
    Date,
}

impl InputType {
    pub fn as_str(self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Email => "email",
            InputType::Number => "number",
            InputType::Date => "date",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    Input {
        input_type: InputType,
        value: String,
        placeholder: Option<String>,
        min: Option<String>,
        max: Option<String>,
    },
    Select {
        options: Vec<OptionView>,
    },
    MultiSelect {
        options: Vec<OptionView>,
    },
    File {
        /// Present once a reference has been stored.
        preview: Option<String>,
    },
    Card {
        legend: String,
        children: Vec<FieldView>,
    },
    Nothing,
}

/// One field ready to present: label, widget and the error shown beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub name: String,
    pub title: String,
    pub widget: Widget,
    /// Always `None` for cards; their children carry their own errors.
    pub error: Option<String>,
}

/// Plans every top-level field of `schema`.
pub fn plan_form(schema: &[FieldDescriptor], state: &FormState, upload_base: &str) -> Vec<FieldView> {
    schema
        .iter()
        .map(|field| plan_field(field, state, upload_base))
        .collect()
}

pub fn plan_field(field: &FieldDescriptor, state: &FormState, upload_base: &str) -> FieldView {
    let value = state.value(&field.name);
    let text = || value.and_then(FieldValue::as_text).unwrap_or_default().to_string();

    let widget = match &field.kind {
        FieldKind::Text => input(field, InputType::Text, text()),
        FieldKind::Email => input(field, InputType::Email, text()),
        FieldKind::Number => input(field, InputType::Number, text()),
        FieldKind::Date => input(field, InputType::Date, text()),
        FieldKind::Select(options) => {
            let current = text();
            let mut views = vec![OptionView {
                value: String::new(),
                label: SELECT_PLACEHOLDER.to_string(),
                selected: current.is_empty(),
            }];
            views.extend(option_views(options, |id| id == current));
            Widget::Select { options: views }
        }
        FieldKind::MultiSelect(options) => {
            let selected = value.and_then(FieldValue::as_list).unwrap_or_default();
            Widget::MultiSelect {
                options: option_views(options, |id| selected.iter().any(|s| s == id)),
            }
        }
        FieldKind::File => Widget::File {
            preview: Some(text())
                .filter(|reference| !reference.is_empty())
                .map(|reference| preview_url(upload_base, &reference)),
        },
        FieldKind::Card(children) => Widget::Card {
            legend: field.title.clone(),
            children: plan_form(children, state, upload_base),
        },
        FieldKind::Unknown(_) => Widget::Nothing,
    };

    let error = if field.kind.is_card() {
        None
    } else {
        state.error(&field.name).map(str::to_string)
    };

    FieldView {
        name: field.name.clone(),
        title: field.title.clone(),
        widget,
        error,
    }
}

fn input(field: &FieldDescriptor, input_type: InputType, value: String) -> Widget {
    let ranged = matches!(input_type, InputType::Number | InputType::Date);
    Widget::Input {
        input_type,
        value,
        placeholder: field.placeholder.clone(),
        min: field.min.clone().filter(|_| ranged),
        max: field.max.clone().filter(|_| ranged),
    }
}

fn option_views(options: &[SelectOption], is_selected: impl Fn(&str) -> bool) -> Vec<OptionView> {
    options
        .iter()
        .map(|option| OptionView {
            value: option.id.clone(),
            label: option.title.clone(),
            selected: is_selected(&option.id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::value::FieldErrors;

    fn options() -> Vec<SelectOption> {
        vec![SelectOption::new("a", "A"), SelectOption::new("b", "B")]
    }

    #[test]
    fn test_number_keeps_literal_value_and_range_hints() {
        let field = FieldDescriptor::new("age", FieldKind::Number).with_range("18", "99");
        let schema = vec![field.clone()];
        let mut state = FormState::new(&schema);
        state.set("age", FieldValue::from("017"));

        let view = plan_field(&field, &state, "");
        assert_eq!(
            view.widget,
            Widget::Input {
                input_type: InputType::Number,
                value: "017".to_string(),
                placeholder: None,
                min: Some("18".to_string()),
                max: Some("99".to_string()),
            }
        );
    }

    #[test]
    fn test_select_leads_with_placeholder_option() {
        let field = FieldDescriptor::new("letter", FieldKind::Select(options()));
        let schema = vec![field.clone()];
        let mut state = FormState::new(&schema);
        state.set("letter", FieldValue::from("b"));

        let Widget::Select { options } = plan_field(&field, &state, "").widget else {
            panic!("expected a select widget");
        };
        let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["", "a", "b"]);
        assert_eq!(options[0].label, SELECT_PLACEHOLDER);
        assert_eq!(
            options.iter().filter(|o| o.selected).map(|o| o.value.as_str()).collect::<Vec<_>>(),
            vec!["b"]
        );
    }

    #[test]
    fn test_multiselect_marks_every_selected_id() {
        let field = FieldDescriptor::new("tags", FieldKind::MultiSelect(options()));
        let schema = vec![field.clone()];
        let mut state = FormState::new(&schema);
        state.set("tags", FieldValue::from(vec!["a".to_string(), "b".to_string()]));

        let Widget::MultiSelect { options } = plan_field(&field, &state, "").widget else {
            panic!("expected a multiselect widget");
        };
        assert!(options.iter().all(|o| o.selected));
    }

    #[test]
    fn test_file_preview_only_once_a_reference_is_stored() {
        let field = FieldDescriptor::new("avatar", FieldKind::File);
        let schema = vec![field.clone()];
        let mut state = FormState::new(&schema);

        let base = "http://localhost:5000";
        assert_eq!(plan_field(&field, &state, base).widget, Widget::File { preview: None });

        state.set("avatar", FieldValue::from("uploads/x.png"));
        assert_eq!(
            plan_field(&field, &state, base).widget,
            Widget::File {
                preview: Some("http://localhost:5000/uploads/x.png".to_string())
            }
        );
    }

    #[test]
    fn test_card_children_carry_their_own_errors() {
        let schema = vec![FieldDescriptor::new(
            "address",
            FieldKind::Card(vec![
                FieldDescriptor::new("street", FieldKind::Text).with_title("Street"),
                FieldDescriptor::new("city", FieldKind::Text).with_title("City"),
            ]),
        )
        .with_title("Address")];
        let mut state = FormState::new(&schema);
        let mut errors = FieldErrors::new();
        errors.insert("city".to_string(), "This field is required".to_string());
        errors.insert("address".to_string(), "never shown".to_string());
        state.replace_errors(errors);

        let views = plan_form(&schema, &state, "");
        assert_eq!(views[0].error, None);
        let Widget::Card { legend, children } = &views[0].widget else {
            panic!("expected a card widget");
        };
        assert_eq!(legend, "Address");
        assert_eq!(children[0].error, None);
        assert_eq!(children[1].error.as_deref(), Some("This field is required"));
    }

    #[test]
    fn test_unknown_kind_renders_nothing() {
        let field = FieldDescriptor::new("color", FieldKind::Unknown("colorpicker".to_string()));
        let schema = vec![field.clone()];
        let state = FormState::new(&schema);

        assert_eq!(plan_field(&field, &state, "").widget, Widget::Nothing);
    }
}
