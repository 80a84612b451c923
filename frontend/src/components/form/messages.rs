use common::engine::upload::UploadOutcome;
use common::model::value::FieldValue;

pub enum Msg {
    /// A widget changed; `value` replaces the field's value wholesale.
    SetValue { name: String, value: FieldValue },
    /// A file input changed. `file` is `None` when the selection was cleared.
    FileSelected {
        name: String,
        file: Option<web_sys::File>,
    },
    /// An upload started under `token` ended.
    UploadFinished { token: u64, outcome: UploadOutcome },
    Submit,
    /// The success display window carrying this token has ended.
    ClearSuccess(u64),
}
