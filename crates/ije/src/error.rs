use crate::registry::RecordKind;

/// Hard failures of the IJE layer.
///
/// Field-level problems (width mismatches, missing lookup mappings) are not errors; they are
/// accumulated as [`crate::Issue`]s on the codec and never abort a pass.
#[derive(Debug, thiserror::Error)]
pub enum IjeError {
    #[error("IJE input is empty")]
    EmptyInput,

    #[error("no IJE layout is available for {0:?} records")]
    UnsupportedKind(RecordKind),

    #[error("invalid {kind:?} registry: {reason}")]
    InvalidRegistry { kind: RecordKind, reason: String },

    #[error("unknown IJE field: {0}")]
    UnknownField(String),

    #[error("record error: {0}")]
    Record(#[from] vital_core::RecordError),
}

pub type IjeResult<T> = std::result::Result<T, IjeError>;
