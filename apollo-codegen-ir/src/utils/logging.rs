/// A wrapper around `tracing::trace!` attaching a serialized copy of a value to the event, so that
/// external tools can follow how shapes and fragments are built. Not related to snapshot testing.
///
/// Passing a value tags the event with the value's type name and a JSON rendering of it:
/// ```ignore
/// snapshot!(field_set, "built field set");
/// // Generates:
/// // trace!(snapshot = "apollo_codegen_ir::ir::IrFieldSet", data = "{ .. }", "built field set");
/// ```
/// Nothing is emitted unless the `snapshot_tracing` feature is enabled.
macro_rules! snapshot {
    ($value:expr, $msg:literal) => {
        #[cfg(feature = "snapshot_tracing")]
        match serde_json::to_string(&$value) {
            Ok(data) => tracing::trace!(
                snapshot = std::any::type_name_of_val(&$value),
                data,
                $msg
            ),
            Err(error) => tracing::trace!(
                snapshot = std::any::type_name_of_val(&$value),
                %error,
                $msg
            ),
        }
    };
}

pub(crate) use snapshot;
