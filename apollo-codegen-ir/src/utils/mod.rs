//! Helpers shared by the build passes.

mod directive_list_ext;
pub(crate) mod logging;

pub(crate) use directive_list_ext::DirectiveListExt;
