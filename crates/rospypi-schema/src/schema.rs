//! Interface-definition file kinds.

use serde::{Deserialize, Serialize};

/// The interface-definition file kinds a message package can carry.
///
/// Each kind lives in its own subdirectory of the package module
/// (`msg/`, `srv/`, `action/`) with a matching file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    /// Plain message definitions (`*.msg`).
    Msg,
    /// Request/response service pairs (`*.srv`).
    Srv,
    /// Goal/result/feedback triples (`*.action`), expanded into messages
    /// before generation.
    Action,
}

impl SchemaKind {
    /// Every kind, in extraction order.
    pub const ALL: [SchemaKind; 3] = [SchemaKind::Msg, SchemaKind::Srv, SchemaKind::Action];

    /// Kinds handed to the generation engine, in generation order.
    pub const GENERATED: [SchemaKind; 2] = [SchemaKind::Msg, SchemaKind::Srv];

    /// Subdirectory holding files of this kind.
    pub fn dir_name(self) -> &'static str {
        match self {
            SchemaKind::Msg => "msg",
            SchemaKind::Srv => "srv",
            SchemaKind::Action => "action",
        }
    }

    /// File extension (without the dot) of files of this kind.
    pub fn extension(self) -> &'static str {
        self.dir_name()
    }
}

impl std::fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}
