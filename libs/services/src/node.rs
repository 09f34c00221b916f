use anyhow::{Result, anyhow};
use strum::{Display, EnumString};

use crate::{models::Video, store::VideoStore};

/// Every type that can be re-fetched through its global id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum NodeKind {
    Video,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeEntity {
    Video(Video),
}

impl NodeEntity {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Video(_) => NodeKind::Video,
        }
    }
}

/// Looks up the entity named by a decoded global id. An unknown type name is
/// an error, a known type with no matching record is `Ok(None)`.
pub fn resolve_node(
    store: &dyn VideoStore,
    type_name: &str,
    local_id: &str,
) -> Result<Option<NodeEntity>> {
    let kind: NodeKind = type_name
        .parse()
        .map_err(|_| anyhow!("unknown node type: {type_name}"))?;
    let entity = match kind {
        NodeKind::Video => store.get_by_id(local_id).map(NodeEntity::Video),
    };
    Ok(entity)
}
