use std::{fmt, str::FromStr};

use base64::{Engine, engine::general_purpose::STANDARD};
use services::NodeKind;

/// An opaque, globally-unique identifier for every node the API returns.
///
/// On the wire this is the base64 encoding of `"<TypeName>:<localId>"`, which
/// is what Relay clients expect. The type name is kept as a plain string so
/// that ids of unknown types still decode and can be reported as such by the
/// node resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlobalId {
    type_name: String,
    local_id: String,
}

impl GlobalId {
    pub fn new(kind: NodeKind, local_id: impl Into<String>) -> Self {
        Self {
            type_name: kind.to_string(),
            local_id: local_id.into(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn local_id(&self) -> &str {
        &self.local_id
    }
}

impl FromStr for GlobalId {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = STANDARD.decode(s).map_err(|_| "invalid base64")?;
        let decoded = String::from_utf8(bytes).map_err(|_| "invalid utf-8")?;
        let (type_name, local_id) = decoded.split_once(':').ok_or("missing type separator")?;

        Ok(Self {
            type_name: type_name.to_string(),
            local_id: local_id.to_string(),
        })
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let raw = format!("{}:{}", self.type_name, self.local_id);
        f.write_str(&STANDARD.encode(raw))
    }
}
