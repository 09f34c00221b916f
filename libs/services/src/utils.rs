use base64::{Engine, engine::general_purpose::STANDARD};

/// Local ids of created videos are the padded base64 encoding of their title.
pub fn video_id_for_title(title: &str) -> String {
    STANDARD.encode(title.as_bytes())
}
