use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub duration: i32,
    pub watched: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVideo {
    pub title: String,
    pub duration: i32,
    pub watched: bool,
}

pub fn seed_videos() -> Vec<Video> {
    vec![
        Video {
            id: "a".to_string(),
            title: "Create a graphql schema".to_string(),
            duration: 120,
            watched: true,
        },
        Video {
            id: "b".to_string(),
            title: "ReactJS CLI".to_string(),
            duration: 240,
            watched: false,
        },
    ]
}
