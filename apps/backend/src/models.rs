use async_graphql::{ID, InputObject, Interface, SimpleObject};

use crate::id::GlobalId;

pub mod graphql {
    use super::*;

    /// A video on Egghead.io
    #[derive(SimpleObject, Debug, Clone)]
    pub struct Video {
        /// The ID of an object
        pub id: ID,
        /// The title of the video.
        pub title: Option<String>,
        /// The duration of the video (in seconds)
        pub duration: Option<i32>,
        /// Whether or not the viewer has watched the video.
        pub watched: Option<bool>,
    }

    /// An object with an ID
    #[derive(Interface, Debug, Clone)]
    #[graphql(field(name = "id", ty = "&ID", desc = "The id of the object."))]
    pub enum Node {
        Video(Video),
    }

    #[derive(InputObject, Debug)]
    pub struct AddVideoInput {
        /// The title of the video.
        pub title: String,
        /// The duration of the video (in seconds)
        pub duration: i32,
        /// Whether or not the viewer has watched the video.
        pub watched: bool,
        pub client_mutation_id: Option<String>,
    }

    #[derive(SimpleObject, Debug)]
    pub struct AddVideoPayload {
        pub video: Option<Video>,
        pub client_mutation_id: Option<String>,
    }

    #[derive(SimpleObject, Debug)]
    pub struct VideoConnectionFields {
        /// A count of the total number of objects in the connection.
        pub total_count: Option<i32>,
    }
}

pub fn convert_to_graphql_video(video: services::Video) -> graphql::Video {
    let id = GlobalId::new(services::NodeKind::Video, &video.id);
    graphql::Video {
        id: id.into(),
        title: Some(video.title),
        duration: Some(video.duration),
        watched: Some(video.watched),
    }
}

pub fn convert_to_graphql_node(entity: services::NodeEntity) -> graphql::Node {
    match entity {
        services::NodeEntity::Video(video) => graphql::Node::Video(convert_to_graphql_video(video)),
    }
}

pub fn convert_from_graphql_input(input: &graphql::AddVideoInput) -> services::NewVideo {
    services::NewVideo {
        title: input.title.clone(),
        duration: input.duration,
        watched: input.watched,
    }
}
