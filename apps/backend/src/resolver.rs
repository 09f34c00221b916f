use std::sync::Arc;

use async_graphql::{
    Context, EmptySubscription, Error, ID, Object, Result, Schema,
    connection::{Connection, Edge, EmptyFields},
};
use services::VideoService;

use crate::{
    id::GlobalId,
    models::{
        convert_from_graphql_input, convert_to_graphql_node, convert_to_graphql_video,
        graphql::{AddVideoInput, AddVideoPayload, Node, Video, VideoConnectionFields},
    },
    pagination::{OffsetCursor, Window, cursor_offset},
};

pub type VideoSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub type VideoConnection = Connection<OffsetCursor, Video, VideoConnectionFields, EmptyFields>;

pub fn build_schema(service: VideoService) -> VideoSchema {
    tracing::debug!("Building GraphQL schema");
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(Arc::new(service))
        .finish()
}

/// Records `error` against the field being resolved. The field itself
/// resolves to `null` and sibling fields keep their data.
fn report_field_error(gql_ctx: &Context<'_>, error: Error) {
    tracing::debug!("Field error: {}", error.message);
    gql_ctx.add_error(gql_ctx.set_error_path(error.into_server_error(gql_ctx.item.pos)));
}

fn non_negative(name: &str, value: Option<i32>) -> Result<Option<usize>> {
    value
        .map(|value| {
            usize::try_from(value).map_err(|_| {
                Error::new(format!("Argument \"{name}\" must be a non-negative integer"))
            })
        })
        .transpose()
}

async fn find_node(service: &VideoService, id: &str) -> Result<Option<Node>> {
    let global_id: GlobalId = id
        .parse()
        .map_err(|e| Error::new(format!("invalid global id: {e}")))?;
    tracing::debug!("GraphQL resolving node {:?}", global_id);

    let entity = service
        .resolve_node(global_id.type_name(), global_id.local_id())
        .await?;
    if let Some(entity) = &entity {
        tracing::debug!("Resolved node of type {}", entity.kind());
    }
    Ok(entity.map(convert_to_graphql_node))
}

async fn load_videos(
    service: &VideoService,
    after: Option<&str>,
    before: Option<&str>,
    first: Option<i32>,
    last: Option<i32>,
) -> Result<VideoConnection> {
    let first = non_negative("first", first)?;
    let last = non_negative("last", last)?;

    let videos = service.list_videos().await;
    let window = Window::compute(
        videos.len(),
        cursor_offset(after),
        cursor_offset(before),
        first,
        last,
    );
    let edges: Vec<_> = window
        .slice(&videos)
        .map(|(offset, video)| Edge::new(OffsetCursor(offset), convert_to_graphql_video(video.clone())))
        .collect();

    // Counts the edges of this page, not every stored video.
    let total_count = i32::try_from(edges.len())?;
    let mut connection = VideoConnection::with_additional_fields(
        window.has_previous_page,
        window.has_next_page,
        VideoConnectionFields {
            total_count: Some(total_count),
        },
    );
    connection.edges.extend(edges);
    Ok(connection)
}

pub struct QueryRoot;

/// The root query type
#[Object(name = "QueryType")]
impl QueryRoot {
    /// Fetches an object given its ID
    async fn node(
        &self,
        gql_ctx: &Context<'_>,
        #[graphql(desc = "The ID of an object")] id: ID,
    ) -> Option<Node> {
        let service = gql_ctx.data_unchecked::<Arc<VideoService>>();
        match find_node(service, &id).await {
            Ok(node) => node,
            Err(e) => {
                report_field_error(gql_ctx, e);
                None
            }
        }
    }

    /// The video type.
    async fn video(
        &self,
        gql_ctx: &Context<'_>,
        #[graphql(desc = "The id of the video.")] id: ID,
    ) -> Option<Video> {
        let service = gql_ctx.data_unchecked::<Arc<VideoService>>();
        service.get_video(&id).await.map(convert_to_graphql_video)
    }

    /// A collection of videos.
    async fn videos(
        &self,
        gql_ctx: &Context<'_>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
    ) -> Option<VideoConnection> {
        let service = gql_ctx.data_unchecked::<Arc<VideoService>>();
        match load_videos(service, after.as_deref(), before.as_deref(), first, last).await {
            Ok(connection) => Some(connection),
            Err(e) => {
                report_field_error(gql_ctx, e);
                None
            }
        }
    }
}

pub struct MutationRoot;

/// The root mutation
#[Object(name = "Mutation")]
impl MutationRoot {
    async fn create_video(
        &self,
        gql_ctx: &Context<'_>,
        input: AddVideoInput,
    ) -> Result<AddVideoPayload> {
        tracing::info!("GraphQL creating video");
        let service = gql_ctx.data_unchecked::<Arc<VideoService>>();
        let video = service.create_video(convert_from_graphql_input(&input)).await;
        Ok(AddVideoPayload {
            video: Some(convert_to_graphql_video(video)),
            client_mutation_id: input.client_mutation_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use async_graphql::{PathSegment, Pos};
    use serde_json::{Value, json};

    use super::*;

    async fn run(schema: &VideoSchema, query: &str) -> Value {
        let response = schema.execute(query).await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        response.data.into_json().unwrap()
    }

    fn schema() -> VideoSchema {
        build_schema(VideoService::in_memory())
    }

    #[tokio::test]
    async fn video_by_local_id() {
        let data = run(&schema(), r#"{ video(id: "a") { id title duration watched } }"#).await;
        assert_eq!(
            data,
            json!({
                "video": {
                    "id": "VmlkZW86YQ==",
                    "title": "Create a graphql schema",
                    "duration": 120,
                    "watched": true,
                }
            })
        );
    }

    #[tokio::test]
    async fn unknown_video_is_null() {
        let data = run(&schema(), r#"{ video(id: "nope") { title } }"#).await;
        assert_eq!(data, json!({ "video": null }));
    }

    #[tokio::test]
    async fn videos_without_arguments() {
        let data = run(
            &schema(),
            "{ videos { totalCount edges { cursor node { title } } \
               pageInfo { hasNextPage hasPreviousPage startCursor endCursor } } }",
        )
        .await;
        assert_eq!(
            data,
            json!({
                "videos": {
                    "totalCount": 2,
                    "edges": [
                        { "cursor": "YXJyYXljb25uZWN0aW9uOjA=", "node": { "title": "Create a graphql schema" } },
                        { "cursor": "YXJyYXljb25uZWN0aW9uOjE=", "node": { "title": "ReactJS CLI" } },
                    ],
                    "pageInfo": {
                        "hasNextPage": false,
                        "hasPreviousPage": false,
                        "startCursor": "YXJyYXljb25uZWN0aW9uOjA=",
                        "endCursor": "YXJyYXljb25uZWN0aW9uOjE=",
                    },
                }
            })
        );
    }

    #[tokio::test]
    async fn total_count_reflects_the_page() {
        let data = run(
            &schema(),
            "{ videos(first: 1) { totalCount edges { node { title } } pageInfo { hasNextPage } } }",
        )
        .await;
        assert_eq!(
            data,
            json!({
                "videos": {
                    "totalCount": 1,
                    "edges": [{ "node": { "title": "Create a graphql schema" } }],
                    "pageInfo": { "hasNextPage": true },
                }
            })
        );
    }

    #[tokio::test]
    async fn paging_with_cursors() {
        let schema = schema();
        let data = run(
            &schema,
            r#"{ videos(after: "YXJyYXljb25uZWN0aW9uOjA=") { totalCount edges { node { title } } } }"#,
        )
        .await;
        assert_eq!(data["videos"]["totalCount"], 1);
        assert_eq!(data["videos"]["edges"][0]["node"]["title"], "ReactJS CLI");

        let data = run(
            &schema,
            "{ videos(last: 1) { edges { node { title } } pageInfo { hasPreviousPage } } }",
        )
        .await;
        assert_eq!(data["videos"]["edges"][0]["node"]["title"], "ReactJS CLI");
        assert_eq!(data["videos"]["pageInfo"]["hasPreviousPage"], true);
    }

    #[tokio::test]
    async fn negative_first_only_nulls_the_connection() {
        let response = schema()
            .execute(r#"{ video(id: "a") { title } videos(first: -1) { totalCount } }"#)
            .await;
        assert_eq!(response.errors.len(), 1);
        assert_eq!(
            response.errors[0].message,
            r#"Argument "first" must be a non-negative integer"#
        );
        assert_eq!(
            response.data.into_json().unwrap(),
            json!({ "video": { "title": "Create a graphql schema" }, "videos": null })
        );
    }

    #[tokio::test]
    async fn unreadable_cursor_is_ignored() {
        // "Video:a" is not an array connection cursor.
        let data = run(
            &schema(),
            r#"{ videos(after: "VmlkZW86YQ==", before: "???") { totalCount edges { node { title } } } }"#,
        )
        .await;
        assert_eq!(data["videos"]["totalCount"], 2);
        assert_eq!(data["videos"]["edges"][0]["node"]["title"], "Create a graphql schema");
    }

    #[tokio::test]
    async fn first_and_last_together() {
        let data = run(
            &schema(),
            "{ videos(first: 2, last: 1) { totalCount edges { node { title } } \
               pageInfo { hasNextPage hasPreviousPage } } }",
        )
        .await;
        assert_eq!(
            data,
            json!({
                "videos": {
                    "totalCount": 1,
                    "edges": [{ "node": { "title": "ReactJS CLI" } }],
                    "pageInfo": { "hasNextPage": false, "hasPreviousPage": true },
                }
            })
        );
    }

    #[tokio::test]
    async fn node_matches_video() {
        let schema = schema();
        let node = run(
            &schema,
            r#"{ node(id: "VmlkZW86YQ==") { __typename id ... on Video { title duration watched } } }"#,
        )
        .await;
        let video = run(&schema, r#"{ video(id: "a") { id title duration watched } }"#).await;

        assert_eq!(node["node"]["__typename"], "Video");
        let mut node = node["node"].clone();
        node.as_object_mut().unwrap().remove("__typename");
        assert_eq!(node, video["video"]);
    }

    #[tokio::test]
    async fn node_miss_is_null() {
        // ("Video", "zzz")
        let data = run(&schema(), r#"{ node(id: "VmlkZW86enp6") { id } }"#).await;
        assert_eq!(data, json!({ "node": null }));
    }

    #[tokio::test]
    async fn node_with_unknown_type_is_an_error() {
        // ("Series", "a")
        let response = schema().execute(r#"{ node(id: "U2VyaWVzOmE=") { id } }"#).await;
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].message, "unknown node type: Series");
        assert_eq!(response.errors[0].path, [PathSegment::Field("node".to_string())]);
        assert_eq!(response.errors[0].locations, [Pos { line: 1, column: 3 }]);
        assert_eq!(response.data.into_json().unwrap(), json!({ "node": null }));
    }

    #[tokio::test]
    async fn node_error_keeps_sibling_fields() {
        for id in ["U2VyaWVzOmE=", "!!!"] {
            let query = format!(r#"{{ video(id: "a") {{ title }} node(id: "{id}") {{ id }} }}"#);
            let response = schema().execute(query.as_str()).await;
            assert_eq!(response.errors.len(), 1, "{id}");
            assert_eq!(
                response.data.into_json().unwrap(),
                json!({ "video": { "title": "Create a graphql schema" }, "node": null }),
                "{id}"
            );
        }
    }

    #[tokio::test]
    async fn node_with_malformed_id_is_an_error() {
        let response = schema().execute(r#"{ node(id: "!!!") { id } }"#).await;
        assert_eq!(response.errors.len(), 1);
        assert!(response.errors[0].message.starts_with("invalid global id"));
        assert_eq!(response.data.into_json().unwrap(), json!({ "node": null }));
    }

    #[tokio::test]
    async fn create_video_round_trip() {
        let schema = schema();
        let data = run(
            &schema,
            r#"mutation {
                createVideo(input: { title: "T", duration: 10, watched: false, clientMutationId: "abc" }) {
                    clientMutationId
                    video { id title duration watched }
                }
            }"#,
        )
        .await;
        assert_eq!(
            data,
            json!({
                "createVideo": {
                    "clientMutationId": "abc",
                    "video": { "id": "VmlkZW86VkE9PQ==", "title": "T", "duration": 10, "watched": false },
                }
            })
        );

        let data = run(&schema, "{ videos { totalCount edges { node { title } } } }").await;
        assert_eq!(data["videos"]["totalCount"], 3);
        assert_eq!(data["videos"]["edges"][2]["node"]["title"], "T");

        let data = run(&schema, r#"{ video(id: "VA==") { title } }"#).await;
        assert_eq!(data["video"]["title"], "T");
    }

    #[tokio::test]
    async fn create_video_without_client_mutation_id() {
        let data = run(
            &schema(),
            r#"mutation { createVideo(input: { title: "U", duration: 1, watched: true }) { clientMutationId } }"#,
        )
        .await;
        assert_eq!(data, json!({ "createVideo": { "clientMutationId": null } }));
    }

    #[tokio::test]
    async fn missing_input_field_fails_validation() {
        let response = schema()
            .execute(r#"mutation { createVideo(input: { title: "T", duration: 1 }) { clientMutationId } }"#)
            .await;
        assert!(response.is_err());
        assert_eq!(response.data, async_graphql::Value::Null);
    }

    #[test]
    fn sdl_uses_relay_type_names() {
        let sdl = schema().sdl();
        for needle in [
            "type QueryType",
            "type Mutation",
            "interface Node",
            "type Video implements Node",
            "type VideoConnection",
            "totalCount: Int\n",
            "title: String\n",
            "input AddVideoInput",
            "type AddVideoPayload",
        ] {
            assert!(sdl.contains(needle), "missing `{needle}` in:\n{sdl}");
        }
    }
}
