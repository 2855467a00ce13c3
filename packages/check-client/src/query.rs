//! The project export query and its parameters.
//!
//! The API exposes a Relay-style graph: a project node owns a paginated
//! connection of media items, each item carrying its tags, tasks,
//! comments and event log. One fixed query drives the whole export;
//! only the node id and the pagination cursor vary between calls.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Items requested per page. The API caps result slices, so the
/// paginator always asks for exactly this many.
pub const PAGE_SIZE: usize = 20;

/// GraphQL document with `$projectId`, `$pageSize` and `$cursor`
/// placeholders. Values are substituted textually; the cursor is an
/// opaque token the API hands back in `pageInfo.endCursor`.
const MEDIA_PAGE_QUERY: &str = r#"
query {
  node(id: "$projectId") {
    ... on Project {
      id
      dbid
      title
      project_medias(first: $pageSize, after: "$cursor") {
        pageInfo {
          hasNextPage
          startCursor
          hasPreviousPage
          endCursor
        }
        edges { cursor node {
          user {
            id
            name
          }
          id
          dbid
          created_at
          report_type
          metadata
          last_status
          media {
            quote
            picture
            url
            embed
          }
          tags { edges { node {
            tag_text
          }}}
          tasks { edges { node {
            annotator {
              user {
                id
                name
              }
            }
            created_at
            label
            status
            responses { edges { node {
              annotator {
                user {
                  id
                  name
                }
              }
              created_at
              content
            }}}
            log { edges { node {
              annotation {
                annotator {
                  user {
                    id
                    name
                  }
                }
                created_at
                content
              }
              event_type
            }}}
          }}}
          comments: annotations(annotation_type: "comment") { edges { node {
            annotator {
              user {
                id
                name
              }
            }
            created_at
            content
          }}}
          log { edges { node {
            created_at
            user {
              id
            }
            event_type
          }}}
        }}
      }
    }
  }
}
"#;

/// Derive the opaque node id for a project path.
///
/// Only the last `/`-separated segment of the caller-supplied path is
/// used; the API identifies projects by the base64 encoding of
/// `Project/<segment>`.
pub fn project_node_id(project_path: &str) -> String {
    let segment = project_path.rsplit('/').next().unwrap_or(project_path);
    STANDARD.encode(format!("Project/{segment}"))
}

/// Render one page of the export query.
pub fn media_page_query(project_node_id: &str, page_size: usize, cursor: &str) -> String {
    MEDIA_PAGE_QUERY
        .replace("$projectId", project_node_id)
        .replace("$pageSize", &page_size.to_string())
        .replace("$cursor", cursor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_encodes_last_path_segment() {
        // base64("Project/7")
        assert_eq!(project_node_id("7"), "UHJvamVjdC83");
        assert_eq!(project_node_id("team/workspace/7"), "UHJvamVjdC83");
    }

    #[test]
    fn node_id_of_bare_path_uses_whole_string() {
        assert_eq!(project_node_id("42"), project_node_id("anything/42"));
    }

    #[test]
    fn query_substitutes_all_placeholders() {
        let q = media_page_query("UHJvamVjdC83", PAGE_SIZE, "abc123");
        assert!(q.contains(r#"node(id: "UHJvamVjdC83")"#));
        assert!(q.contains(r#"project_medias(first: 20, after: "abc123")"#));
        assert!(!q.contains('$'));
    }

    #[test]
    fn first_page_uses_empty_cursor() {
        let q = media_page_query(&project_node_id("7"), PAGE_SIZE, "");
        assert!(q.contains(r#"after: """#));
    }
}
