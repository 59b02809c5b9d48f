//! API Route Resolution
//! Mission: Deterministic (method, path) -> typed route mapping for /api/*

use axum::http::Method;

/// Controller identifiers are always exactly 16 characters; the width is a
/// contract with the external controller's id format.
pub const NETWORK_ID_LEN: usize = 16;

/// Typed outcome of resolving a path under `/api/`. Each variant maps to
/// exactly one handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRoute {
    Status,
    NetworkList,
    NetworkCreate,
    NetworkDetail(String),
    NetworkUpdate(String),
    NetworkDelete(String),
    MemberList(String),
    MemberDetail(String, String),
    MemberUpdate(String, String),
    MemberDelete(String, String),
}

/// Resolve the remainder of a path after the `/api/` prefix.
///
/// Segment patterns, in match order:
/// - `status`
/// - `networks`
/// - `networks/<16-char-id>`
/// - `networks/<16-char-id>/member`
/// - `networks/<16-char-id>/member/<member-id...>`
///
/// The network id width is a validated precondition: segments of any other
/// length resolve to `None`, never to a sliced-out-of-bounds id. Member ids
/// are everything after the `member/` prefix, slashes included.
pub fn resolve(method: &Method, rest: &str) -> Option<ApiRoute> {
    let segments: Vec<&str> = rest.split('/').collect();

    match segments.as_slice() {
        ["status"] if *method == Method::GET => Some(ApiRoute::Status),

        ["networks"] if *method == Method::GET => Some(ApiRoute::NetworkList),
        ["networks"] if *method == Method::POST => Some(ApiRoute::NetworkCreate),

        ["networks", id] if is_network_id(id) => {
            let id = id.to_string();
            if *method == Method::GET {
                Some(ApiRoute::NetworkDetail(id))
            } else if *method == Method::POST {
                Some(ApiRoute::NetworkUpdate(id))
            } else if *method == Method::DELETE {
                Some(ApiRoute::NetworkDelete(id))
            } else {
                None
            }
        }

        ["networks", id, "member"] if is_network_id(id) && *method == Method::GET => {
            Some(ApiRoute::MemberList(id.to_string()))
        }

        ["networks", id, "member", member @ ..] if is_network_id(id) => {
            let member_id = member.join("/");
            if member_id.is_empty() {
                return None;
            }
            let id = id.to_string();
            if *method == Method::GET {
                Some(ApiRoute::MemberDetail(id, member_id))
            } else if *method == Method::POST {
                Some(ApiRoute::MemberUpdate(id, member_id))
            } else if *method == Method::DELETE {
                Some(ApiRoute::MemberDelete(id, member_id))
            } else {
                None
            }
        }

        _ => None,
    }
}

fn is_network_id(segment: &str) -> bool {
    segment.len() == NETWORK_ID_LEN
}
