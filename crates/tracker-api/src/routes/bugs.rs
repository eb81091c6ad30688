//! 버그 endpoint.
//!
//! - `POST /projects/{project_id}/bugs` - 버그 보고 (Tester)
//! - `GET /projects/{project_id}/bugs` - 버그 목록
//! - `PUT /projects/{project_id}/bugs/{bug_id}/assign` - 담당자 지정
//! - `PUT /projects/{project_id}/bugs/{bug_id}/resolve` - 해결

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use utoipa::ToSchema;
use uuid::Uuid;

use tracker_core::{Bug, NewBug, Priority, Severity};

use super::{parse_id, required};
use crate::auth::{JwtAuth, ReadAuth, TesterAuth};
use crate::error::{ApiErrorResponse, ApiJson, ApiResult};
use crate::state::AppState;

/// 버그 보고 요청.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportBugRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub severity: Option<Severity>,
    pub priority: Option<Priority>,
    pub commit_link: Option<String>,
}

impl ReportBugRequest {
    fn into_input(self) -> ApiResult<NewBug> {
        Ok(NewBug {
            title: required(self.title, "Invalid bug data: title is required")?,
            description: self.description,
            severity: required(self.severity, "Invalid bug data: severity is required")?,
            priority: required(self.priority, "Invalid bug data: priority is required")?,
            commit_link: self.commit_link,
        })
    }
}

/// 버그 보고 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportBugResponse {
    pub bug_id: Uuid,
    pub message: String,
}

/// 담당자 지정 요청.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignBugRequest {
    pub assignee: Option<String>,
}

/// 해결 요청. `status`는 `"Resolved"`만 허용됩니다.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveBugRequest {
    pub status: Option<String>,
    pub resolution_commit_link: Option<String>,
}

/// 변경된 버그를 담은 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BugResponse {
    pub message: String,
    pub bug: Bug,
}

fn path_ids(project_id: &str, bug_id: &str) -> ApiResult<(Uuid, Uuid)> {
    Ok((parse_id(project_id, "Project")?, parse_id(bug_id, "Bug")?))
}

/// POST /projects/{project_id}/bugs
#[utoipa::path(
    post,
    path = "/projects/{project_id}/bugs",
    params(("project_id" = String, Path, description = "프로젝트 ID")),
    request_body = ReportBugRequest,
    responses(
        (status = 201, description = "버그 보고", body = ReportBugResponse),
        (status = 400, description = "잘못된 버그 데이터", body = ApiErrorResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 403, description = "Tester 역할 필요", body = ApiErrorResponse),
        (status = 404, description = "프로젝트 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "bugs"
)]
pub async fn report_bug(
    State(state): State<Arc<AppState>>,
    TesterAuth(claims): TesterAuth,
    Path(project_id): Path<String>,
    ApiJson(req): ApiJson<ReportBugRequest>,
) -> ApiResult<(StatusCode, Json<ReportBugResponse>)> {
    debug!(reporter = %claims.sub, project_id = %project_id, "POST /bugs");

    let input = req.into_input()?;
    let project_id = parse_id(&project_id, "Project")?;
    let bug = state.bugs.report(project_id, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ReportBugResponse {
            bug_id: bug.id,
            message: format!("Bug successfully reported in project {}", project_id),
        }),
    ))
}

/// GET /projects/{project_id}/bugs
#[utoipa::path(
    get,
    path = "/projects/{project_id}/bugs",
    params(("project_id" = String, Path, description = "프로젝트 ID")),
    responses(
        (status = 200, description = "버그 목록", body = Vec<Bug>),
        (status = 401, description = "조회가 공개되지 않은 경우 인증 필요", body = ApiErrorResponse)
    ),
    tag = "bugs"
)]
pub async fn list_bugs(
    State(state): State<Arc<AppState>>,
    ReadAuth(_claims): ReadAuth,
    Path(project_id): Path<String>,
) -> ApiResult<Json<Vec<Bug>>> {
    // 형식이 맞지 않는 ID는 어떤 버그와도 일치하지 않는다
    let Ok(project_id) = Uuid::parse_str(&project_id) else {
        return Ok(Json(Vec::new()));
    };
    Ok(Json(state.bugs.list(project_id).await?))
}

/// PUT /projects/{project_id}/bugs/{bug_id}/assign
#[utoipa::path(
    put,
    path = "/projects/{project_id}/bugs/{bug_id}/assign",
    params(
        ("project_id" = String, Path, description = "프로젝트 ID"),
        ("bug_id" = String, Path, description = "버그 ID")
    ),
    request_body = AssignBugRequest,
    responses(
        (status = 200, description = "담당자 지정", body = BugResponse),
        (status = 400, description = "담당자 누락", body = ApiErrorResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 404, description = "버그 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "bugs"
)]
pub async fn assign_bug(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    Path((project_id, bug_id)): Path<(String, String)>,
    ApiJson(req): ApiJson<AssignBugRequest>,
) -> ApiResult<Json<BugResponse>> {
    debug!(requester = %claims.sub, bug_id = %bug_id, "PUT /bugs/assign");

    let assignee = required(req.assignee, "Invalid assignment data: assignee is required")?;
    let (project_id, bug_id) = path_ids(&project_id, &bug_id)?;
    let bug = state.bugs.assign(project_id, bug_id, &assignee).await?;

    Ok(Json(BugResponse {
        message: format!(
            "Bug {} successfully assigned to {} in project {}",
            bug_id,
            assignee.trim(),
            project_id
        ),
        bug,
    }))
}

/// PUT /projects/{project_id}/bugs/{bug_id}/resolve
#[utoipa::path(
    put,
    path = "/projects/{project_id}/bugs/{bug_id}/resolve",
    params(
        ("project_id" = String, Path, description = "프로젝트 ID"),
        ("bug_id" = String, Path, description = "버그 ID")
    ),
    request_body = ResolveBugRequest,
    responses(
        (status = 200, description = "해결 처리", body = BugResponse),
        (status = 400, description = "status가 \"Resolved\"가 아님", body = ApiErrorResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 404, description = "버그 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "bugs"
)]
pub async fn resolve_bug(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    Path((project_id, bug_id)): Path<(String, String)>,
    ApiJson(req): ApiJson<ResolveBugRequest>,
) -> ApiResult<Json<BugResponse>> {
    debug!(requester = %claims.sub, bug_id = %bug_id, "PUT /bugs/resolve");

    let status = required(req.status, "Invalid resolution data: status is required")?;
    let (project_id, bug_id) = path_ids(&project_id, &bug_id)?;
    let bug = state
        .bugs
        .resolve(project_id, bug_id, &status, req.resolution_commit_link)
        .await?;

    Ok(Json(BugResponse {
        message: format!(
            "Bug {} successfully resolved in project {}",
            bug_id, project_id
        ),
        bug,
    }))
}

/// 버그 라우터 생성. 경로가 프로젝트 ID를 포함하므로 루트에 병합합니다.
pub fn bugs_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/projects/{project_id}/bugs",
            post(report_bug).get(list_bugs),
        )
        .route(
            "/projects/{project_id}/bugs/{bug_id}/assign",
            put(assign_bug),
        )
        .route(
            "/projects/{project_id}/bugs/{bug_id}/resolve",
            put(resolve_bug),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use serde_json::json;
    use tower::ServiceExt;
    use tracker_core::{BugStatus, NewProject, Role};

    use crate::state::create_test_state;

    struct Fixture {
        app: Router,
        state: Arc<AppState>,
        project_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let state = Arc::new(create_test_state());
        let project = state
            .projects
            .create(
                NewProject {
                    name: "Bug Tracking Application".to_string(),
                    repository_url: "https://github.com/example/bugs".to_string(),
                    team_members: vec![],
                },
                "m@x.com",
            )
            .await
            .unwrap();
        let app = bugs_router().with_state(state.clone());
        Fixture {
            app,
            state,
            project_id: project.id,
        }
    }

    fn send(method: &str, uri: &str, token: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer {}", token))
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn bug_body() -> serde_json::Value {
        json!({
            "title": "Registration form not submitting",
            "description": "Clicking submit does nothing",
            "severity": "High",
            "priority": "Medium"
        })
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    async fn report(f: &Fixture) -> Uuid {
        let tester = f.state.tokens.issue("t@x.com", Role::Tester).unwrap();
        let response = f
            .app
            .clone()
            .oneshot(send(
                "POST",
                &format!("/projects/{}/bugs", f.project_id),
                &tester,
                bug_body(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["bugId"]
            .as_str()
            .unwrap()
            .parse()
            .unwrap()
    }

    #[tokio::test]
    async fn test_report_requires_tester() {
        let f = fixture().await;
        let member = f.state.tokens.issue("m@x.com", Role::Member).unwrap();

        let response = f
            .app
            .clone()
            .oneshot(send(
                "POST",
                &format!("/projects/{}/bugs", f.project_id),
                &member,
                bug_body(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        report(&f).await;
    }

    #[tokio::test]
    async fn test_report_validation_and_missing_project() {
        let f = fixture().await;
        let tester = f.state.tokens.issue("t@x.com", Role::Tester).unwrap();

        let response = f
            .app
            .clone()
            .oneshot(send(
                "POST",
                &format!("/projects/{}/bugs", f.project_id),
                &tester,
                json!({"title": "No severity", "priority": "Low"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = f
            .app
            .clone()
            .oneshot(send(
                "POST",
                &format!("/projects/{}/bugs", f.project_id),
                &tester,
                json!({"title": "Bad", "severity": "Critical", "priority": "Low"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = f
            .app
            .clone()
            .oneshot(send(
                "POST",
                &format!("/projects/{}/bugs", Uuid::new_v4()),
                &tester,
                bug_body(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_bugs() {
        let f = fixture().await;
        let bug_id = report(&f).await;

        let response = f
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/projects/{}/bugs", f.project_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bugs: Vec<Bug> = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(bugs.len(), 1);
        assert_eq!(bugs[0].id, bug_id);
        assert_eq!(bugs[0].status, BugStatus::Open);

        let response = f
            .app
            .oneshot(
                Request::builder()
                    .uri("/projects/not-a-uuid/bugs")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_assign_and_resolve() {
        let f = fixture().await;
        let bug_id = report(&f).await;
        let member = f.state.tokens.issue("m@x.com", Role::Member).unwrap();
        let base = format!("/projects/{}/bugs/{}", f.project_id, bug_id);

        let response = f
            .app
            .clone()
            .oneshot(send(
                "PUT",
                &format!("{}/assign", base),
                &member,
                json!({"assignee": "dev@x.com"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["bug"]["assignee"], "dev@x.com");

        let response = f
            .app
            .clone()
            .oneshot(send(
                "PUT",
                &format!("{}/resolve", base),
                &member,
                json!({"status": "InProgress"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = f
            .app
            .clone()
            .oneshot(send(
                "PUT",
                &format!("{}/resolve", base),
                &member,
                json!({"status": "Resolved", "resolutionCommitLink": "https://git/commit/abc"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["bug"]["status"], "Resolved");
        assert_eq!(body["bug"]["commitLink"], "https://git/commit/abc");
    }

    #[tokio::test]
    async fn test_assign_missing_bug() {
        let f = fixture().await;
        let tester = f.state.tokens.issue("t@x.com", Role::Tester).unwrap();

        let response = f
            .app
            .clone()
            .oneshot(send(
                "PUT",
                &format!("/projects/{}/bugs/{}/assign", f.project_id, Uuid::new_v4()),
                &tester,
                json!({"assignee": "dev@x.com"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = f
            .app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/projects/{}/bugs/{}/assign", f.project_id, Uuid::new_v4()))
                    .header("content-type", "application/json")
                    .body(Body::from(json!({"assignee": "dev@x.com"}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
