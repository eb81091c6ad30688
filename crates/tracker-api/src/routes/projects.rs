//! 프로젝트 endpoint.
//!
//! - `POST /projects` - 프로젝트 생성 (Member)
//! - `GET /projects` - 프로젝트 목록
//! - `DELETE /projects/{project_id}` - 프로젝트 삭제 (Member)
//! - `POST /projects/{project_id}/add-tester` - 테스터 추가 (Member)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use utoipa::ToSchema;
use uuid::Uuid;

use tracker_core::{NewProject, Project};

use super::{parse_id, required, MessageResponse};
use crate::auth::{MemberAuth, ReadAuth};
use crate::error::{ApiErrorResponse, ApiJson, ApiResult};
use crate::state::AppState;

/// 프로젝트 생성 요청.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub name: Option<String>,
    pub repository_url: Option<String>,
    /// 팀 멤버 identity 목록 (배열이어야 함)
    pub team_members: Option<Vec<String>>,
}

impl CreateProjectRequest {
    fn into_input(self) -> ApiResult<NewProject> {
        Ok(NewProject {
            name: required(self.name, "Invalid project data: name is required")?,
            repository_url: required(
                self.repository_url,
                "Invalid project data: repositoryUrl is required",
            )?,
            team_members: required(
                self.team_members,
                "Invalid project data: teamMembers is required",
            )?,
        })
    }
}

/// 프로젝트 생성 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectResponse {
    pub project_id: Uuid,
    pub message: String,
}

/// 테스터 추가 요청.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddTesterRequest {
    pub tester_email: Option<String>,
}

/// 변경된 프로젝트를 담은 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProjectResponse {
    pub message: String,
    pub project: Project,
}

/// POST /projects
#[utoipa::path(
    post,
    path = "/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "프로젝트 생성", body = CreateProjectResponse),
        (status = 400, description = "잘못된 프로젝트 데이터", body = ApiErrorResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 403, description = "Member 역할 필요", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "projects"
)]
pub async fn create_project(
    State(state): State<Arc<AppState>>,
    MemberAuth(claims): MemberAuth,
    ApiJson(req): ApiJson<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<CreateProjectResponse>)> {
    debug!(requester = %claims.sub, "POST /projects");

    let project = state
        .projects
        .create(req.into_input()?, &claims.sub)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateProjectResponse {
            project_id: project.id,
            message: "Project successfully registered".to_string(),
        }),
    ))
}

/// GET /projects
#[utoipa::path(
    get,
    path = "/projects",
    responses(
        (status = 200, description = "프로젝트 목록", body = Vec<Project>),
        (status = 401, description = "조회가 공개되지 않은 경우 인증 필요", body = ApiErrorResponse)
    ),
    tag = "projects"
)]
pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    ReadAuth(_claims): ReadAuth,
) -> ApiResult<Json<Vec<Project>>> {
    Ok(Json(state.projects.list().await?))
}

/// DELETE /projects/{project_id}
#[utoipa::path(
    delete,
    path = "/projects/{project_id}",
    params(("project_id" = String, Path, description = "프로젝트 ID")),
    responses(
        (status = 200, description = "삭제 성공", body = MessageResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 403, description = "Member 역할 필요", body = ApiErrorResponse),
        (status = 404, description = "프로젝트 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "projects"
)]
pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    MemberAuth(claims): MemberAuth,
    Path(project_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    debug!(requester = %claims.sub, project_id = %project_id, "DELETE /projects");

    let id = parse_id(&project_id, "Project")?;
    state.projects.delete(id).await?;

    Ok(Json(MessageResponse::new(format!(
        "Project {} successfully deleted",
        id
    ))))
}

/// POST /projects/{project_id}/add-tester
#[utoipa::path(
    post,
    path = "/projects/{project_id}/add-tester",
    params(("project_id" = String, Path, description = "프로젝트 ID")),
    request_body = AddTesterRequest,
    responses(
        (status = 200, description = "테스터 추가", body = ProjectResponse),
        (status = 400, description = "테스터 이메일 누락", body = ApiErrorResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 403, description = "Member 역할 필요", body = ApiErrorResponse),
        (status = 404, description = "프로젝트 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "projects"
)]
pub async fn add_tester(
    State(state): State<Arc<AppState>>,
    MemberAuth(claims): MemberAuth,
    Path(project_id): Path<String>,
    ApiJson(req): ApiJson<AddTesterRequest>,
) -> ApiResult<Json<ProjectResponse>> {
    debug!(requester = %claims.sub, project_id = %project_id, "POST /projects/add-tester");

    let tester_email = required(req.tester_email, "Tester email is required")?;
    let id = parse_id(&project_id, "Project")?;
    let project = state.projects.add_tester(id, &tester_email).await?;

    Ok(Json(ProjectResponse {
        message: format!(
            "Tester {} successfully added to project {}",
            tester_email.trim(),
            id
        ),
        project,
    }))
}

/// 프로젝트 라우터 생성.
pub fn projects_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_project).get(list_projects))
        .route("/{project_id}", delete(delete_project))
        .route("/{project_id}/add-tester", post(add_tester))
}
