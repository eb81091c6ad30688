//! JSON 파일 저장소.
//!
//! 데이터 디렉토리 구조:
//!
//! ```text
//! data/
//! ├── users.json      # [Account, ...]
//! ├── projects.json   # [Project, ...]
//! └── bugs.json       # [Bug, ...]
//! ```
//!
//! 쓰기는 같은 디렉토리의 임시 파일에 기록한 뒤 rename으로 교체합니다.
//! 쓰기 중 실패하면 메모리 상태도 바뀌지 않습니다.
//! 기록과 반영은 별도 태스크에서 실행되므로 호출 측 future가 취소되어도
//! 디스크와 메모리가 함께 바뀌거나 함께 유지됩니다.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use tracker_core::{Account, Bug, BugUpdate, Project};

use super::{Collection, Collections, RepositoryError, TrackerRepository};

/// 파일 기반 저장소.
///
/// 쓰기 요청은 `Mutex`로 직렬화되며, 잠금은 파일 교체가 끝날 때까지
/// 유지됩니다. 읽기도 같은 잠금을 거치므로 항상 디스크와 일치하는 상태를
/// 봅니다.
#[derive(Debug)]
pub struct JsonFileRepository {
    dir: PathBuf,
    data: Arc<Mutex<Collections>>,
}

impl JsonFileRepository {
    /// 디렉토리를 열고 기존 파일을 로드합니다. 디렉토리가 없으면 생성합니다.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| RepositoryError::Io {
                path: dir.clone(),
                source,
            })?;

        let data = Collections {
            users: load(&dir, Collection::Users).await?,
            projects: load(&dir, Collection::Projects).await?,
            bugs: load(&dir, Collection::Bugs).await?,
        };

        info!(
            dir = %dir.display(),
            users = data.users.len(),
            projects = data.projects.len(),
            bugs = data.bugs.len(),
            "JSON file repository opened"
        );

        Ok(Self {
            dir,
            data: Arc::new(Mutex::new(data)),
        })
    }

    /// 데이터 디렉토리 경로.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 사본에 변경을 적용하고, 변경된 컬렉션을 기록한 뒤에만 반영합니다.
    ///
    /// 기록과 반영은 잠금과 함께 spawn된 태스크로 넘어갑니다. 호출 측이
    /// 도중에 drop되어도 태스크는 끝까지 실행됩니다.
    async fn mutate<T>(
        &self,
        op: impl FnOnce(&mut Collections) -> Result<(Option<Collection>, T), RepositoryError>,
    ) -> Result<T, RepositoryError> {
        let mut guard = Arc::clone(&self.data).lock_owned().await;
        let mut next = (*guard).clone();
        let (changed, value) = op(&mut next)?;

        if let Some(collection) = changed {
            let dir = self.dir.clone();
            tokio::spawn(async move {
                persist(&dir, &next, collection).await?;
                *guard = next;
                Ok::<_, RepositoryError>(())
            })
            .await??;
        }

        Ok(value)
    }
}

async fn persist(
    dir: &Path,
    data: &Collections,
    collection: Collection,
) -> Result<(), RepositoryError> {
    let bytes = match collection {
        Collection::Users => serde_json::to_vec_pretty(&data.users)?,
        Collection::Projects => serde_json::to_vec_pretty(&data.projects)?,
        Collection::Bugs => serde_json::to_vec_pretty(&data.bugs)?,
    };
    write_atomic(dir, collection.file_name(), &bytes).await
}

async fn load<T: DeserializeOwned>(
    dir: &Path,
    collection: Collection,
) -> Result<Vec<T>, RepositoryError> {
    let path = dir.join(collection.file_name());
    match tokio::fs::read(&path).await {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
        Ok(bytes) => {
            serde_json::from_slice(&bytes).map_err(|source| RepositoryError::Corrupt { path, source })
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(source) => Err(RepositoryError::Io { path, source }),
    }
}

async fn write_atomic(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<(), RepositoryError> {
    let target = dir.join(file_name);
    let tmp = dir.join(format!(".{}.tmp.{}", file_name, Uuid::new_v4()));

    if let Err(source) = tokio::fs::write(&tmp, bytes).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(RepositoryError::Io { path: tmp, source });
    }

    if let Err(source) = tokio::fs::rename(&tmp, &target).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(RepositoryError::Io {
            path: target,
            source,
        });
    }

    debug!(file = %target.display(), bytes = bytes.len(), "Collection persisted");
    Ok(())
}

#[async_trait]
impl TrackerRepository for JsonFileRepository {
    async fn insert_account(&self, account: Account) -> Result<(), RepositoryError> {
        self.mutate(|c| Ok((Some(c.insert_account(account)?), ())))
            .await
    }

    async fn find_account(&self, identity: &str) -> Result<Option<Account>, RepositoryError> {
        Ok(self.data.lock().await.find_account(identity).cloned())
    }

    async fn insert_project(&self, project: Project) -> Result<(), RepositoryError> {
        self.mutate(|c| Ok((Some(c.insert_project(project)), ())))
            .await
    }

    async fn list_projects(&self) -> Result<Vec<Project>, RepositoryError> {
        Ok(self.data.lock().await.projects.clone())
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, RepositoryError> {
        Ok(self.data.lock().await.find_project(id).cloned())
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool, RepositoryError> {
        self.mutate(|c| {
            let changed = c.delete_project(id);
            Ok((changed, changed.is_some()))
        })
        .await
    }

    async fn add_team_member(
        &self,
        id: Uuid,
        member: &str,
    ) -> Result<Option<Project>, RepositoryError> {
        self.mutate(|c| match c.add_team_member(id, member) {
            Some((project, true)) => Ok((Some(Collection::Projects), Some(project))),
            Some((project, false)) => Ok((None, Some(project))),
            None => Ok((None, None)),
        })
        .await
    }

    async fn insert_bug(&self, bug: Bug) -> Result<(), RepositoryError> {
        self.mutate(|c| Ok((Some(c.insert_bug(bug)?), ()))).await
    }

    async fn list_bugs(&self, project_id: Uuid) -> Result<Vec<Bug>, RepositoryError> {
        Ok(self.data.lock().await.bugs_for(project_id))
    }

    async fn update_bug(
        &self,
        project_id: Uuid,
        bug_id: Uuid,
        update: BugUpdate,
    ) -> Result<Option<Bug>, RepositoryError> {
        self.mutate(|c| {
            let bug = c.update_bug(project_id, bug_id, update);
            let changed = bug.as_ref().map(|_| Collection::Bugs);
            Ok((changed, bug))
        })
        .await
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        tokio::fs::metadata(&self.dir)
            .await
            .map(|_| ())
            .map_err(|source| RepositoryError::Io {
                path: self.dir.clone(),
                source,
            })
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::{BugStatus, NewBug, NewProject, Priority, Role, Severity};

    fn new_project() -> Project {
        Project::new(
            NewProject {
                name: "Tracker".to_string(),
                repository_url: "https://git/tracker".to_string(),
                team_members: vec!["a@x.com".to_string()],
            },
            "owner@x.com",
        )
    }

    fn new_bug(project_id: Uuid) -> Bug {
        Bug::new(
            project_id,
            NewBug {
                title: "Registration form not submitting".to_string(),
                description: Some("Submit does nothing".to_string()),
                severity: Severity::Medium,
                priority: Priority::High,
                commit_link: None,
            },
        )
    }

    #[tokio::test]
    async fn test_data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let project = new_project();
        let pid = project.id;
        let bug = new_bug(pid);
        let bid = bug.id;
        {
            let repo = JsonFileRepository::open(dir.path()).await.unwrap();
            repo.insert_account(Account::new("a@x.com", "hash", Role::Tester))
                .await
                .unwrap();
            repo.insert_project(project).await.unwrap();
            repo.insert_bug(bug).await.unwrap();
            repo.update_bug(pid, bid, BugUpdate::Resolve { commit_link: None })
                .await
                .unwrap();
        }

        let repo = JsonFileRepository::open(dir.path()).await.unwrap();
        let account = repo.find_account("a@x.com").await.unwrap().unwrap();
        assert_eq!(account.role, Role::Tester);
        assert_eq!(account.secret_hash, "hash");
        assert_eq!(repo.list_projects().await.unwrap().len(), 1);

        let bugs = repo.list_bugs(pid).await.unwrap();
        assert_eq!(bugs.len(), 1);
        assert_eq!(bugs[0].status, BugStatus::Resolved);
    }

    #[tokio::test]
    async fn test_duplicate_does_not_touch_disk() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::open(dir.path()).await.unwrap();

        repo.insert_account(Account::new("a@x.com", "first", Role::Member))
            .await
            .unwrap();
        let err = repo
            .insert_account(Account::new("a@x.com", "second", Role::Tester))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::DuplicateIdentity(_)));

        let reopened = JsonFileRepository::open(dir.path()).await.unwrap();
        let account = reopened.find_account("a@x.com").await.unwrap().unwrap();
        assert_eq!(account.secret_hash, "first");
    }

    #[tokio::test]
    async fn test_orphan_bug_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::open(dir.path()).await.unwrap();

        let err = repo.insert_bug(new_bug(Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ProjectNotFound(_)));
        assert!(!dir.path().join("bugs.json").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_reported() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("projects.json"), b"{not json")
            .await
            .unwrap();

        let err = JsonFileRepository::open(dir.path()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn test_existing_file_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let project = new_project();
        let bytes = serde_json::to_vec(&[project.clone()]).unwrap();
        write_atomic(dir.path(), Collection::Projects.file_name(), &bytes)
            .await
            .unwrap();

        let repo = JsonFileRepository::open(dir.path()).await.unwrap();
        assert_eq!(repo.find_project(project.id).await.unwrap(), Some(project));
        assert_eq!(repo.backend_name(), "file");
        assert_eq!(repo.dir(), dir.path());
    }

    #[tokio::test]
    async fn test_dropped_write_still_commits() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::open(dir.path()).await.unwrap();
        let project = new_project();

        // 한 번만 poll한 뒤 취소
        let mut pending = Box::pin(repo.insert_project(project.clone()));
        let _ = futures::poll!(&mut pending);
        drop(pending);

        // 다음 잠금은 진행 중이던 쓰기가 끝난 뒤에 얻어진다
        assert_eq!(repo.find_project(project.id).await.unwrap(), Some(project.clone()));

        repo.insert_project(new_project()).await.unwrap();
        let reopened = JsonFileRepository::open(dir.path()).await.unwrap();
        let projects = reopened.list_projects().await.unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].id, project.id);
    }

    #[tokio::test]
    async fn test_no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::open(dir.path()).await.unwrap();
        repo.insert_project(new_project()).await.unwrap();

        let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            let name = entry.file_name().to_string_lossy().to_string();
            assert!(!name.contains(".tmp."), "leftover temp file: {}", name);
        }
    }
}
