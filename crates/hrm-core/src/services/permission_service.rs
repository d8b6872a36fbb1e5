// ============================================================================
// HRM Core - Permission Service
// File: crates/hrm-core/src/services/permission_service.rs
// ============================================================================
//! Loads roles and users into permission matrices and persists them back as
//! token lists. Shared by the role and user management forms.

use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use hrm_shared::Pagination;

use crate::domain::{PermissionCatalog, Role, UserAccount};
use crate::error::DomainError;
use crate::permission::{MatrixChange, PermissionMatrix};
use crate::repositories::{RoleRepository, UserRepository};

pub struct PermissionService {
    catalog: Arc<PermissionCatalog>,
    roles: Arc<dyn RoleRepository>,
    users: Arc<dyn UserRepository>,
}

impl PermissionService {
    pub fn new(
        catalog: Arc<PermissionCatalog>,
        roles: Arc<dyn RoleRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self { catalog, roles, users }
    }

    pub fn catalog(&self) -> &Arc<PermissionCatalog> {
        &self.catalog
    }

    /// Matrix for the "add role" / "add user" form.
    pub fn blank_matrix(&self) -> PermissionMatrix {
        PermissionMatrix::new(self.catalog.clone())
    }

    pub fn full_matrix(&self) -> PermissionMatrix {
        let mut matrix = self.blank_matrix();
        matrix.set_all_modules(true);
        matrix
    }

    pub fn matrix_from_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> PermissionMatrix {
        PermissionMatrix::from_tokens(self.catalog.clone(), tokens)
    }

    /// Drop unknown tokens and add implied grants.
    pub fn normalize_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<String> {
        self.matrix_from_tokens(tokens).to_tokens()
    }

    // ------------------------------------------------------------------
    // Roles
    // ------------------------------------------------------------------

    pub async fn list_roles(&self, pagination: Pagination) -> Result<Vec<Role>, DomainError> {
        self.roles.list(pagination).await
    }

    pub async fn create_role(
        &self,
        name: &str,
        description: Option<String>,
        matrix: &PermissionMatrix,
        created_by: Option<Uuid>,
    ) -> Result<Role, DomainError> {
        if self.roles.find_by_name(name.trim()).await?.is_some() {
            warn!("Role creation failed: name already exists: {}", name);
            return Err(DomainError::RoleNameAlreadyExists(name.trim().to_string()));
        }

        let role = Role::new(name.to_string(), description, matrix.to_tokens(), created_by)?;
        let created = self.roles.create(&role).await?;

        info!(role_id = %created.id, permissions = created.permissions.len(), "Role created");
        Ok(created)
    }

    async fn load_role(&self, id: &Uuid) -> Result<Role, DomainError> {
        self.roles
            .find_by_id(id)
            .await?
            .filter(|role| !role.is_deleted())
            .ok_or(DomainError::RoleNotFound(*id))
    }

    pub async fn role_matrix(&self, id: &Uuid) -> Result<PermissionMatrix, DomainError> {
        let role = self.load_role(id).await?;
        Ok(self.matrix_from_tokens(&role.permissions))
    }

    pub async fn save_role_permissions(
        &self,
        id: &Uuid,
        matrix: &PermissionMatrix,
        modified_by: Option<Uuid>,
    ) -> Result<Role, DomainError> {
        let role = self.load_role(id).await?;
        self.persist_role(role, matrix, modified_by).await
    }

    async fn persist_role(
        &self,
        mut role: Role,
        matrix: &PermissionMatrix,
        modified_by: Option<Uuid>,
    ) -> Result<Role, DomainError> {
        role.replace_permissions(matrix.to_tokens(), modified_by);
        let saved = self.roles.update(&role).await?;

        info!(role_id = %saved.id, permissions = saved.permissions.len(), "Role permissions saved");
        Ok(saved)
    }

    /// Replay a form session's changes on the stored role and save the result.
    pub async fn apply_role_changes(
        &self,
        id: &Uuid,
        changes: &[MatrixChange],
        modified_by: Option<Uuid>,
    ) -> Result<(Role, PermissionMatrix), DomainError> {
        let role = self.load_role(id).await?;
        let mut matrix = self.matrix_from_tokens(&role.permissions);
        apply_all(&mut matrix, changes);
        let role = self.persist_role(role, &matrix, modified_by).await?;
        Ok((role, matrix))
    }

    pub async fn delete_role(&self, id: &Uuid, deleted_by: &Uuid) -> Result<(), DomainError> {
        self.load_role(id).await?;
        self.roles.delete(id, deleted_by).await?;
        info!(role_id = %id, "Role deleted");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    pub async fn list_users(&self, pagination: Pagination) -> Result<Vec<UserAccount>, DomainError> {
        self.users.list(pagination).await
    }

    pub async fn create_user(
        &self,
        display_name: &str,
        email: &str,
        role_id: Option<Uuid>,
        created_by: Option<Uuid>,
    ) -> Result<UserAccount, DomainError> {
        if self.users.find_by_email(email).await?.is_some() {
            warn!("User creation failed: email already exists: {}", email);
            return Err(DomainError::EmailAlreadyExists(email.to_string()));
        }

        let mut user = UserAccount::new(display_name.to_string(), email.to_string(), role_id, created_by)?;

        // New users start from their role's grants.
        if let Some(role_id) = role_id {
            let role = self.load_role(&role_id).await?;
            user.permissions = self.normalize_tokens(&role.permissions);
        }

        let created = self.users.create(&user).await?;
        info!(user_id = %created.id, "User created");
        Ok(created)
    }

    async fn load_user(&self, id: &Uuid) -> Result<UserAccount, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(DomainError::UserNotFound(*id))
    }

    pub async fn user_matrix(&self, id: &Uuid) -> Result<PermissionMatrix, DomainError> {
        let user = self.load_user(id).await?;
        Ok(self.matrix_from_tokens(&user.permissions))
    }

    pub async fn save_user_permissions(
        &self,
        id: &Uuid,
        matrix: &PermissionMatrix,
        modified_by: Option<Uuid>,
    ) -> Result<UserAccount, DomainError> {
        let user = self.load_user(id).await?;
        self.persist_user(user, matrix, modified_by).await
    }

    async fn persist_user(
        &self,
        mut user: UserAccount,
        matrix: &PermissionMatrix,
        modified_by: Option<Uuid>,
    ) -> Result<UserAccount, DomainError> {
        user.replace_permissions(matrix.to_tokens(), modified_by);
        let saved = self.users.update(&user).await?;

        info!(user_id = %saved.id, permissions = saved.permissions.len(), "User permissions saved");
        Ok(saved)
    }

    pub async fn apply_user_changes(
        &self,
        id: &Uuid,
        changes: &[MatrixChange],
        modified_by: Option<Uuid>,
    ) -> Result<(UserAccount, PermissionMatrix), DomainError> {
        let user = self.load_user(id).await?;
        let mut matrix = self.matrix_from_tokens(&user.permissions);
        apply_all(&mut matrix, changes);
        let user = self.persist_user(user, &matrix, modified_by).await?;
        Ok((user, matrix))
    }
}

fn apply_all(matrix: &mut PermissionMatrix, changes: &[MatrixChange]) {
    let ignored = changes.iter().filter(|change| !matrix.apply(change)).count();
    if ignored > 0 {
        warn!(ignored, "Ignored permission changes with unknown paths or disallowed actions");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Action, NodePath};
    use crate::repositories::{MockRoleRepository, MockUserRepository};
    use mockall::predicate::eq;

    fn service(roles: MockRoleRepository, users: MockUserRepository) -> PermissionService {
        PermissionService::new(
            Arc::new(PermissionCatalog::builtin()),
            Arc::new(roles),
            Arc::new(users),
        )
    }

    fn role_with(tokens: &[&str]) -> Role {
        Role::new(
            "Recruiter".to_string(),
            None,
            tokens.iter().map(|t| t.to_string()).collect(),
            None,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_role_encodes_matrix() {
        let mut roles = MockRoleRepository::new();
        roles.expect_find_by_name().withf(|name| name == "Recruiter").returning(|_| Ok(None));
        roles.expect_create().returning(|role| Ok(role.clone()));
        let service = service(roles, MockUserRepository::new());

        let mut matrix = service.blank_matrix();
        matrix.set_action(&NodePath::feature("Hiring", "Cvpool"), Action::Read, true);

        let role = service.create_role(" Recruiter ", None, &matrix, None).await.unwrap();
        assert_eq!(role.name, "Recruiter");
        assert_eq!(role.permissions, vec!["prv_hiring_cvpool_read", "prv_hiring_read"]);
    }

    #[tokio::test]
    async fn test_create_role_rejects_duplicate_name() {
        let mut roles = MockRoleRepository::new();
        roles.expect_find_by_name().returning(|_| Ok(Some(role_with(&[]))));
        roles.expect_create().never();
        let service = service(roles, MockUserRepository::new());

        let result = service.create_role("Recruiter", None, &service.blank_matrix(), None).await;
        assert!(matches!(result, Err(DomainError::RoleNameAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_role_matrix_decodes_stored_tokens() {
        let stored = role_with(&["prv_home_read", "prv_unknown_read"]);
        let id = stored.id;
        let mut roles = MockRoleRepository::new();
        roles
            .expect_find_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some(stored.clone())));
        let service = service(roles, MockUserRepository::new());

        let matrix = service.role_matrix(&id).await.unwrap();
        assert_eq!(matrix.to_tokens(), vec!["prv_home_read"]);
    }

    #[tokio::test]
    async fn test_missing_role_is_not_found() {
        let mut roles = MockRoleRepository::new();
        roles.expect_find_by_id().returning(|_| Ok(None));
        let service = service(roles, MockUserRepository::new());

        let id = Uuid::new_v4();
        assert!(matches!(
            service.role_matrix(&id).await,
            Err(DomainError::RoleNotFound(missing)) if missing == id
        ));
    }

    #[tokio::test]
    async fn test_deleted_role_is_not_found() {
        let mut stored = role_with(&[]);
        stored.soft_delete(Uuid::new_v4());
        let mut roles = MockRoleRepository::new();
        roles.expect_find_by_id().returning(move |_| Ok(Some(stored.clone())));
        let service = service(roles, MockUserRepository::new());

        assert!(service.role_matrix(&Uuid::new_v4()).await.is_err());
    }

    #[tokio::test]
    async fn test_apply_role_changes_persists_result() {
        let stored = role_with(&["prv_jd_read"]);
        let id = stored.id;
        let editor = Uuid::new_v4();
        let mut roles = MockRoleRepository::new();
        roles
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));
        roles
            .expect_update()
            .withf(|role| role.permissions.contains(&"prv_system_xfactor_read".to_string()))
            .times(1)
            .returning(|role| Ok(role.clone()));
        let service = service(roles, MockUserRepository::new());

        let changes = vec![
            MatrixChange::SetAction {
                path: NodePath::sub_module_feature("System", "Xfactor", "Weightage"),
                action: Action::Read,
                selected: true,
            },
            MatrixChange::SetAction {
                path: NodePath::direct("Jd"),
                action: Action::Read,
                selected: false,
            },
            MatrixChange::SetAllForModule { module: "Payroll".into(), selected: true },
        ];
        let (role, matrix) = service.apply_role_changes(&id, &changes, Some(editor)).await.unwrap();

        assert_eq!(role.modified_by, Some(editor));
        assert_eq!(role.permissions, matrix.to_tokens());
        assert!(!role.has_permission("prv_jd_read"));
        assert!(role.has_permission("prv_system_read"));
    }

    #[tokio::test]
    async fn test_create_user_starts_from_role_grants() {
        let stored = role_with(&["prv_user_employee_read", "prv_bogus"]);
        let role_id = stored.id;
        let mut roles = MockRoleRepository::new();
        roles.expect_find_by_id().returning(move |_| Ok(Some(stored.clone())));
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users.expect_create().returning(|user| Ok(user.clone()));
        let service = service(roles, users);

        let user = service
            .create_user("Dewi", "dewi@example.com", Some(role_id), None)
            .await
            .unwrap();
        assert_eq!(user.permissions, vec!["prv_user_employee_read", "prv_user_read"]);
    }

    #[tokio::test]
    async fn test_save_user_permissions() {
        let stored = UserAccount::new("Dewi".to_string(), "dewi@example.com".to_string(), None, None).unwrap();
        let id = stored.id;
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(move |_| Ok(Some(stored.clone())));
        users.expect_update().returning(|user| Ok(user.clone()));
        let service = service(MockRoleRepository::new(), users);

        let matrix = service.full_matrix();
        let saved = service.save_user_permissions(&id, &matrix, None).await.unwrap();
        assert_eq!(saved.permissions, matrix.to_tokens());
    }

    #[test]
    fn test_normalize_tokens() {
        let service = service(MockRoleRepository::new(), MockUserRepository::new());
        let tokens = service.normalize_tokens(&["PRV_HIRING_VACANCY_CANDIDATE_READ", "junk"]);
        assert_eq!(
            tokens,
            vec!["prv_hiring_vacancy_candidate_read", "prv_hiring_read", "prv_hiring_vacancy_read"]
        );
    }
}
