use std::sync::Arc;
use bcrypt::hash;
use mongodb::bson::{doc, DateTime, Document as BsonDocument};
use singleton_macro::service;
use crate::{
    domain::{
        entities::documents::{Document, DocumentKind},
        entities::users::user::{ensure_user_deletable, User},
        dto::common::{PageQuery, PageResponse},
        dto::documents::UploadCommand,
        dto::users::{
            request::{CreateUserRequest, UpdateUserRequest},
            response::UserResponse,
        },
        models::auth::AuthenticatedUser,
    },
    repositories::{loans::LoanRepository, tokens::TokenRepository, users::user_repo::UserRepository},
    services::{documents::DocumentService, games::GameService},
    errors::{AppError, ErrorContext},
    utils::string_utils::parse_object_id,
};
use crate::config::PasswordConfig;

const INVALID_CREDENTIALS: &str = "잘못된 이메일 또는 비밀번호입니다";

#[service(name = "user")]
pub struct UserService {
    user_repo: Arc<UserRepository>,
    loan_repo: Arc<LoanRepository>,
    token_repo: Arc<TokenRepository>,
    game_service: Arc<GameService>,
    document_service: Arc<DocumentService>,
}

fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, PasswordConfig::bcrypt_cost()).context("비밀번호 해싱 실패")
}

fn password_matches(password: &str, password_hash: &str) -> Result<bool, AppError> {
    bcrypt::verify(password, password_hash).context("비밀번호 검증 실패")
}

impl UserService {
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, AppError> {
        let start_time = std::time::Instant::now();

        let password_hash = hash_password(&request.password)?;
        log::debug!("Password hashing took: {:?}", start_time.elapsed());

        let user = User::new_local(
            request.email.trim().to_lowercase(),
            request.username.trim().to_string(),
            request.display_name.trim().to_string(),
            password_hash,
        );

        let created_user = self.user_repo.create(user).await?;

        log::info!(
            "👤 사용자 생성 - id: {}, took: {:?}",
            created_user.id_string().unwrap_or_default(),
            start_time.elapsed()
        );

        Ok(created_user)
    }

    async fn find_user(&self, id: &str) -> Result<User, AppError> {
        let id = parse_object_id(id, "사용자 ID")?;
        self.user_repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))
    }

    pub async fn get_user_by_id(&self, id: &str) -> Result<UserResponse, AppError> {
        Ok(UserResponse::from(self.find_user(id).await?))
    }

    pub async fn get_current_user(&self, caller: &AuthenticatedUser) -> Result<UserResponse, AppError> {
        self.get_user_by_id(&caller.user_id).await
    }

    pub async fn list_users(&self, caller: &AuthenticatedUser, page: PageQuery) -> Result<PageResponse<UserResponse>, AppError> {
        if !caller.is_admin() {
            return Err(AppError::AuthorizationError("관리자만 사용자 목록을 조회할 수 있습니다".to_string()));
        }

        let users = self.user_repo.find_page(&page).await?;
        let total = self.user_repo.count().await?;

        Ok(PageResponse::new(
            users.into_iter().map(UserResponse::from).collect(),
            &page,
            total,
        ))
    }

    /// 본인 또는 관리자만 수정할 수 있습니다.
    ///
    /// 비밀번호 변경 시 현재 비밀번호를 확인하고, 발급된 리프레시 토큰을 모두 폐기합니다.
    pub async fn update_user(
        &self,
        caller: &AuthenticatedUser,
        id: &str,
        request: UpdateUserRequest,
    ) -> Result<UserResponse, AppError> {
        if request.is_empty() {
            return Err(AppError::ValidationError("변경할 항목이 없습니다".to_string()));
        }

        let user = self.find_user(id).await?;
        let user_id = user.id.ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))?;
        caller.ensure_can_act_for(&user_id)?;

        let mut update = BsonDocument::new();

        if let Some(display_name) = request.display_name {
            update.insert("display_name", display_name);
        }

        if let Some(username) = request.username {
            if username != user.username {
                if self.user_repo.find_by_username(&username).await?.is_some() {
                    return Err(AppError::ConflictError("이미 사용 중인 사용자명입니다".to_string()));
                }
                update.insert("username", username);
            }
        }

        let password_changed = match (request.current_password, request.new_password) {
            (Some(current), Some(new_password)) => {
                if !password_matches(&current, &user.password_hash)? {
                    return Err(AppError::AuthenticationError("현재 비밀번호가 일치하지 않습니다".to_string()));
                }
                update.insert("password_hash", hash_password(&new_password)?);
                true
            }
            (None, Some(_)) => {
                return Err(AppError::ValidationError("비밀번호를 변경하려면 현재 비밀번호가 필요합니다".to_string()));
            }
            _ => false,
        };

        let updated = self.user_repo
            .update(&user_id, update)
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))?;

        if password_changed {
            self.token_repo.revoke_all(&user_id.to_hex()).await?;
            log::info!("🔑 비밀번호 변경으로 리프레시 토큰 폐기 - user: {}", user_id);
        }

        Ok(UserResponse::from(updated))
    }

    /// 진행 중인 대여가 있으면 409. 소유 게임, 문서, 토큰을 함께 삭제합니다.
    pub async fn delete_user(&self, caller: &AuthenticatedUser, id: &str) -> Result<(), AppError> {
        let user = self.find_user(id).await?;
        let user_id = user.id.ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))?;
        caller.ensure_can_act_for(&user_id)?;

        ensure_user_deletable(self.loan_repo.count_active_for_user(&user_id).await?)?;

        let games = self.game_service.delete_all_for_owner(&user_id).await?;
        let documents = self.document_service.delete_all_for_owner(&user_id).await?;
        let tokens = self.token_repo.delete_all(&user_id.to_hex()).await?;

        let deleted = self.user_repo.delete(&user_id).await?;
        if !deleted {
            return Err(AppError::NotFound("사용자를 찾을 수 없습니다".to_string()));
        }

        log::info!(
            "🗑️ 사용자 삭제 - id: {}, 게임 {}개, 문서 {}개, 토큰 {}개",
            user_id, games, documents, tokens
        );
        Ok(())
    }

    /// 이메일/비밀번호를 확인합니다. 비활성 계정은 403입니다.
    pub async fn verify_password(&self, email: &str, password: &str) -> Result<User, AppError> {
        let start_time = std::time::Instant::now();

        let user = self.user_repo
            .find_by_email(&email.trim().to_lowercase())
            .await?
            .ok_or_else(|| AppError::AuthenticationError(INVALID_CREDENTIALS.to_string()))?;

        if !password_matches(password, &user.password_hash)? {
            return Err(AppError::AuthenticationError(INVALID_CREDENTIALS.to_string()));
        }

        if !user.is_active {
            return Err(AppError::AuthorizationError("비활성화된 계정입니다".to_string()));
        }

        log::debug!("Total password verification took: {:?}", start_time.elapsed());

        Ok(user)
    }

    pub async fn record_login(&self, user: &User) -> Result<(), AppError> {
        if let Some(id) = user.id {
            self.user_repo.update(&id, doc! { "last_login_at": DateTime::now() }).await?;
        }
        Ok(())
    }

    /// 아바타 이미지를 업로드하고 연결합니다. 기존 아바타는 삭제됩니다.
    pub async fn set_avatar(
        &self,
        caller: &AuthenticatedUser,
        id: &str,
        content_type: String,
        bytes: Vec<u8>,
    ) -> Result<UserResponse, AppError> {
        let user = self.find_user(id).await?;
        let user_id = user.id.ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))?;

        if caller.user_id != user_id.to_hex() {
            return Err(AppError::AuthorizationError("본인의 아바타만 변경할 수 있습니다".to_string()));
        }

        let extension = crate::storage::extension_for_content_type(&content_type);
        let document = self.document_service
            .upload(caller, UploadCommand {
                game_id: None,
                kind: DocumentKind::Avatar,
                file_name: format!("avatar.{}", extension),
                content_type,
                bytes,
            })
            .await?;

        let updated = self.user_repo
            .update(&user_id, doc! { "avatar_document_id": document.id })
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))?;

        if let Some(old_id) = user.avatar_document_id {
            if let Some(old) = self.document_service.find(&old_id).await? {
                self.document_service.remove(&old).await?;
            }
        }

        Ok(UserResponse::from(updated))
    }

    pub async fn get_avatar(&self, id: &str) -> Result<(Document, Vec<u8>), AppError> {
        let user = self.find_user(id).await?;
        let avatar_id = user.avatar_document_id
            .ok_or_else(|| AppError::NotFound("아바타가 없습니다".to_string()))?;

        self.document_service.download_by_id(&avatar_id).await
    }
}
