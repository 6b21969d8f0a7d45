use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::models::UserCreate;
use crate::db::repository::UserRepository;
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`initialize`](Self::initialize) 方法代替
    pub fn new(config: Config, db: Surreal<Db>, jwt_service: Arc<JwtService>) -> Self {
        Self {
            config,
            db,
            jwt_service,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/booking.db) 和 schema
    /// 3. JWT 服务
    /// 4. 首次启动时种子超级用户
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {}", e)))?;

        let db_path = config.database_dir().join("booking.db");
        let db_service = DbService::new(&db_path).await?;
        let db = db_service.db;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        let state = Self::new(config.clone(), db, jwt_service);
        state.seed_superuser().await?;

        Ok(state)
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 首次启动时种子超级用户
    ///
    /// 数据库为空且设置了 ADMIN_EMAIL/ADMIN_PASSWORD 时创建；
    /// 否则跳过。
    async fn seed_superuser(&self) -> Result<(), AppError> {
        let repo = UserRepository::new(self.db.clone());
        let count = repo.count().await?;
        if count > 0 {
            return Ok(());
        }

        let (Some(email), Some(password)) =
            (&self.config.admin_email, &self.config.admin_password)
        else {
            tracing::warn!(
                "No users exist and ADMIN_EMAIL/ADMIN_PASSWORD not set - skipping superuser seed"
            );
            return Ok(());
        };

        let admin = repo
            .create_superuser(UserCreate {
                email: email.clone(),
                password: password.clone(),
                first_name: None,
                last_name: None,
                is_staff: true,
                is_superuser: true,
            })
            .await?;

        tracing::info!(email = %admin.email, "Seeded initial superuser");
        Ok(())
    }
}
