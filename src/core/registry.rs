//! # Service Registry - 싱글톤 의존성 주입 시스템
//!
//! `#[service]` / `#[repository]` 매크로로 선언된 컴포넌트와
//! `ServiceLocator::set()`으로 등록된 인프라 컴포넌트(Database, RedisClient,
//! FileStorage)를 타입 기반으로 관리하는 컨테이너입니다.
//!
//! ## 동작 원리
//!
//! ```text
//! 1. 컴파일 타임
//!    ├─ #[service(name = "game")]       → ServiceRegistration { name: "game_service" }
//!    ├─ #[repository(name = "loan")]    → RepositoryRegistration { name: "loan_repository" }
//!    └─ inventory::collect!             → 전역 레지스트리에 수집
//!
//! 2. 런타임 초기화 (main.rs)
//!    ├─ ServiceLocator::set(database / redis / storage)
//!    └─ ServiceLocator::initialize_all() → 리포지토리 → 서비스 순서로 생성
//!
//! 3. 의존성 주입
//!    └─ Arc<T> 필드 → ServiceLocator::get::<T>() → 캐시 또는 등록 정보로 생성
//! ```
//!
//! ## 이름 규칙
//!
//! 타입 이름 `GameRepository`는 `game`으로 정규화되어
//! `game_repository` 등록 정보와 매칭됩니다. 따라서 매크로의 `name` 인자는
//! 구조체 이름에서 접미사를 뺀 소문자 형태와 같아야 합니다.
//!
//! ## 잠금 정책
//!
//! 인스턴스 생성자는 컨테이너 잠금을 잡지 않은 상태에서 호출됩니다.
//! 생성자 안에서 다른 의존성을 `get()`으로 해석하더라도 `RwLock`
//! 재진입으로 인한 교착이 발생하지 않습니다.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use crate::utils::display_terminal::{
    print_boxed_title, print_cache_initialized, print_final_summary, print_step_complete,
    print_step_start, print_sub_task,
};

/// 비즈니스 로직 서비스를 위한 공통 인터페이스
///
/// 모든 `#[service]` 매크로가 적용된 구조체가 이 trait을 자동 구현합니다.
#[async_trait]
pub trait Service: Send + Sync {
    /// 서비스의 고유 이름 (`game_service` 형태)
    fn name(&self) -> &str;

    /// 서비스 초기화 로직
    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

/// 데이터 액세스 리포지토리를 위한 공통 인터페이스
///
/// 모든 `#[repository]` 매크로가 적용된 구조체가 이 trait을 자동 구현합니다.
#[async_trait]
pub trait Repository: Send + Sync {
    /// 리포지토리의 고유 이름 (`game_repository` 형태)
    fn name(&self) -> &str;

    /// 연결된 MongoDB 컬렉션 이름
    fn collection_name(&self) -> &str;

    /// 리포지토리 초기화 로직
    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

/// 서비스 등록 정보
///
/// `#[service]` 매크로가 생성하며 `inventory`로 수집됩니다.
/// 생성자는 `Box<Arc<T>>`를 `Box<dyn Any>`로 감싸서 반환합니다.
pub struct ServiceRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

/// 리포지토리 등록 정보
pub struct RepositoryRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

inventory::collect!(ServiceRegistration);
inventory::collect!(RepositoryRegistration);

/// 서비스 이름 → 등록정보 매핑 캐시
static SERVICE_NAME_CACHE: Lazy<HashMap<String, &'static ServiceRegistration>> = Lazy::new(|| {
    let cache: HashMap<String, &'static ServiceRegistration> = inventory::iter::<ServiceRegistration>()
        .map(|registration| (normalize_registration_name(registration.name), registration))
        .collect();

    print_cache_initialized("Service", cache.len());
    cache
});

/// 리포지토리 이름 → 등록정보 매핑 캐시
static REPOSITORY_NAME_CACHE: Lazy<HashMap<String, &'static RepositoryRegistration>> = Lazy::new(|| {
    let cache: HashMap<String, &'static RepositoryRegistration> = inventory::iter::<RepositoryRegistration>()
        .map(|registration| (normalize_registration_name(registration.name), registration))
        .collect();

    print_cache_initialized("Repository", cache.len());
    cache
});

/// 등록 이름에서 `_service` / `_repository` 접미사를 제거합니다.
fn normalize_registration_name(name: &str) -> String {
    name.strip_suffix("_service")
        .or_else(|| name.strip_suffix("_repository"))
        .unwrap_or(name)
        .to_string()
}

/// 타입 이름이 어느 레지스트리에 속하는지 나타냅니다.
#[derive(Debug, PartialEq)]
enum ComponentKind {
    Repository(String),
    Service(String),
}

impl ComponentKind {
    /// `crate::services::games::GameService` → `Service("game")`
    fn from_type_name(type_name: &str) -> Option<Self> {
        let short = ServiceLocator::extract_clean_type_name(type_name);

        if let Some(entity) = short.strip_suffix("Repository") {
            return Some(ComponentKind::Repository(entity.to_lowercase()));
        }
        if let Some(entity) = short.strip_suffix("Service") {
            return Some(ComponentKind::Service(entity.to_lowercase()));
        }
        None
    }
}

/// 싱글톤 의존성 주입 컨테이너
///
/// - 각 타입당 정확히 하나의 인스턴스
/// - 첫 요청 시점에 생성 (지연 초기화)
/// - 스레드별로 초기화 중인 타입을 추적하여 순환 참조를 조기에 발견
pub struct ServiceLocator {
    instances: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

thread_local! {
    /// 현재 스레드에서 생성 중인 타입 목록
    static INITIALIZING: RefCell<HashSet<TypeId>> = RefCell::new(HashSet::new());
}

impl ServiceLocator {
    fn new() -> Self {
        Self {
            instances: RwLock::new(HashMap::new()),
        }
    }

    /// 지정된 타입의 싱글톤 인스턴스를 가져옵니다.
    ///
    /// # Panics
    ///
    /// - 순환 참조 (A → B → A)
    /// - `#[service]`/`#[repository]`로 등록되지 않았고 `set()`으로도 등록되지 않은 타입
    ///
    /// 애플리케이션 시작 시점의 설정 오류이므로 즉시 실패시킵니다.
    pub fn get<T: 'static + Send + Sync>() -> Arc<T> {
        let type_name = std::any::type_name::<T>();

        match Self::try_get::<T>() {
            Some(instance) => instance,
            None => panic!(
                "Service not found: {}. Make sure it's registered with #[service] or #[repository] macro, or manually registered with ServiceLocator::set()",
                type_name
            ),
        }
    }

    /// 지정된 타입의 인스턴스를 찾거나 생성합니다. 등록 정보가 없으면 `None`을 반환합니다.
    pub fn try_get<T: 'static + Send + Sync>() -> Option<Arc<T>> {
        let type_id = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();

        if let Some(instance) = Self::cached::<T>() {
            return Some(instance);
        }

        let newly_marked = INITIALIZING.with(|set| set.borrow_mut().insert(type_id));
        if !newly_marked {
            log::error!("❌ Circular dependency detected for type: {}", type_name);
            panic!("Circular dependency detected: {} is already being initialized", type_name);
        }

        // 잠금 없이 생성자 호출
        let created = Self::construct::<T>(type_name);

        INITIALIZING.with(|set| set.borrow_mut().remove(&type_id));

        let instance = created?;

        // 더블 체크: 다른 스레드가 먼저 등록했다면 그 인스턴스를 사용
        let mut instances = LOCATOR.instances.write().unwrap_or_else(|e| e.into_inner());
        let stored = instances
            .entry(type_id)
            .or_insert_with(|| instance as Arc<dyn Any + Send + Sync>)
            .clone();

        stored.downcast::<T>().ok()
    }

    fn cached<T: 'static + Send + Sync>() -> Option<Arc<T>> {
        let instances = LOCATOR.instances.read().unwrap_or_else(|e| e.into_inner());
        instances
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|instance| instance.downcast::<T>().ok())
    }

    fn construct<T: 'static + Send + Sync>(type_name: &str) -> Option<Arc<T>> {
        let constructor = match ComponentKind::from_type_name(type_name)? {
            ComponentKind::Repository(entity) => REPOSITORY_NAME_CACHE.get(&entity)?.constructor,
            ComponentKind::Service(entity) => SERVICE_NAME_CACHE.get(&entity)?.constructor,
        };

        match constructor().downcast::<Arc<T>>() {
            Ok(arc_instance) => Some(*arc_instance),
            Err(_) => panic!("Type mismatch for component: {}", type_name),
        }
    }

    /// 타입 이름에서 모듈 경로를 제거합니다.
    ///
    /// `game_lending_service::services::games::GameService` → `GameService`
    fn extract_clean_type_name(type_name: &str) -> String {
        match type_name.rfind("::") {
            Some(pos) => type_name[pos + 2..].to_string(),
            None => type_name.to_string(),
        }
    }

    /// 외부에서 생성된 인스턴스를 직접 등록합니다.
    ///
    /// 매크로로 관리되지 않는 인프라 컴포넌트(Database, RedisClient,
    /// FileStorage)는 `initialize_all()` 호출 전에 이 메서드로 등록해야 합니다.
    pub fn set<T: 'static + Send + Sync>(instance: Arc<T>) {
        let clean_name = Self::extract_clean_type_name(std::any::type_name::<T>());
        log::info!("📦 Registering: {}", clean_name);

        LOCATOR.instances
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(TypeId::of::<T>(), instance as Arc<dyn Any + Send + Sync>);
    }

    /// 모든 리포지토리와 서비스를 미리 생성합니다.
    ///
    /// 데이터 계층이 비즈니스 계층보다 먼저 초기화됩니다.
    pub async fn initialize_all() -> Result<(), Box<dyn std::error::Error>> {
        print_boxed_title("🔄 INITIALIZING SERVICE REGISTRY");

        let repo_registrations: Vec<_> = inventory::iter::<RepositoryRegistration>().collect();
        let repo_count = repo_registrations.len();

        if repo_count > 0 {
            print_step_start(1, "Creating Repository instances");
            for registration in repo_registrations {
                print_sub_task(registration.name, "Creating...");
                let _instance = (registration.constructor)();
                print_sub_task(registration.name, "✓ Created");
            }
            print_step_complete(1, "Repository instances created", repo_count);
        }

        let service_registrations: Vec<_> = inventory::iter::<ServiceRegistration>().collect();
        let service_count = service_registrations.len();

        if service_count > 0 {
            print_step_start(2, "Creating Service instances");
            for registration in service_registrations {
                print_sub_task(registration.name, "Creating...");
                let _instance = (registration.constructor)();
                print_sub_task(registration.name, "✓ Created");
            }
            print_step_complete(2, "Service instances created", service_count);
        }

        print_final_summary(repo_count, service_count);

        Ok(())
    }
}

/// 전역 서비스 로케이터 인스턴스
static LOCATOR: Lazy<ServiceLocator> = Lazy::new(ServiceLocator::new);
