use compass_config::Settings;
use compass_services::{
    AuthService, ContextResolver, CritiqueService,
    dao::{
        collaboration::CollaborationDao, college::CollegeDao, document::DocumentDao,
        essay::EssayDao, scholarship::ScholarshipDao, task::TaskDao, user::UserDao,
    },
};
use mongodb::Database;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Settings,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserDao>,
    pub collaborations: Arc<CollaborationDao>,
    pub resolver: Arc<ContextResolver>,
    pub colleges: Arc<CollegeDao>,
    pub tasks: Arc<TaskDao>,
    pub essays: Arc<EssayDao>,
    pub documents: Arc<DocumentDao>,
    pub scholarships: Arc<ScholarshipDao>,
    pub critique: CritiqueService,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Self {
        let auth = Arc::new(AuthService::new(settings.jwt.clone()));
        let users = Arc::new(UserDao::new(&db));
        let collaborations = Arc::new(CollaborationDao::new(&db));
        let resolver = Arc::new(ContextResolver::new(&db));
        let colleges = Arc::new(CollegeDao::new(&db));
        let tasks = Arc::new(TaskDao::new(&db));
        let essays = Arc::new(EssayDao::new(&db));
        let documents = Arc::new(DocumentDao::new(&db));
        let scholarships = Arc::new(ScholarshipDao::new(&db));
        let critique = CritiqueService::new(
            settings.claude.api_key.clone(),
            settings.claude.model.clone(),
            settings.claude.max_tokens,
        );

        Self {
            db,
            settings,
            auth,
            users,
            collaborations,
            resolver,
            colleges,
            tasks,
            essays,
            documents,
            scholarships,
            critique,
        }
    }
}
