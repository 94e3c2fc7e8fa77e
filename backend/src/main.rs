use actix_web::{web, App, HttpServer};
use backend::config::AppConfig;
use backend::job_controller::state::{start_job_updater, JobsState};
use backend::services;
use backend::storage::TemplateStore;
use env_logger::Env;
use log::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = AppConfig::from_env();

    let store = TemplateStore::open(&config.database_path)
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    std::fs::create_dir_all(&config.output_dir)?;

    // Initialize job controller state
    let (jobs_state, rx) = JobsState::new(100);
    let updater_state = jobs_state.clone();
    tokio::spawn(async move {
        start_job_updater(updater_state, rx).await;
    });

    info!("Server running at {}", config.bind_url());

    let bind = (config.host.clone(), config.port);
    let json_limit = config.json_limit;
    let output_dir = config.output_dir.clone();
    let config = web::Data::new(config);
    let store = web::Data::new(store);
    let jobs_state = web::Data::new(jobs_state);

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(json_limit))
            .app_data(config.clone())
            .app_data(store.clone())
            .app_data(jobs_state.clone())
            .configure(services::configure)
            .service(actix_files::Files::new("/files", &output_dir))
    })
    .bind(bind)?
    .run()
    .await
}
