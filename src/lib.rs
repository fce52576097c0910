#[macro_use]
extern crate rocket;

pub mod auth;
pub mod csv;
pub mod db;
pub mod error;
pub mod models;
pub mod request_logger;
pub mod routes;
pub mod store;

use crate::db::CampaignDb;
use crate::request_logger::RequestLogger;
use env_logger::Env;
use rocket::fairing::AdHoc;
use rocket::http::Method;
use rocket::{Build, Rocket};
use rocket_cors::{AllowedOrigins, CorsOptions};
use rocket_db_pools::Database;
use rocket_okapi::{
    openapi_get_routes,
    rapidoc::{make_rapidoc, GeneralConfig, HideShowConfig, RapiDocConfig},
    settings::UrlObject,
    swagger_ui::{make_swagger_ui, SwaggerUIConfig},
};
use std::sync::Once;

static LOGGER: Once = Once::new();

fn init_logger() {
    LOGGER.call_once(|| {
        env_logger::Builder::from_env(
            Env::default().default_filter_or("info,rocket::server=warn,rocket::request=warn"),
        )
        .init();
    });
}

pub fn rocket() -> Rocket<Build> {
    init_logger();

    // Configure CORS for the browser dashboard
    let cors = CorsOptions::default()
        .allowed_origins(AllowedOrigins::all())
        .allowed_methods(
            vec![
                Method::Get,
                Method::Post,
                Method::Put,
                Method::Delete,
                Method::Patch,
            ]
            .into_iter()
            .map(From::from)
            .collect(),
        )
        .allow_credentials(true)
        .to_cors()
        .expect("Error creating CORS");

    rocket::build()
        .attach(RequestLogger)
        .attach(CampaignDb::init())
        .attach(cors)
        // Run database migrations on startup
        .attach(AdHoc::try_on_ignite("Run Migrations", |rocket| async move {
            match CampaignDb::fetch(&rocket) {
                Some(db) => {
                    let pool = (**db).clone();
                    match db::run_migrations(&pool).await {
                        Ok(_) => Ok(rocket),
                        Err(e) => {
                            log::error!("database migrations failed: {}", e);
                            Err(rocket)
                        }
                    }
                }
                None => {
                    log::error!("database pool not available for migrations");
                    Err(rocket)
                }
            }
        }))
        // Clone and manage the pool for the auth guard and the contact store
        .attach(AdHoc::try_on_ignite("Manage DB Pool", |rocket| async move {
            match CampaignDb::fetch(&rocket) {
                Some(db) => {
                    let pool = (**db).clone();
                    Ok(rocket.manage(pool))
                }
                None => Err(rocket),
            }
        }))
        .mount(
            "/api/v1",
            openapi_get_routes![
                // Health routes
                routes::health::health_check,
                // Contact routes
                routes::contacts::list_contacts,
                routes::contacts::create_contact,
                routes::contacts::update_contact,
                routes::contacts::delete_contact,
                routes::contacts::import_contacts,
                routes::contacts::export_contacts,
                // Template routes
                routes::templates::list_templates,
                routes::templates::create_template,
                routes::templates::update_template,
                routes::templates::delete_template,
                // Campaign routes
                routes::campaigns::list_campaigns,
                routes::campaigns::create_campaign,
                routes::campaigns::send_campaign,
                // Stats routes
                routes::stats::get_stats,
            ],
        )
        .mount(
            "/api/docs/swagger/",
            make_swagger_ui(&SwaggerUIConfig {
                url: "../../v1/openapi.json".to_owned(),
                ..Default::default()
            }),
        )
        .mount(
            "/api/docs/rapidoc/",
            make_rapidoc(&RapiDocConfig {
                general: GeneralConfig {
                    spec_urls: vec![UrlObject::new("Campaign API", "../../v1/openapi.json")],
                    ..Default::default()
                },
                hide_show: HideShowConfig {
                    allow_spec_url_load: false,
                    allow_spec_file_load: false,
                    ..Default::default()
                },
                ..Default::default()
            }),
        )
}

#[cfg_attr(not(test), allow(dead_code))]
pub mod test_support {
    use rocket::config::LogLevel;
    use rocket::figment::Figment;
    use rocket::local::asynchronous::Client as AsyncClient;
    use rocket::local::blocking::Client;
    use rocket::{Build, Rocket, Route};
    use rocket_db_pools::sqlx::{self, PgPool};

    pub use database::{TestDatabase, TestDatabaseError};

    use crate::auth::hash_token;

    /// Convenience helpers for seeding users, tokens and contacts in tests.
    pub struct TestFixtures<'a> {
        pool: &'a PgPool,
    }

    impl<'a> TestFixtures<'a> {
        /// Create a fixture helper bound to the provided pool.
        pub fn new(pool: &'a PgPool) -> Self {
            Self { pool }
        }

        /// Insert a user row, returning the new user id.
        pub async fn insert_user(
            &self,
            email: &str,
            display_name: Option<&str>,
        ) -> Result<i32, sqlx::Error> {
            sqlx::query_scalar(
                "INSERT INTO users (email, display_name) VALUES ($1, $2) RETURNING id",
            )
            .bind(email)
            .bind(display_name.map(|name| name.to_string()))
            .fetch_one(self.pool)
            .await
        }

        /// Store the digest of a raw API token for a user. Requests can then
        /// authenticate with `Authorization: Bearer <token>`.
        pub async fn insert_api_token(
            &self,
            user_id: i32,
            token: &str,
        ) -> Result<(), sqlx::Error> {
            sqlx::query("INSERT INTO api_tokens (user_id, token_hash) VALUES ($1, $2)")
                .bind(user_id)
                .bind(hash_token(token))
                .execute(self.pool)
                .await?;
            Ok(())
        }

        /// Insert a contact row directly, bypassing the import pipeline.
        pub async fn insert_contact(
            &self,
            user_id: i32,
            name: &str,
            email: &str,
            status: &str,
        ) -> Result<i32, sqlx::Error> {
            sqlx::query_scalar(
                r#"INSERT INTO contacts (user_id, name, email, status)
                   VALUES ($1, $2, $3, $4) RETURNING id"#,
            )
            .bind(user_id)
            .bind(name)
            .bind(email)
            .bind(status)
            .fetch_one(self.pool)
            .await
        }
    }

    pub mod database {
        use rocket_db_pools::sqlx::postgres::PgPoolOptions;
        use rocket_db_pools::sqlx::{self, PgPool};
        use testcontainers_modules::postgres::Postgres;
        use testcontainers_modules::testcontainers::{
            core::error::TestcontainersError, runners::AsyncRunner, ContainerAsync,
        };
        use thiserror::Error;

        static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

        #[derive(Debug, Error)]
        pub enum TestDatabaseError {
            #[error("database error: {0}")]
            Sqlx(#[from] sqlx::Error),
            #[error("migration error: {0}")]
            Migration(#[from] sqlx::migrate::MigrateError),
            #[error("container error: {0}")]
            Container(#[from] TestcontainersError),
        }

        /// Ephemeral database factory for integration tests. Each instance
        /// launches a disposable Postgres container and runs the migrations.
        pub struct TestDatabase {
            pool: Option<PgPool>,
            container: Option<ContainerAsync<Postgres>>,
        }

        impl TestDatabase {
            /// Provision a fresh, migrated database in a new container.
            pub async fn new() -> Result<Self, TestDatabaseError> {
                let container = Postgres::default().start().await?;

                let host = container.get_host().await?.to_string();
                let port = container.get_host_port_ipv4(5432).await?;
                let url = format!("postgres://postgres:postgres@{host}:{port}/postgres");

                let pool = PgPoolOptions::new()
                    .max_connections(5)
                    .connect(&url)
                    .await
                    .map_err(TestDatabaseError::Sqlx)?;

                MIGRATOR.run(&pool).await?;

                Ok(Self {
                    pool: Some(pool),
                    container: Some(container),
                })
            }

            /// Cloneable connection pool for use in tests and Rocket state.
            pub fn pool(&self) -> &PgPool {
                self.pool.as_ref().expect("test database pool is available")
            }

            /// Convenience method returning a clone of the pooled handle.
            pub fn pool_clone(&self) -> PgPool {
                self.pool().clone()
            }

            /// Close pool connections and discard the container.
            pub async fn close(mut self) {
                if let Some(pool) = self.pool.take() {
                    pool.close().await;
                }
                if let Some(container) = self.container.take() {
                    drop(container);
                }
            }
        }
    }

    /// Builder for constructing Rocket instances tailored for integration tests.
    #[derive(Default)]
    pub struct TestRocketBuilder {
        figment: Figment,
        mounts: Vec<(String, Vec<Route>)>,
        pg_pool: Option<PgPool>,
    }

    impl TestRocketBuilder {
        /// Start a builder with sensible defaults: random port, logging disabled.
        pub fn new() -> Self {
            let figment = rocket::Config::figment()
                .merge(("port", 0))
                .merge(("log_level", LogLevel::Off))
                .merge(("cli_colors", false));

            Self {
                figment,
                mounts: Vec::new(),
                pg_pool: None,
            }
        }

        /// Mount routes under `/api/v1`.
        pub fn mount_api_routes(mut self, routes: Vec<Route>) -> Self {
            self.mounts.push(("/api/v1".to_string(), routes));
            self
        }

        /// Manage a `PgPool` instance for tests that exercise database-backed
        /// routes and the auth guard.
        pub fn manage_pg_pool(mut self, pool: PgPool) -> Self {
            self.pg_pool = Some(pool);
            self
        }

        /// Finish building the Rocket instance.
        pub fn build(self) -> Rocket<Build> {
            let mut rocket = rocket::custom(self.figment);

            for (base, routes) in self.mounts {
                rocket = rocket.mount(base, routes);
            }

            if let Some(pool) = self.pg_pool {
                rocket = rocket.manage(pool);
            }

            rocket
        }

        /// Convenience helper to produce a blocking local client.
        pub fn blocking_client(self) -> Client {
            Client::tracked(self.build()).expect("valid Rocket instance")
        }

        /// Convenience helper to produce an asynchronous local client.
        pub async fn async_client(self) -> AsyncClient {
            AsyncClient::tracked(self.build())
                .await
                .expect("valid Rocket instance")
        }
    }
}
