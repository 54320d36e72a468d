#![expect(clippy::unwrap_used)]

use log::LevelFilter;
use std::{
    env::current_dir,
    fs::{create_dir_all, remove_dir_all},
    ops::Deref,
    process::{Command, Stdio},
    sync::{
        atomic::{AtomicI32, Ordering},
        Once,
    },
    thread::spawn,
};
use tokio::{sync::oneshot, task::JoinHandle};
use veery::start;
use veery_api_client::{user::RegisterParams, ApiClient};
use veery_database::config::{VeeryConfig, VeeryConfigDatabase};

/// One backend with its own Postgres, listening on a unique port so tests
/// can run in parallel. Dereferences to an api client logged in as the
/// default user "alpha".
pub struct VeeryInstance {
    pub api_client: ApiClient,
    pub hostname: String,
    db_path: String,
    server_handle: JoinHandle<()>,
}

impl VeeryInstance {
    pub async fn start() -> Self {
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            env_logger::builder().filter_level(LevelFilter::Warn).init();
        });

        // Run things on different ports and db paths to allow parallel tests
        static COUNTER: AtomicI32 = AtomicI32::new(0);
        let current_run = COUNTER.fetch_add(1, Ordering::Relaxed);
        let port = 8200 + current_run;

        let db_path = generate_db_path(port);
        prepare_db(db_path.clone()).join().unwrap();

        let connection_url = format!("postgresql://veery:password@/veery?host={db_path}");
        let config = VeeryConfig {
            database: VeeryConfigDatabase {
                connection_url,
                ..Default::default()
            },
            ..Default::default()
        };

        let hostname = format!("127.0.0.1:{port}");
        let bind = hostname.clone();
        let (tx, rx) = oneshot::channel::<()>();
        let server_handle = tokio::task::spawn(async move {
            start(config, Some(bind.parse().unwrap()), Some(tx))
                .await
                .unwrap();
        });
        // wait for the backend to start
        rx.await.unwrap();

        let instance = Self {
            api_client: ApiClient::new(hostname.clone()).unwrap(),
            hostname,
            db_path,
            server_handle,
        };
        instance
            .api_client
            .register(RegisterParams {
                username: "alpha".to_string(),
                password: "hunter2".to_string(),
            })
            .await
            .unwrap();
        instance
    }

    /// Separate client registered as a new user on this instance.
    pub async fn register_client(&self, username: &str) -> ApiClient {
        let client = ApiClient::new(self.hostname.clone()).unwrap();
        client
            .register(RegisterParams {
                username: username.to_string(),
                password: "hunter2".to_string(),
            })
            .await
            .unwrap();
        client
    }

    /// Client logged in as the first run setup admin.
    pub async fn admin_client(&self) -> ApiClient {
        let client = ApiClient::new(self.hostname.clone()).unwrap();
        client
            .login(veery_api_client::user::LoginParams {
                username: "veery".to_string(),
                password: "veery".to_string(),
            })
            .await
            .unwrap();
        client
    }

    /// Anonymous client without any auth cookie.
    pub fn anonymous_client(&self) -> ApiClient {
        ApiClient::new(self.hostname.clone()).unwrap()
    }

    pub fn stop(self) {
        self.server_handle.abort();
        stop_db(self.db_path).join().unwrap();
    }
}

impl Deref for VeeryInstance {
    type Target = ApiClient;

    fn deref(&self) -> &Self::Target {
        &self.api_client
    }
}

/// Generate a unique db path for each postgres so that tests can run in parallel.
fn generate_db_path(port: i32) -> String {
    let path = format!(
        "{}/../../target/test_db/veery-{port}",
        current_dir().unwrap().display()
    );
    create_dir_all(&path).unwrap();
    path
}

fn prepare_db(db_path: String) -> std::thread::JoinHandle<()> {
    // stop any db leftover from previous run
    stop_db(db_path.clone()).join().unwrap();
    remove_dir_all(&db_path).unwrap();
    create_dir_all(&db_path).unwrap();
    spawn(move || {
        Command::new("./tests/scripts/start_dev_db.sh")
            .arg(&db_path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .unwrap();
    })
}

fn stop_db(db_path: String) -> std::thread::JoinHandle<()> {
    spawn(move || {
        Command::new("./tests/scripts/stop_dev_db.sh")
            .arg(&db_path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .unwrap();
    })
}
