use std::time::Duration;

use envtag::{env_config, Loader};

env_config! {
    #[derive(Debug, Default)]
    struct AppConfig {
        server_port: u16 = "SERVER_PORT,8080",
        db_host: String = "DB_HOST,localhost",
        db_password: String = "DB_PASSWORD,required",
        debug_mode: bool = "DEBUG_MODE,false",
        timeout: Duration = "TIMEOUT,30s",
        allowed_hosts: Vec<String> = "ALLOWED_HOSTS,localhost,127.0.0.1",
        api_key: String = "API_KEY",
    }
}

fn main() -> Result<(), envtag::ConfigError> {
    let config: AppConfig = Loader::builder()
        .with_file("demos/demo.env", false)
        .build()?;

    println!("{}", envtag::sprint(&config));
    println!(
        "listening on {} (debug={}, timeout={:?})",
        config.server_port, config.debug_mode, config.timeout
    );

    Ok(())
}
