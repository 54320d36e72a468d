use log::LevelFilter;
use veery::start;
use veery_database::config::VeeryConfig;

#[tokio::main]
pub async fn main() -> veery_database::error::BackendResult<()> {
    if std::env::args().collect::<Vec<_>>().get(1) == Some(&"--print-config".to_string()) {
        println!("{}", doku::to_toml::<VeeryConfig>());
        std::process::exit(0);
    }

    env_logger::builder()
        .filter_level(LevelFilter::Warn)
        .filter_module("veery", LevelFilter::Info)
        .init();

    let config = VeeryConfig::read()?;
    start(config, None, None).await?;
    Ok(())
}
