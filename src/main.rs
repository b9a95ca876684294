use config::Config;
use senec2graphite::graphite::Graphite;
use senec2graphite::poll;
use tokio::signal;
use tokio_util::sync::CancellationToken;

#[derive(Clone, serde::Deserialize)]
pub struct Settings {
    host: Option<String>,
    graphite: String,
    prefix: String,
}

pub fn read_settings() -> Settings {
    let mut settings = Config::default();
    settings
        .merge(config::Environment::with_prefix("SENEC"))
        .unwrap()
        .set_default("graphite", "localhost")
        .unwrap()
        .set_default("prefix", "senec")
        .unwrap();

    settings.try_into().expect("Configuration error")
}

fn usage() {
    eprintln!("senec2graphite: poll a SENEC device and forward its readings to graphite");
    eprintln!();
    eprintln!("  SENEC_HOST      ip or hostname of the SENEC device (required)");
    eprintln!("  SENEC_GRAPHITE  graphite ip or hostname - defaults to localhost");
    eprintln!("  SENEC_PREFIX    metric name prefix - defaults to senec");
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let settings = read_settings();
    let host = match settings.host {
        Some(host) => host,
        None => {
            usage();
            std::process::exit(2);
        }
    };
    let prefix = settings.prefix.trim_end_matches('.').to_string();

    let device = senec2graphite::device(&host);
    let device = match senec2graphite::connect(&device) {
        Ok(device) => device,
        Err(e) => {
            log::error!("Unable to set up the device client: {:?}", e);
            std::process::exit(1);
        }
    };

    /* no section list, nothing to poll */
    let sections = match senec2graphite::sections(&device).await {
        Ok(sections) => sections,
        Err(e) => {
            log::error!("Unable to enumerate sections on {}: {:?}", host, e);
            std::process::exit(1);
        }
    };
    log::info!("Polling {} sections on {}", sections.len(), host);

    let graphite = Graphite::new(settings.graphite);
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                log::info!("Shutdown requested");
                cancel.cancel();
            }
        });
    }

    poll::run(&device, &sections, &graphite, &prefix, &cancel).await;
}
