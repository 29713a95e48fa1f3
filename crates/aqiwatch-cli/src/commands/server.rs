use std::time::Duration;

use super::SessionArgs;

pub fn run(
    config_path: Option<&str>,
    args: &SessionArgs,
    host: &str,
    port: u16,
    session_ttl_secs: u64,
) {
    let defaults = match super::resolve_config(config_path, args) {
        Ok(config) => config,
        Err(e) => super::fail(e),
    };

    let base = format!("http://{host}:{port}");

    println!("🌍 aqiwatch server v{}", aqiwatch_core::VERSION);
    println!("   {base}");
    println!(
        "   location: {}  window: {}  seed: {} x{}",
        defaults.location, defaults.window, defaults.seed_aqi, defaults.seed_len
    );
    println!("   idle sessions expire after {session_ttl_secs}s");
    println!();
    println!("   Endpoints:");
    println!("     GET    /                        API index (try: curl {base})");
    println!("     GET    /health                  Health check");
    println!("     GET    /bands                   AQI severity bands");
    println!("     POST   /sessions                Open a session (?location=..&seed=..)");
    println!("     GET    /sessions/{{id}}           Current dashboard view");
    println!("     POST   /sessions/{{id}}/refresh   Take one new reading");
    println!("     DELETE /sessions/{{id}}           Close the session");
    println!();
    println!("   Examples:");
    println!("     curl -X POST '{base}/sessions?location=Delhi'");
    println!("     curl -X POST {base}/sessions/<id>/refresh");
    println!();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => super::fail(e),
    };
    let ttl = Duration::from_secs(session_ttl_secs);
    if let Err(e) = rt.block_on(aqiwatch_server::run_server(defaults, ttl, host, port)) {
        super::fail(e);
    }
}
