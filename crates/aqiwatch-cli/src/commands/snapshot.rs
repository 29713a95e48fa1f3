use super::SessionArgs;

pub fn run(config_path: Option<&str>, args: &SessionArgs, ticks: u64, output: Option<&str>) {
    let mut session = super::start_session(config_path, args);
    for _ in 0..ticks {
        if let Err(e) = session.refresh() {
            super::fail(e);
        }
    }

    let json = match session.view().map(|view| serde_json::to_string_pretty(&view)) {
        Ok(Ok(json)) => json,
        Ok(Err(e)) => super::fail(e),
        Err(e) => super::fail(e),
    };

    match output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, json) {
                super::fail(format!("failed to write {path}: {e}"));
            }
            println!("Snapshot written to {path}");
        }
        None => println!("{json}"),
    }
}
