use super::SessionArgs;

pub fn run(config_path: Option<&str>, args: &SessionArgs) {
    let session = super::start_session(config_path, args);
    let mut app = crate::tui::app::App::new(session);
    if let Err(e) = app.run() {
        eprintln!("TUI error: {e}");
        std::process::exit(1);
    }
}
