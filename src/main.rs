use log::{error, info};

mod app;
mod config;
mod contact;
mod counter;
mod dom;
mod error;
mod lazy;
mod nav;
mod observer;
mod parallax;
mod preloader;
mod reveal;
mod scroll_top;
mod styles;
mod utils;
mod form {
    pub mod state;
    pub mod validate;
    pub mod view;
}

use app::SiteController;

fn start() {
    match SiteController::new() {
        Ok(site) => site.init(),
        Err(e) => error!("Page interactions disabled: {}", e),
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    if console_log::init_with_level(config::log_level()).is_err() {
        gloo_console::warn!("Logger already initialized");
    }

    info!("Starting site interactions");

    let Some(window) = web_sys::window() else {
        return;
    };
    let loading = window
        .document()
        .map(|document| document.ready_state() == "loading")
        .unwrap_or(false);

    if !loading {
        start();
        return;
    }
    if let Err(e) = dom::listen(&window, "DOMContentLoaded", |_| start()) {
        error!("Could not wait for the document: {}", e);
    }
}
