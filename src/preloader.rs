use gloo_timers::callback::Timeout;
use log::debug;
use web_sys::Document;

use crate::app::SiteController;
use crate::dom;
use crate::error::SiteError;

fn hide(document: &Document, fade_ms: u32) {
    let Some(preloader) = dom::query(document, ".preloader") else {
        return;
    };
    dom::set_style(&preloader, "opacity", "0");
    Timeout::new(fade_ms, move || {
        dom::set_style(&preloader, "display", "none");
        debug!("Preloader hidden");
    })
    .forget();
}

pub fn init(site: &SiteController) -> Result<(), SiteError> {
    let fade_ms = site.config.preloader_fade_ms;
    // The module can finish loading after the window's load event.
    if site.document.ready_state() == "complete" {
        hide(&site.document, fade_ms);
        return Ok(());
    }
    let document = site.document.clone();
    dom::listen(&site.window, "load", move |_| hide(&document, fade_ms))
}
