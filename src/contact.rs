use log::{debug, info, warn};

use crate::app::SiteController;
use crate::config::WhatsAppConfig;
use crate::dom;
use crate::error::SiteError;

pub fn whatsapp_url(config: &WhatsAppConfig) -> String {
    format!(
        "https://wa.me/{}?text={}",
        config.phone,
        urlencoding::encode(&config.message)
    )
}

pub fn init(site: &SiteController) -> Result<(), SiteError> {
    let Some(button) = dom::query(&site.document, ".whatsapp-btn") else {
        debug!("No WhatsApp button on this page");
        return Ok(());
    };

    let window = site.window.clone();
    let url = whatsapp_url(&site.config.whatsapp);
    dom::listen(&button, "click", move |_| {
        if let Err(e) = window.open_with_url_and_target(&url, "_blank") {
            warn!("Could not open WhatsApp link: {:?}", e);
        }
    })?;

    info!("WhatsApp shortcut ready");
    Ok(())
}
