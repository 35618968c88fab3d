use log::{info, warn};
use web_sys::{Document, Window};

use crate::config::{SiteConfig, CONFIG_ELEMENT_ID};
use crate::error::SiteError;
use crate::form::view as contact_form;
use crate::utils::Utils;
use crate::{contact, counter, lazy, nav, parallax, preloader, reveal, scroll_top, styles};

type Init = fn(&SiteController) -> Result<(), SiteError>;

const COMPONENTS: &[(&str, Init)] = &[
    ("navigation", nav::init),
    ("scroll-to-top", scroll_top::init),
    ("whatsapp", contact::init),
    ("reveal", reveal::init),
    ("contact form", contact_form::init),
    ("parallax", parallax::init),
    ("lazy images", lazy::init),
    ("counters", counter::init),
    ("styles", styles::init),
    ("preloader", preloader::init),
];

/// Everything the page behaviors need, gathered once at startup.
pub struct SiteController {
    pub window: Window,
    pub document: Document,
    pub config: SiteConfig,
    pub utils: Utils,
}

impl SiteController {
    pub fn new() -> Result<Self, SiteError> {
        let window = web_sys::window().ok_or(SiteError::MissingElement("window"))?;
        let document = window
            .document()
            .ok_or(SiteError::MissingElement("document"))?;
        let config = load_config(&document);
        Ok(Self {
            window,
            document,
            config,
            utils: Utils::default(),
        })
    }

    /// Wires up every component; one failing does not stop the rest.
    pub fn init(&self) {
        for (name, init) in COMPONENTS {
            if let Err(e) = init(self) {
                warn!("Could not initialise {}: {}", name, e);
            }
        }
        info!("Page interactions ready");
    }
}

fn load_config(document: &Document) -> SiteConfig {
    let Some(raw) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content())
    else {
        return SiteConfig::default();
    };
    match SiteConfig::from_json(&raw) {
        Ok(config) => {
            info!("Loaded site config overrides");
            config
        }
        Err(e) => {
            warn!("Ignoring site config: {}", e);
            SiteConfig::default()
        }
    }
}
