use log::debug;

use crate::app::SiteController;
use crate::dom;
use crate::error::SiteError;
use crate::observer::{observe_once, ObserverOptions};

const FADE_IN_OPTIONS: ObserverOptions = ObserverOptions {
    threshold: 0.1,
    root_margin: "0px 0px -50px 0px",
};

pub fn init(site: &SiteController) -> Result<(), SiteError> {
    let elements = dom::query_all(&site.document, ".fade-in");
    debug!("Observing {} fade-in elements", elements.len());
    observe_once(elements, Some(FADE_IN_OPTIONS), |element| {
        let _ = element.class_list().add_1("visible");
    })
}
