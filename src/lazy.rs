use log::debug;
use wasm_bindgen::JsCast;
use web_sys::HtmlImageElement;

use crate::app::SiteController;
use crate::dom;
use crate::error::SiteError;
use crate::observer::observe_once;

pub fn init(site: &SiteController) -> Result<(), SiteError> {
    let images = dom::query_all(&site.document, "img[data-src]");
    debug!("Lazy loading {} images", images.len());
    observe_once(images, None, |element| {
        let Some(img) = element.dyn_ref::<HtmlImageElement>() else {
            return;
        };
        if let Some(src) = img.get_attribute("data-src") {
            img.set_src(&src);
        }
        let _ = img.class_list().add_1("loaded");
    })
}
