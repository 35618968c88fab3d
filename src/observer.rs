//! Fire-once viewport observers shared by the reveal, lazy-image and counter
//! components.

use log::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::js_sys::Array;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::error::SiteError;

/// Tracks which members of a fixed set already had their effect run.
#[derive(Debug, Clone, PartialEq)]
pub struct OnceTracker {
    fired: Vec<bool>,
}

impl OnceTracker {
    pub fn new(len: usize) -> Self {
        Self {
            fired: vec![false; len],
        }
    }

    /// Returns true the first time `index` is seen, false afterwards and for
    /// indices outside the set.
    pub fn fire(&mut self, index: usize) -> bool {
        match self.fired.get_mut(index) {
            Some(fired) if !*fired => {
                *fired = true;
                true
            }
            _ => false,
        }
    }

    pub fn remaining(&self) -> usize {
        self.fired.iter().filter(|fired| !**fired).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    pub threshold: f64,
    pub root_margin: &'static str,
}

/// Observes `elements` and runs `effect` on each the first time it
/// intersects the viewport, then stops observing it.
pub fn observe_once<F>(
    elements: Vec<Element>,
    options: Option<ObserverOptions>,
    mut effect: F,
) -> Result<(), SiteError>
where
    F: FnMut(&Element) + 'static,
{
    if elements.is_empty() {
        return Ok(());
    }

    let targets = elements.clone();
    let mut tracker = OnceTracker::new(targets.len());
    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                if !entry.is_intersecting() {
                    continue;
                }
                let target = entry.target();
                observer.unobserve(&target);
                if let Some(index) = targets.iter().position(|el| *el == target) {
                    if tracker.fire(index) {
                        effect(&target);
                        debug!("{} observed elements left", tracker.remaining());
                    }
                }
            }
        },
    );

    let observer = match options {
        Some(options) => {
            let init = IntersectionObserverInit::new();
            init.set_threshold(&JsValue::from_f64(options.threshold));
            init.set_root_margin(options.root_margin);
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?
        }
        None => IntersectionObserver::new(callback.as_ref().unchecked_ref())?,
    };
    callback.forget();

    for element in &elements {
        observer.observe(element);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_member_fires_once() {
        let mut tracker = OnceTracker::new(3);
        assert!(tracker.fire(1));
        assert!(!tracker.fire(1));
        assert!(tracker.fire(0));
        assert_eq!(tracker.remaining(), 1);
        // Re-intersection after the first trigger stays silent.
        assert!(!tracker.fire(0));
        assert!(!tracker.fire(1));
        assert!(tracker.fire(2));
        assert_eq!(tracker.remaining(), 0);
    }

    #[test]
    fn unknown_index_never_fires() {
        let mut tracker = OnceTracker::new(1);
        assert!(!tracker.fire(5));
        assert_eq!(tracker.remaining(), 1);
    }
}
