use foundation::SchoolId;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, HtmlInputElement};

use crate::config::ElementIds;
use crate::startup::PageSink;

/// Page controls outside the map. Only the status line and the list are
/// required; the search box and the two buttons are wired when present.
pub struct Dom {
    status: Element,
    list: Element,
    search: Option<HtmlInputElement>,
    next_button: Option<Element>,
    reset_button: Option<Element>,
    listeners: Vec<Closure<dyn FnMut(Event)>>,
}

/// Callbacks the page controls are wired to.
#[derive(Clone, Copy)]
pub struct Handlers {
    pub on_search: fn(&str),
    pub on_list_click: fn(&SchoolId),
    pub on_next: fn(),
    pub on_reset: fn(),
}

fn required(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))
}

impl PageSink for Dom {
    fn set_status(&mut self, text: &str) {
        self.status.set_text_content(Some(text));
    }

    fn set_list_html(&mut self, html: &str) {
        self.list.set_inner_html(html);
    }
}

impl Dom {
    pub fn lookup(document: &Document, ids: &ElementIds) -> Result<Self, JsValue> {
        let status = required(document, &ids.status)?;
        let list = required(document, &ids.list)?;
        let search = document
            .get_element_by_id(&ids.search)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
        Ok(Self {
            status,
            list,
            search,
            next_button: document.get_element_by_id(&ids.next_button),
            reset_button: document.get_element_by_id(&ids.reset_button),
            listeners: Vec::new(),
        })
    }

    pub fn wire(&mut self, handlers: Handlers) -> Result<(), JsValue> {
        if let Some(search) = self.search.clone() {
            let on_search = handlers.on_search;
            let input = search.clone();
            self.listen(&search, "input", move |_| on_search(&input.value()))?;
        }
        if let Some(button) = self.next_button.clone() {
            let on_next = handlers.on_next;
            self.listen(&button, "click", move |_| on_next())?;
        }
        if let Some(button) = self.reset_button.clone() {
            let on_reset = handlers.on_reset;
            self.listen(&button, "click", move |_| on_reset())?;
        }

        // One delegated listener; rows are re-rendered on every filter change.
        let on_list_click = handlers.on_list_click;
        let list = self.list.clone();
        self.listen(&list, "click", move |event: Event| {
            if let Some(id) = clicked_school(&event) {
                on_list_click(&id);
            }
        })
    }

    fn listen<F>(&mut self, target: &Element, event: &str, f: F) -> Result<(), JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::<dyn FnMut(Event)>::new(f);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        self.listeners.push(closure);
        Ok(())
    }
}

fn clicked_school(event: &Event) -> Option<SchoolId> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let row = target.closest("li[data-school-id]").ok()??;
    row.get_attribute("data-school-id").map(SchoolId::from)
}
