//! DOM renderer: option list, settings checkbox, feedback popups, alerts.

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, HtmlElement, HtmlInputElement, Url, window};

use super::{spawn_mask_load, with_game};
use crate::error::GameError;
use crate::game::{Feedback, GameView, OptionLabel, Renderer};
use crate::lang::{Language, escape_html, ruby_html};

const SETTINGS_CONTAINER_ID: &str = "settings-container";
const LANGUAGE_CONTAINER_ID: &str = "language-select-container";
const FURIGANA_CAPTION: &str = "振り仮名 (Enable Furigana)";

fn label_html(label: &OptionLabel) -> String {
    match &label.ruby {
        Some(segments) => ruby_html(segments),
        None => escape_html(&label.word),
    }
}

fn feedback_html(feedback: &Feedback) -> String {
    match feedback {
        Feedback::Correct(label) => label_html(label),
        Feedback::Incorrect => "X".to_string(),
    }
}

pub struct DomRenderer {
    doc: Document,
    container: HtmlElement,
    elements: HashMap<String, HtmlElement>,
    feedback_ms: i32,
}

impl DomRenderer {
    pub fn new(doc: Document, container: HtmlElement, feedback_ms: i32) -> Self {
        Self { doc, container, elements: HashMap::new(), feedback_ms }
    }

    fn create_div(&self, class: &str) -> Result<HtmlElement, JsValue> {
        let div: HtmlElement = self.doc.create_element("div")?.dyn_into()?;
        div.class_list().add_1(class)?;
        Ok(div)
    }

    fn add_option(&mut self, label: &OptionLabel) -> Result<(), JsValue> {
        let div = self.create_div("option")?;
        match &label.ruby {
            Some(segments) => div.set_inner_html(&ruby_html(segments)),
            None => div.set_inner_text(&label.word),
        }
        let word = label.word.clone();
        let onclick = Closure::<dyn FnMut()>::new(move || {
            // errors are already shown by the controller; a failed mask is re-requested
            let retry = with_game(|g| match g.select(&word) {
                Err(GameError::MaskNotReady(_)) => g.retry_mask(&word),
                _ => None,
            })
            .flatten();
            if let Some(pending) = retry {
                spawn_mask_load(pending);
            }
        });
        div.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
        self.container.append_child(&div)?;
        self.elements.insert(label.word.clone(), div);
        Ok(())
    }

    fn render_options(&mut self, view: &GameView<'_>) -> Result<(), JsValue> {
        self.container.set_inner_html("");
        self.elements.clear();
        for label in &view.options {
            self.add_option(label)?;
        }
        Ok(())
    }

    fn render_settings(&self, annotations: Option<bool>) -> Result<(), JsValue> {
        let Some(settings) = self.doc.get_element_by_id(SETTINGS_CONTAINER_ID) else {
            return Ok(());
        };
        settings.set_inner_html("");
        let Some(enabled) = annotations else {
            return Ok(());
        };
        let label = self.doc.create_element("label")?;
        let checkbox: HtmlInputElement = self.doc.create_element("input")?.dyn_into()?;
        checkbox.set_type("checkbox");
        checkbox.set_checked(enabled);
        label.append_child(&checkbox)?;
        label.append_with_str_1(FURIGANA_CAPTION)?;
        settings.append_child(&label)?;

        let cb = checkbox.clone();
        let onchange = Closure::<dyn FnMut()>::new(move || {
            let checked = cb.checked();
            with_game(|g| g.set_annotations_enabled(checked));
        });
        checkbox.set_onchange(Some(onchange.as_ref().unchecked_ref()));
        onchange.forget();
        Ok(())
    }

    /// Detach `el` when `event` fires on it. The same event bubbling up from a
    /// child, or firing again for another property, is ignored.
    fn remove_on(el: &HtmlElement, event: &str) -> Result<(), JsValue> {
        let gone = el.clone();
        let handler = Closure::<dyn FnMut(Event)>::new(move |evt: Event| {
            let own: &JsValue = gone.as_ref();
            if evt.target().map(JsValue::from).as_ref() == Some(own) {
                gone.remove();
            }
        });
        el.add_event_listener_with_callback(event, handler.as_ref().unchecked_ref())?;
        handler.forget();
        Ok(())
    }

    fn popup(&self, feedback: &Feedback, anchor: (f64, f64)) -> Result<(), JsValue> {
        let body = self.doc.body().ok_or_else(|| JsValue::from_str("no body"))?;
        let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
        let popup = self.create_div("popup")?;
        if matches!(feedback, Feedback::Incorrect) {
            popup.class_list().add_1("false")?;
        }
        let style = popup.style();
        style.set_property("left", &format!("{}px", anchor.0))?;
        style.set_property("top", &format!("{}px", anchor.1))?;
        popup.set_inner_html(&feedback_html(feedback));
        body.append_child(&popup)?;

        // next frame, so the show transition runs
        let shown = popup.clone();
        let show = Closure::once_into_js(move || {
            let _ = shown.class_list().add_1("show");
        });
        win.request_animation_frame(show.unchecked_ref())?;

        let hidden = popup.clone();
        let hide = Closure::once_into_js(move || {
            if let Err(err) = Self::remove_on(&hidden, "transitionend") {
                log::warn!("Popup stays in the page: {err:?}");
            }
            let _ = hidden.class_list().remove_1("show");
        });
        win.set_timeout_with_callback_and_timeout_and_arguments_0(hide.unchecked_ref(), self.feedback_ms)?;
        Ok(())
    }
}

impl Renderer for DomRenderer {
    fn render(&mut self, view: &GameView<'_>) {
        if let Err(err) = self.render_options(view) {
            log::error!("Failed to render options: {err:?}");
        }
        self.set_armed(view.armed);
        if let Err(err) = self.render_settings(view.annotations) {
            log::error!("Failed to render settings: {err:?}");
        }
    }

    fn set_armed(&mut self, armed: Option<&str>) {
        for (word, el) in &self.elements {
            let list = el.class_list();
            let _ = if Some(word.as_str()) == armed {
                list.add_1("active")
            } else {
                list.remove_1("active")
            };
        }
    }

    fn remove_option(&mut self, word: &str) {
        let Some(el) = self.elements.remove(word) else {
            return;
        };
        if Self::remove_on(&el, "animationend").is_err() {
            el.remove();
            return;
        }
        let _ = el.class_list().add_1("removing");
    }

    fn show_feedback(&mut self, feedback: &Feedback, anchor: (f64, f64)) {
        if let Err(err) = self.popup(feedback, anchor) {
            log::error!("Failed to show popup: {err:?}");
        }
    }

    fn show_error(&mut self, err: &GameError) {
        log::error!("{err}");
        if let Some(win) = window() {
            let _ = win.alert_with_message(&err.to_string());
        }
    }
}

/// Header buttons that reload the page with `?lang=<code>`.
pub fn populate_language_select(doc: &Document) -> Result<(), JsValue> {
    let Some(container) = doc.get_element_by_id(LANGUAGE_CONTAINER_ID) else {
        return Ok(());
    };
    container.set_inner_html("");
    for lang in Language::ALL {
        let button: HtmlElement = doc.create_element("button")?.dyn_into()?;
        button.class_list().add_1("header-button")?;
        button.set_text_content(Some(lang.caption()));
        let onclick = Closure::<dyn FnMut()>::new(move || {
            if let Err(err) = switch_language(lang) {
                log::error!("Could not switch language: {err:?}");
            }
        });
        button.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
        container.append_child(&button)?;
    }
    Ok(())
}

fn switch_language(lang: Language) -> Result<(), JsValue> {
    let location = window().ok_or_else(|| JsValue::from_str("no window"))?.location();
    let url = Url::new(&location.href()?)?;
    url.search_params().set("lang", lang.code());
    location.set_href(&url.href())
}
