//! Browser bootstrap: canvas setup, data loading, and input wiring.
//!
//! The controller lives in a thread-local so DOM callbacks and async load
//! completions can reach it. Every access is a single synchronous borrow; no
//! callback re-enters while one is running.

use std::cell::RefCell;

use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, HtmlCanvasElement, HtmlElement, window};

use crate::config::{BACKGROUND_SRC, GameConfig};
use crate::coords::{CanvasRect, CanvasSize};
use crate::game::{GameController, PointerInput};
use crate::lang::{AnnotationMap, parse_annotations, parse_word_list};
use crate::mask::PendingMask;

pub mod dom;
pub mod load;
pub mod storage;

use dom::DomRenderer;
use storage::LocalStorageSettings;

pub type WebGame = GameController<DomRenderer, LocalStorageSettings>;

const CANVAS_ID: &str = "canvas";
const OPTION_CONTAINER_ID: &str = "option-container";

thread_local! {
    static GAME: RefCell<Option<WebGame>> = const { RefCell::new(None) };
}

/// Run `f` against the live game, if one has been started.
pub fn with_game<T>(f: impl FnOnce(&mut WebGame) -> T) -> Option<T> {
    GAME.with(|cell| cell.borrow_mut().as_mut().map(f))
}

fn element_by_id<T: JsCast>(doc: &Document, id: &str) -> Result<T, JsValue> {
    doc.get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("#{id} has the wrong element type")))
}

pub fn start() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    dom::populate_language_select(&doc)?;
    let config = GameConfig::from_query(&win.location().search().unwrap_or_default());
    let canvas: HtmlCanvasElement = element_by_id(&doc, CANVAS_ID)?;
    let container: HtmlElement = element_by_id(&doc, OPTION_CONTAINER_ID)?;

    spawn_local(async move {
        if let Err(err) = boot(doc, config, canvas, container).await {
            log::error!("Failed to start game: {err:?}");
        }
    });
    Ok(())
}

/// Size the canvas to the background image, then load data and start the game.
async fn boot(
    doc: Document,
    config: GameConfig,
    canvas: HtmlCanvasElement,
    container: HtmlElement,
) -> Result<(), JsValue> {
    let background = load::load_image(BACKGROUND_SRC, false).await?;
    canvas.set_width(background.natural_width());
    canvas.set_height(background.natural_height());
    let ctx = load::context_2d(&canvas, false)?;
    ctx.draw_image_with_html_image_element(&background, 0.0, 0.0)?;
    let size = CanvasSize { width: canvas.width(), height: canvas.height() };

    let renderer = DomRenderer::new(doc, container, config.feedback_ms);
    let game = GameController::new(config.clone(), size, renderer, LocalStorageSettings::from_window());
    GAME.with(|cell| *cell.borrow_mut() = Some(game));
    install_click_handler(&canvas)?;

    let words = load::fetch_text(&config.lang.wordlist_path())
        .await
        .and_then(|text| parse_word_list(&text))
        .unwrap_or_else(|err| {
            log::error!("Error fetching the word list: {err}");
            Vec::new()
        });

    if let Some(path) = config.lang.annotations_path() {
        let annotations = load::fetch_text(path)
            .await
            .and_then(|text| parse_annotations(&text))
            .unwrap_or_else(|err| {
                log::error!("Error fetching annotations: {err}");
                AnnotationMap::new()
            });
        with_game(|g| g.set_annotations(annotations));
    }

    let mut rng = StdRng::from_entropy();
    let pending = with_game(|g| g.start(&words, &mut rng)).unwrap_or_default();
    for p in pending {
        spawn_mask_load(p);
    }
    Ok(())
}

/// Load one mask in the background; the result lands whenever it lands.
pub fn spawn_mask_load(pending: PendingMask) {
    spawn_local(async move {
        let result = load::load_mask(&pending.word, &pending.url).await;
        with_game(|g| g.mask_loaded(pending, result));
    });
}

fn install_click_handler(canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    let target = canvas.clone();
    let onclick = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |evt: web_sys::MouseEvent| {
        evt.prevent_default();
        let r = target.get_bounding_client_rect();
        let rect = CanvasRect { left: r.left(), top: r.top(), width: r.width(), height: r.height() };
        let size = CanvasSize { width: target.width(), height: target.height() };
        let pointer = PointerInput {
            client: (evt.client_x() as f64, evt.client_y() as f64),
            page: (evt.page_x() as f64, evt.page_y() as f64),
        };
        if let Some(Err(err)) = with_game(|g| g.click(pointer, rect, size)) {
            log::warn!("Click not evaluated: {err}");
        }
    });
    canvas.set_onclick(Some(onclick.as_ref().unchecked_ref()));
    onclick.forget();
    Ok(())
}
