//! Async fetch and image decoding for the browser.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, Response, window};

use crate::error::GameError;
use crate::mask::MaskImage;

fn data_err(v: JsValue) -> GameError {
    GameError::DataLoad(format!("{v:?}"))
}

/// GET `url` and return the body as text. Non-OK statuses are errors.
pub async fn fetch_text(url: &str) -> Result<String, GameError> {
    let win = window().ok_or_else(|| GameError::DataLoad("no window".into()))?;
    let resp_value = JsFuture::from(win.fetch_with_str(url)).await.map_err(data_err)?;
    let resp: Response = resp_value.dyn_into().map_err(data_err)?;
    if !resp.ok() {
        return Err(GameError::DataLoad(format!("HTTP error! status: {} ({url})", resp.status())));
    }
    let text = JsFuture::from(resp.text().map_err(data_err)?).await.map_err(data_err)?;
    text.as_string()
        .ok_or_else(|| GameError::DataLoad(format!("{url}: body is not text")))
}

/// Resolve once `src` has loaded into a fresh image element.
pub async fn load_image(src: &str, cross_origin: bool) -> Result<HtmlImageElement, JsValue> {
    let img = HtmlImageElement::new()?;
    if cross_origin {
        // required for get_image_data on CDN-hosted masks
        img.set_cross_origin(Some("anonymous"));
    }
    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        img.set_onload(Some(&resolve));
        img.set_onerror(Some(&reject));
    });
    img.set_src(src);
    let result = JsFuture::from(promise).await;
    img.set_onload(None);
    img.set_onerror(None);
    result.map_err(|_| JsValue::from_str(&format!("failed to load image {src}")))?;
    Ok(img)
}

pub fn context_2d(
    canvas: &HtmlCanvasElement,
    will_read_frequently: bool,
) -> Result<CanvasRenderingContext2d, JsValue> {
    let opts = js_sys::Object::new();
    js_sys::Reflect::set(
        &opts,
        &JsValue::from_str("willReadFrequently"),
        &JsValue::from_bool(will_read_frequently),
    )?;
    canvas
        .get_context_with_context_options("2d", &opts)?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(JsValue::from)
}

/// Read the image's pixels at natural size through a throwaway canvas.
fn decode(img: &HtmlImageElement) -> Result<MaskImage, JsValue> {
    let (w, h) = (img.natural_width(), img.natural_height());
    let doc = window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
    canvas.set_width(w);
    canvas.set_height(h);
    let ctx = context_2d(&canvas, true)?;
    ctx.draw_image_with_html_image_element(img, 0.0, 0.0)?;
    let data = ctx.get_image_data(0.0, 0.0, w as f64, h as f64)?;
    MaskImage::from_rgba(w, h, data.data().0)
        .ok_or_else(|| JsValue::from_str("unexpected pixel buffer size"))
}

pub async fn load_mask(word: &str, url: &str) -> Result<MaskImage, GameError> {
    let fail = |v: JsValue| GameError::MaskLoad {
        word: word.to_string(),
        reason: v.as_string().unwrap_or_else(|| format!("{v:?}")),
    };
    let img = load_image(url, true).await.map_err(fail)?;
    decode(&img).map_err(fail)
}
